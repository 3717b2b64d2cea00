//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Session behavior (auto-save on completion)
//! - Video directory endpoint and lookup timeout
//! - The user id attached to persisted workouts
//!
//! Configuration is stored at `~/.config/setflow/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::video::DEFAULT_LOOKUP_TIMEOUT_SECS;

/// Session behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Persist completion data automatically when a session finishes.
    #[serde(default = "default_true")]
    pub auto_save: bool,
}

/// Video directory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Base URL of the video directory service. Unset means the session
    /// runs in "no video" mode.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_secs: u64,
}

/// User identity attached to persisted workouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default = "default_user_id")]
    pub id: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/setflow/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub user: UserConfig,
}

// Default functions
fn default_true() -> bool {
    true
}
fn default_lookup_timeout() -> u64 {
    DEFAULT_LOOKUP_TIMEOUT_SECS
}
fn default_user_id() -> String {
    "local".into()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { auto_save: default_true() }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            lookup_timeout_secs: default_lookup_timeout(),
        }
    }
}

impl Default for UserConfig {
    fn default() -> Self {
        Self { id: default_user_id() }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("~/.config/setflow"),
                message: e.to_string(),
            })
    }

    /// Load configuration, falling back to defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Write configuration back to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert!(config.session.auto_save);
        assert_eq!(config.video.base_url, None);
        assert_eq!(config.video.lookup_timeout_secs, DEFAULT_LOOKUP_TIMEOUT_SECS);
        assert_eq!(config.user.id, "local");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [video]
            base_url = "https://videos.example"
            "#,
        )
        .unwrap();
        assert_eq!(config.video.base_url.as_deref(), Some("https://videos.example"));
        assert_eq!(config.video.lookup_timeout_secs, DEFAULT_LOOKUP_TIMEOUT_SECS);
        assert!(config.session.auto_save);
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = Config::default();
        config.user.id = "athlete-7".into();
        let raw = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.user.id, "athlete-7");
    }
}

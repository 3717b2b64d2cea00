mod config;
pub mod database;

pub use config::Config;
pub use database::{Database, WorkoutRecord, WorkoutStats};

use std::path::PathBuf;

use crate::completion::CompletionData;
use crate::error::DatabaseError;

/// Anything that can durably store a finished or partial session
/// summary. The engine never calls this itself; the command layer does,
/// and a failed save leaves the engine untouched so the caller can
/// simply retry with the same completion data.
pub trait CompletionStore {
    fn save_completion(&self, user_id: &str, data: &CompletionData) -> Result<i64, DatabaseError>;
}

/// Returns `~/.config/setflow[-dev]/` based on SETFLOW_ENV.
///
/// Set SETFLOW_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SETFLOW_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("setflow-dev")
    } else {
        base_dir.join("setflow")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

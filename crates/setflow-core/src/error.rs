//! Core error types for setflow-core.
//!
//! This module defines the error hierarchy using thiserror. Invalid
//! engine commands are deliberately NOT errors: the session engine
//! recovers from them as no-ops (commands return `None`), so only
//! failures that a caller must act on appear here.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for setflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Session engine errors
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Video lookup errors
    #[error("Video lookup error: {0}")]
    Video(#[from] VideoError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors fatal to starting or restoring a session.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A session cannot be built from a plan with zero exercises.
    #[error("Session plan is empty: at least one exercise is required")]
    EmptyPlan,
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Video lookup errors. All of these are non-fatal to a running
/// session: callers degrade to a "no video" state.
#[derive(Error, Debug)]
pub enum VideoError {
    /// Lookup did not complete within the configured bound
    #[error("Video lookup timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// HTTP request failed
    #[error("Video lookup request failed: {0}")]
    Request(String),

    /// Directory service returned a non-success status
    #[error("Video directory returned HTTP {status}")]
    Status { status: u16 },
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for VideoError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        VideoError::Timeout { timeout_secs: 2 }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

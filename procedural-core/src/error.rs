//! Error types for cave generation

use thiserror::Error;

/// Errors surfaced by the cave core.
///
/// Generation itself is infallible once a configuration has been validated;
/// everything here is raised either by validation or by loading/watching
/// configuration files.
#[derive(Debug, Error)]
pub enum CaveError {
    /// Configuration rejected before any generation work
    #[error("Invalid cave configuration: {0}")]
    InvalidConfig(String),

    /// Config file could not be read
    #[error("Config IO failed: {0}")]
    Io(#[from] std::io::Error),

    /// RON config parse failure
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// JSON config parse failure
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// File watcher could not be set up
    #[error("Config watcher failed: {0}")]
    Watch(#[from] notify::Error),
}

/// Result type for cave operations
pub type Result<T> = std::result::Result<T, CaveError>;

// ================================================================
// File: lavamusic-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    // Load-time integrity errors. Any of these aborts startup.
    #[error("Failed to load handler {category}/{file}: {reason}")]
    HandlerLoad {
        category: String,
        file: String,
        reason: String,
    },

    #[error("Duplicate command name: {0}")]
    DuplicateCommand(String),

    #[error("Alias '{alias}' collides with existing entry '{existing}'")]
    AliasCollision { alias: String, existing: String },

    #[error("Unknown {scope} event '{name}'")]
    UnknownEvent { scope: String, name: String },

    #[error("Node discovery error: {0}")]
    Discovery(String),

    #[error("Slash command publish error: {0}")]
    Publish(String),

    #[error("Lifecycle error: {0}")]
    Lifecycle(String),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Parse(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Parse(s.to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::Parse(e.to_string())
    }
}

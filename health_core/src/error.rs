//! Error types for the health_core library.

use std::io;
use std::path::PathBuf;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for health_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A persisted store exists but its contents are not well-formed.
    ///
    /// Never remediated automatically: the file is left untouched so the
    /// user can repair or remove it.
    #[error("{} is corrupt: {reason}", path.display())]
    StoreCorrupt { path: PathBuf, reason: String },

    /// Menu or symptom selection that is non-numeric or out of range
    #[error("Invalid choice: {0}")]
    InvalidSelection(String),

    /// Severity input that is not an integer between 1 and 5
    #[error("Invalid severity '{0}': enter a whole number from 1 to 5")]
    InvalidSeverity(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::StoreCorrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

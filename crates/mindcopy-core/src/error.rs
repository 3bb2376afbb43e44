//! Error types for the MindCopy core

use thiserror::Error;

/// Result type alias for state, render and transfer operations
pub type MindcopyResult<T> = Result<T, MindcopyError>;

/// Result type alias for offline cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// User-visible alert text shown when an imported file cannot be used.
pub const IMPORT_ALERT: &str = "Invalid file";

/// Errors raised by the state store, mutation handlers and import/export
#[derive(Error, Debug)]
pub enum MindcopyError {
    #[error("Storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Carries the alert shown to the user; existing state is left untouched.
    #[error("{alert}: {reason}")]
    ImportRejected { alert: &'static str, reason: String },

    #[error("Unknown mode flag: {0}")]
    UnknownMode(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Asset cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MindcopyError {
    pub(crate) fn import_rejected(reason: impl ToString) -> Self {
        MindcopyError::ImportRejected {
            alert: IMPORT_ALERT,
            reason: reason.to_string(),
        }
    }

    /// The message to surface to the user, if this error is meant to be seen.
    pub fn user_alert(&self) -> Option<&'static str> {
        match self {
            MindcopyError::ImportRejected { alert, .. } => Some(alert),
            _ => None,
        }
    }
}

/// Errors raised by the offline cache worker
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Install of {version} failed at {path}: {reason}")]
    InstallFailed {
        version: String,
        path: String,
        reason: String,
    },

    #[error("Worker for {0} is not installed; cannot activate")]
    NotInstalled(String),

    #[error("Fetch error for {path}: {reason}")]
    Fetch { path: String, reason: String },

    #[error("Cache storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("Cache entry encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for CacheError {
    fn from(err: reqwest::Error) -> Self {
        CacheError::Fetch {
            path: err
                .url()
                .map(|u| u.path().to_string())
                .unwrap_or_default(),
            reason: err.to_string(),
        }
    }
}

//! Error types for confvault-fs

use std::path::PathBuf;

/// Result type for confvault-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while managing the backup root
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid device address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("{path} exists but is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("Lock acquisition failed for {path}")]
    LockFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

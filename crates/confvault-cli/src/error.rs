//! Error types for confvault-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from confvault-core
    #[error(transparent)]
    Core(#[from] confvault_core::Error),

    /// Error from confvault-fs
    #[error(transparent)]
    Fs(#[from] confvault_fs::Error),

    /// Error from confvault-git
    #[error(transparent)]
    Git(#[from] confvault_git::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Some devices in a batch failed; details were already printed.
    #[error("{failed} of {total} devices failed")]
    PartialFailure { failed: usize, total: usize },

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}

//! Error types for confvault-core

use std::fmt;
use std::path::PathBuf;

/// Result type for confvault-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage a capture failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Authenticate,
    Fetch,
    Store,
    Repository,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authenticate => "authenticate",
            Self::Fetch => "fetch",
            Self::Store => "store",
            Self::Repository => "repository",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur in confvault-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Login failed or returned no anti-forgery token
    #[error("[{address}] authentication failed: {source}")]
    Auth {
        address: String,
        #[source]
        source: confvault_api::Error,
    },

    /// Config backup request failed
    #[error("[{address}] config fetch failed: {source}")]
    Fetch {
        address: String,
        #[source]
        source: confvault_api::Error,
    },

    /// Backup root could not be prepared or written
    #[error("[{address}] backup store failed: {source}")]
    Store {
        address: String,
        #[source]
        source: confvault_fs::Error,
    },

    /// Device repository could not be opened, created or committed to
    #[error("[{address}] repository failed: {source}")]
    Repository {
        address: String,
        #[source]
        source: confvault_git::Error,
    },

    /// Settings file could not be read
    #[error("Failed to read settings at {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid TOML for [`crate::Settings`]
    #[error("Failed to parse settings: {0}")]
    SettingsParse(#[from] toml::de::Error),

    /// Settings are well-formed but unusable
    #[error("Invalid settings: {message}")]
    InvalidSettings { message: String },
}

impl Error {
    /// Stage the capture failed in, for capture errors.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Auth { .. } => Some(Stage::Authenticate),
            Self::Fetch { .. } => Some(Stage::Fetch),
            Self::Store { .. } => Some(Stage::Store),
            Self::Repository { .. } => Some(Stage::Repository),
            _ => None,
        }
    }

    /// Device the capture failed for, for capture errors.
    pub fn address(&self) -> Option<&str> {
        match self {
            Self::Auth { address, .. }
            | Self::Fetch { address, .. }
            | Self::Store { address, .. }
            | Self::Repository { address, .. } => Some(address),
            _ => None,
        }
    }
}

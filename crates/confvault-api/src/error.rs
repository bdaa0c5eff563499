//! Error types for confvault-api
//!
//! Messages carry HTTP status codes and transport causes only; credentials and
//! configuration text never appear in them.

/// Result type for confvault-api operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to a device
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("Login request failed: {source}")]
    LoginTransport {
        #[source]
        source: reqwest::Error,
    },

    #[error("Login rejected with HTTP status {status}")]
    LoginRejected { status: u16 },

    #[error(
        "Login response did not set the '{cookie}' cookie (wrong credentials, or the host does not expose the management API)"
    )]
    MissingToken { cookie: &'static str },

    #[error("Config backup request failed: {source}")]
    FetchTransport {
        #[source]
        source: reqwest::Error,
    },

    #[error("Config backup returned HTTP status {status}")]
    FetchStatus { status: u16 },

    #[error("Logout request failed: {source}")]
    LogoutTransport {
        #[source]
        source: reqwest::Error,
    },

    #[error("Logout returned HTTP status {status}")]
    LogoutStatus { status: u16 },
}

impl Error {
    /// Whether the failure was a timeout rather than a refusal.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::ClientBuild { source }
            | Self::LoginTransport { source }
            | Self::FetchTransport { source }
            | Self::LogoutTransport { source } => source.is_timeout(),
            _ => false,
        }
    }
}

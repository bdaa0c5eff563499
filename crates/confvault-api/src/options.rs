//! HTTP client options

use std::time::Duration;

/// How the client reaches devices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Verify the device certificate. Management interfaces often carry
    /// self-signed certificates; turning this off accepts any certificate.
    pub verify_tls: bool,

    /// Use `https`. Plain `http` is only meant for lab devices and tests.
    pub use_tls: bool,

    /// Upper bound for a whole request, including the response body.
    pub timeout: Duration,

    pub connect_timeout: Duration,
}

impl ClientOptions {
    pub fn scheme(&self) -> &'static str {
        if self.use_tls { "https" } else { "http" }
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            verify_tls: true,
            use_tls: true,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

//! Firewall management API client for confvault
//!
//! Authenticates against a device's HTTPS management interface and downloads
//! its full configuration backup. The [`DeviceApi`] trait is the seam the
//! capture pipeline is written against; [`HttpDeviceApi`] is the real
//! implementation.

pub mod client;
pub mod error;
pub mod options;
pub mod snapshot;
pub mod target;

pub use client::{HttpDeviceApi, Session};
pub use error::{Error, Result};
pub use options::ClientOptions;
pub use snapshot::ConfigSnapshot;
pub use target::{Credentials, DEFAULT_HTTPS_PORT, DeviceTarget};

/// Access to a device's management API.
///
/// A session belongs to a single capture of a single device and is consumed
/// by [`DeviceApi::logout`].
#[cfg_attr(any(test, feature = "mock"), mockall::automock(type Session = ();))]
pub trait DeviceApi {
    type Session;

    /// Exchange the target's credentials for an authenticated session.
    fn authenticate(&self, target: &DeviceTarget) -> Result<Self::Session>;

    /// Download the full configuration backup.
    fn fetch_config(&self, session: &Self::Session, target: &DeviceTarget)
    -> Result<ConfigSnapshot>;

    /// End the session on the device.
    fn logout(&self, session: Self::Session, target: &DeviceTarget) -> Result<()>;
}

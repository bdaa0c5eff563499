//! Backup root layout for confvault
//!
//! Owns the on-disk side of a capture: one directory per device under the
//! backup root, the fixed-name snapshot file inside it, and the advisory lock
//! that serializes captures of the same device.

pub mod address;
pub mod constants;
pub mod error;
pub mod io;
pub mod lock;
pub mod store;

pub use address::validate_device_address;
pub use constants::{SNAPSHOT_SUFFIX, lock_file_name, snapshot_file_name};
pub use error::{Error, Result};
pub use lock::DeviceLock;
pub use store::BackupStore;

//! Device address validation.
//!
//! The address doubles as a directory name, so anything that could escape the
//! backup root or collide with hidden files is rejected up front.

use crate::{Error, Result};

/// Check that `address` is usable as a single path component.
pub fn validate_device_address(address: &str) -> Result<()> {
    let reject = |reason: &str| {
        Err(Error::InvalidAddress {
            address: address.to_string(),
            reason: reason.to_string(),
        })
    };

    if address.trim().is_empty() {
        return reject("address is empty");
    }
    if address != address.trim() {
        return reject("address has leading or trailing whitespace");
    }
    if address.contains(['/', '\\']) {
        return reject("address contains a path separator");
    }
    if address.contains('\0') {
        return reject("address contains a NUL byte");
    }
    if address.starts_with('.') {
        return reject("address starts with '.'");
    }

    Ok(())
}

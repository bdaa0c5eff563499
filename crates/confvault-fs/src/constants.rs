//! File naming inside the backup root.

/// Suffix appended to the device address to form the snapshot file name.
pub const SNAPSHOT_SUFFIX: &str = "-config_backup.conf";

/// Name of the snapshot file kept in a device directory.
///
/// ```
/// assert_eq!(
///     confvault_fs::snapshot_file_name("10.0.0.5"),
///     "10.0.0.5-config_backup.conf"
/// );
/// ```
pub fn snapshot_file_name(address: &str) -> String {
    format!("{address}{SNAPSHOT_SUFFIX}")
}

/// Name of the per-device lock file. It lives in the backup root, next to
/// (not inside) the device directory, so it never shows up in the device
/// repository.
pub fn lock_file_name(address: &str) -> String {
    format!(".{address}.lock")
}

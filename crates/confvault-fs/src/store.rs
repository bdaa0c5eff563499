//! Backup root layout: `{root}/{address}/{address}-config_backup.conf`

use std::fs;
use std::path::{Path, PathBuf};

use crate::{
    DeviceLock, Error, Result, io, lock_file_name, snapshot_file_name, validate_device_address,
};

/// The backup root and the per-device directories beneath it.
#[derive(Debug, Clone)]
pub struct BackupStore {
    root: PathBuf,
}

impl BackupStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a device's snapshot and repository.
    pub fn device_dir(&self, address: &str) -> PathBuf {
        self.root.join(address)
    }

    /// Full path of a device's snapshot file.
    pub fn snapshot_path(&self, address: &str) -> PathBuf {
        self.device_dir(address).join(snapshot_file_name(address))
    }

    /// Make sure the root and the device directory exist.
    ///
    /// The root is created one level deep (its parent must exist). An
    /// existing directory counts as success, so repeated or concurrent
    /// calls from several processes are safe.
    pub fn ensure_device_directory(&self, address: &str) -> Result<PathBuf> {
        validate_device_address(address)?;

        if create_dir_if_absent(&self.root)? {
            tracing::info!(root = %self.root.display(), "Created backup root");
        }

        let device_dir = self.device_dir(address);
        if create_dir_if_absent(&device_dir)? {
            tracing::info!(
                address = %address,
                path = %device_dir.display(),
                "Created device directory"
            );
        }

        Ok(device_dir)
    }

    /// Replace the device's snapshot file with `snapshot`, returning its path.
    pub fn write_snapshot(
        &self,
        device_dir: &Path,
        address: &str,
        snapshot: &[u8],
    ) -> Result<PathBuf> {
        validate_device_address(address)?;

        let path = device_dir.join(snapshot_file_name(address));
        io::write_atomic(&path, snapshot)?;

        tracing::debug!(path = %path.display(), bytes = snapshot.len(), "Wrote snapshot");
        Ok(path)
    }

    /// Take the exclusive capture lock for `address`. The root must exist.
    pub fn lock_device(&self, address: &str) -> Result<DeviceLock> {
        validate_device_address(address)?;
        DeviceLock::acquire(&self.root.join(lock_file_name(address)))
    }
}

/// Create a single directory level, treating "already exists" as success.
///
/// Returns whether this call created it.
fn create_dir_if_absent(path: &Path) -> Result<bool> {
    match fs::create_dir(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            if path.is_dir() {
                Ok(false)
            } else {
                Err(Error::NotADirectory {
                    path: path.to_path_buf(),
                })
            }
        }
        Err(e) => Err(Error::io(path, e)),
    }
}

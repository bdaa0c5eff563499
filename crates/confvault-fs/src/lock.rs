//! Per-device advisory locking

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

/// Exclusive advisory lock held for the lifetime of the guard.
///
/// Backed by `flock`/`LockFileEx`, so it serializes both threads holding
/// separate handles and separate processes.
#[derive(Debug)]
pub struct DeviceLock {
    file: File,
    path: PathBuf,
}

impl DeviceLock {
    /// Block until the lock at `path` is acquired, creating the file if needed.
    pub fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| Error::io(path, e))?;

        file.lock_exclusive().map_err(|source| Error::LockFailed {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "Acquired device lock");

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DeviceLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to release device lock"
            );
        }
    }
}

//! The capture pipeline

use std::path::{Path, PathBuf};
use std::thread;

use confvault_api::{DeviceApi, DeviceTarget};
use confvault_fs::BackupStore;
use confvault_git::{Author, CommitId, RevisionTracker};

use crate::{Error, Result};

/// What a capture did to the device history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revision {
    /// First capture of the device: repository created and first revision recorded.
    Initial(CommitId),
    /// Configuration differed from `HEAD`: new revision recorded.
    Changed(CommitId),
    /// Configuration identical to `HEAD`: history untouched.
    Unchanged,
}

impl Revision {
    pub fn commit(&self) -> Option<CommitId> {
        match self {
            Self::Initial(id) | Self::Changed(id) => Some(*id),
            Self::Unchanged => None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.commit().is_some()
    }
}

/// Result of one successful capture.
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub address: String,
    /// Snapshot file, rewritten on every capture.
    pub snapshot_path: PathBuf,
    pub snapshot_len: usize,
    pub revision: Revision,
}

/// Captures run at once by [`BackupOrchestrator::capture_all`] unless configured.
pub const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Runs captures against one backup root.
pub struct BackupOrchestrator<A> {
    api: A,
    store: BackupStore,
    author: Author,
    max_concurrent: usize,
}

impl<A: DeviceApi> BackupOrchestrator<A> {
    pub fn new(api: A, root: impl Into<PathBuf>) -> Self {
        Self {
            api,
            store: BackupStore::new(root),
            author: Author::default(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    pub fn with_author(mut self, author: Author) -> Self {
        self.author = author;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Limit how many captures [`capture_all`](Self::capture_all) runs at once.
    /// Zero is treated as one.
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Back up one device.
    ///
    /// Authenticates, fetches, writes the snapshot, and records a revision
    /// when it differs from the last one. The first failing stage aborts the
    /// rest; anything already written stays in place for the next attempt.
    pub fn capture(&self, target: &DeviceTarget) -> Result<CaptureOutcome> {
        let address = target.address.as_str();
        let store_err = |source| Error::Store {
            address: address.to_string(),
            source,
        };

        confvault_fs::validate_device_address(address).map_err(store_err)?;

        tracing::info!(address = %address, port = target.port, "Starting capture");

        let session = self
            .api
            .authenticate(target)
            .map_err(|source| Error::Auth {
                address: address.to_string(),
                source,
            })?;

        let fetched = self.api.fetch_config(&session, target);

        if let Err(e) = self.api.logout(session, target) {
            tracing::warn!(address = %address, error = %e, "Logout failed");
        }

        let snapshot = fetched.map_err(|source| Error::Fetch {
            address: address.to_string(),
            source,
        })?;

        let device_dir = self
            .store
            .ensure_device_directory(address)
            .map_err(store_err)?;

        let _lock = self.store.lock_device(address).map_err(store_err)?;

        let snapshot_path = self
            .store
            .write_snapshot(&device_dir, address, snapshot.as_bytes())
            .map_err(store_err)?;

        let revision = self
            .record_revision(&device_dir, &snapshot_path)
            .map_err(|source| Error::Repository {
                address: address.to_string(),
                source,
            })?;

        match revision {
            Revision::Initial(id) => {
                tracing::info!(address = %address, commit = %id.short(), "Recorded initial revision")
            }
            Revision::Changed(id) => {
                tracing::info!(address = %address, commit = %id.short(), "Configuration changed")
            }
            Revision::Unchanged => {
                tracing::info!(address = %address, "Configuration unchanged")
            }
        }

        Ok(CaptureOutcome {
            address: address.to_string(),
            snapshot_path,
            snapshot_len: snapshot.len(),
            revision,
        })
    }

    /// Open the device repository, creating it on first use, and commit
    /// the snapshot when it is new or changed.
    fn record_revision(
        &self,
        device_dir: &Path,
        snapshot_path: &Path,
    ) -> confvault_git::Result<Revision> {
        match RevisionTracker::open(device_dir) {
            Ok(tracker) => {
                if tracker.has_changes(snapshot_path)? {
                    Ok(Revision::Changed(
                        tracker.commit(snapshot_path, &self.author)?,
                    ))
                } else {
                    Ok(Revision::Unchanged)
                }
            }
            Err(confvault_git::Error::NotARepository { .. }) => {
                let tracker = RevisionTracker::initialize(device_dir)?;
                Ok(Revision::Initial(
                    tracker.commit(snapshot_path, &self.author)?,
                ))
            }
            Err(e) => Err(e),
        }
    }
}

impl<A: DeviceApi + Sync> BackupOrchestrator<A> {
    /// Capture several devices, at most `max_concurrent` at a time.
    ///
    /// Targets run in batches, one thread per target within a batch. Results
    /// come back in input order. One device failing never affects another;
    /// repeated addresses are serialized by the device lock.
    pub fn capture_all(&self, targets: &[DeviceTarget]) -> Vec<Result<CaptureOutcome>> {
        let mut results = Vec::with_capacity(targets.len());

        for batch in targets.chunks(self.max_concurrent) {
            tracing::debug!(devices = batch.len(), "Starting capture batch");
            results.extend(self.capture_batch(batch));
        }

        results
    }

    fn capture_batch(&self, batch: &[DeviceTarget]) -> Vec<Result<CaptureOutcome>> {
        thread::scope(|scope| {
            let handles: Vec<_> = batch
                .iter()
                .map(|target| scope.spawn(move || self.capture(target)))
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }
}

//! Captures into a backup root given relative to the working directory.
//!
//! Kept in its own test binary: it changes the process working directory.

use confvault_api::{ConfigSnapshot, MockDeviceApi};
use confvault_core::{BackupOrchestrator, Credentials, DeviceTarget, Revision};
use confvault_test_utils::git::{commit_count, head_file_contents};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

fn device_serving(config: &'static str) -> MockDeviceApi {
    let mut api = MockDeviceApi::new();
    api.expect_authenticate().returning(|_| Ok(()));
    api.expect_fetch_config()
        .returning(move |_, _| Ok(ConfigSnapshot::from(config)));
    api.expect_logout().returning(|_, _| Ok(()));
    api
}

#[test]
fn test_relative_backup_root_records_revisions() {
    let temp = TempDir::new().unwrap();
    std::env::set_current_dir(temp.path()).unwrap();
    let target = DeviceTarget::new("10.0.0.5", Credentials::new("admin", "pw"));

    let first = BackupOrchestrator::new(device_serving("conf-v1"), "backups")
        .capture(&target)
        .unwrap();
    let second = BackupOrchestrator::new(device_serving("conf-v1"), "backups")
        .capture(&target)
        .unwrap();
    let third = BackupOrchestrator::new(device_serving("conf-v2"), "backups")
        .capture(&target)
        .unwrap();

    assert!(matches!(first.revision, Revision::Initial(_)));
    assert_eq!(second.revision, Revision::Unchanged);
    assert!(matches!(third.revision, Revision::Changed(_)));

    let device_dir = temp.path().join("backups").join("10.0.0.5");
    assert_eq!(commit_count(&device_dir), 2);
    assert_eq!(
        head_file_contents(&device_dir, "10.0.0.5-config_backup.conf"),
        b"conf-v2"
    );
    assert!(!Path::new("backups/10.0.0.5/backups").exists());
}

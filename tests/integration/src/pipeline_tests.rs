//! End-to-end capture pipeline
//!
//! Real HTTP client against a loopback device, real filesystem, real git.

use confvault_api::HttpDeviceApi;
use confvault_core::{
    BackupOrchestrator, ClientOptions, Credentials, DeviceTarget, Revision, Stage,
};
use confvault_test_utils::device::{BACKUP_PATH, FakeDevice};
use confvault_test_utils::git::{commit_count, head_file_contents, head_message};
use pretty_assertions::assert_eq;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn orchestrator(root: &std::path::Path) -> BackupOrchestrator<HttpDeviceApi> {
    let api = HttpDeviceApi::new(ClientOptions {
        use_tls: false,
        timeout: Duration::from_secs(5),
        ..ClientOptions::default()
    });
    BackupOrchestrator::new(api, root)
}

fn target(device: &FakeDevice, address: &str, password: &str) -> DeviceTarget {
    DeviceTarget::new(address, Credentials::new("admin", password)).with_port(device.port())
}

// =============================================================================
// Revision semantics
// =============================================================================

#[test]
fn test_capture_sequence_records_only_changes() {
    let device = FakeDevice::start("admin", "s3cret");
    let temp = TempDir::new().unwrap();
    let orchestrator = orchestrator(temp.path());
    let target = target(&device, &device.address(), "s3cret");
    let device_dir = temp.path().join(device.address());
    let file = format!("{}-config_backup.conf", device.address());

    device.set_config("conf-v1");
    let first = orchestrator.capture(&target).unwrap();
    assert!(matches!(first.revision, Revision::Initial(_)));
    assert_eq!(commit_count(&device_dir), 1);

    let second = orchestrator.capture(&target).unwrap();
    assert_eq!(second.revision, Revision::Unchanged);
    assert_eq!(commit_count(&device_dir), 1);

    device.set_config("conf-v2");
    let third = orchestrator.capture(&target).unwrap();
    assert!(matches!(third.revision, Revision::Changed(_)));
    assert_eq!(commit_count(&device_dir), 2);

    assert_eq!(fs::read(device_dir.join(&file)).unwrap(), b"conf-v2");
    assert_eq!(head_file_contents(&device_dir, &file), b"conf-v2");
    assert_eq!(head_message(&device_dir), "Automated Commit");
}

#[test]
fn test_each_capture_is_login_fetch_logout() {
    let device = FakeDevice::start("admin", "s3cret");
    let temp = TempDir::new().unwrap();

    orchestrator(temp.path())
        .capture(&target(&device, &device.address(), "s3cret"))
        .unwrap();

    let paths: Vec<String> = device.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, ["/logincheck", BACKUP_PATH, "/logout"]);
}

#[test]
fn test_line_endings_are_preserved() {
    let device = FakeDevice::start("admin", "s3cret");
    let config = "config system global\r\n    set hostname \"edge\"\r\nend\r\n";
    device.set_config(config);
    let temp = TempDir::new().unwrap();

    let outcome = orchestrator(temp.path())
        .capture(&target(&device, &device.address(), "s3cret"))
        .unwrap();

    assert_eq!(fs::read(&outcome.snapshot_path).unwrap(), config.as_bytes());
    assert_eq!(outcome.snapshot_len, config.len());
}

#[test]
fn test_repository_without_commits_is_recovered() {
    let device = FakeDevice::start("admin", "s3cret");
    device.set_config("conf");
    let temp = TempDir::new().unwrap();
    let device_dir = temp.path().join(device.address());
    fs::create_dir_all(&device_dir).unwrap();
    git2::Repository::init(&device_dir).unwrap();

    let outcome = orchestrator(temp.path())
        .capture(&target(&device, &device.address(), "s3cret"))
        .unwrap();

    assert!(matches!(outcome.revision, Revision::Changed(_)));
    assert_eq!(commit_count(&device_dir), 1);
}

#[test]
fn test_retry_after_failed_fetch_commits() {
    let device = FakeDevice::start("admin", "s3cret");
    device.set_config("conf");
    let temp = TempDir::new().unwrap();
    let orchestrator = orchestrator(temp.path());
    let target = target(&device, &device.address(), "s3cret");

    device.set_backup_status(500);
    let err = orchestrator.capture(&target).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Fetch));

    device.set_backup_status(200);
    let outcome = orchestrator.capture(&target).unwrap();
    assert!(matches!(outcome.revision, Revision::Initial(_)));
}

// =============================================================================
// Failure isolation
// =============================================================================

#[test]
fn test_auth_failure_leaves_no_trace() {
    let device = FakeDevice::start("admin", "s3cret");
    let temp = TempDir::new().unwrap();

    let err = orchestrator(temp.path())
        .capture(&target(&device, &device.address(), "wrong"))
        .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Authenticate));
    assert!(device.requests_to(BACKUP_PATH).is_empty());
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_failing_device_does_not_affect_another() {
    let failing = FakeDevice::start("admin", "one");
    let healthy = FakeDevice::start("admin", "two");
    healthy.set_config("healthy config");
    let temp = TempDir::new().unwrap();
    let orchestrator = orchestrator(temp.path());

    // Two names for loopback give two independent device directories.
    let targets = [
        target(&failing, "localhost", "not-one"),
        target(&healthy, &healthy.address(), "two"),
    ];
    let results = orchestrator.capture_all(&targets);

    assert_eq!(
        results[0].as_ref().unwrap_err().stage(),
        Some(Stage::Authenticate)
    );
    let outcome = results[1].as_ref().unwrap();
    assert!(outcome.revision.is_new());
    assert!(!temp.path().join("localhost").exists());
    assert_eq!(commit_count(&temp.path().join(healthy.address())), 1);
}

#[test]
fn test_store_layout() {
    let device = FakeDevice::start("admin", "s3cret");
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("backups");

    orchestrator(&root)
        .capture(&target(&device, &device.address(), "s3cret"))
        .unwrap();

    let mut entries: Vec<String> = fs::read_dir(root.join(device.address()))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();
    assert_eq!(
        entries,
        [".git".to_string(), format!("{}-config_backup.conf", device.address())]
    );
    assert!(root.join(confvault_fs::lock_file_name(&device.address())).is_file());
}

//! HttpDeviceApi against a loopback fake device.

use confvault_api::client::{CONFIG_BACKUP_PATH, LOGIN_PATH, LOGOUT_PATH};
use confvault_api::{ClientOptions, Credentials, DeviceApi, DeviceTarget, Error, HttpDeviceApi};
use confvault_test_utils::device::FakeDevice;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::time::Duration;

fn plain_http() -> HttpDeviceApi {
    HttpDeviceApi::new(ClientOptions {
        use_tls: false,
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
        ..ClientOptions::default()
    })
}

fn target_for(device: &FakeDevice, username: &str, password: &str) -> DeviceTarget {
    DeviceTarget::new(device.address(), Credentials::new(username, password))
        .with_port(device.port())
}

#[test]
fn test_login_posts_form_credentials() {
    let device = FakeDevice::start("admin", "s3cret");
    let target = target_for(&device, "admin", "s3cret");

    plain_http().authenticate(&target).unwrap();

    let logins = device.requests_to(LOGIN_PATH);
    assert_eq!(logins.len(), 1);
    assert_eq!(logins[0].method, "POST");
    assert_eq!(logins[0].body, "username=admin&secretkey=s3cret");
    assert!(
        logins[0]
            .header("content-type")
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
    );
}

#[test]
fn test_session_token_is_unquoted_cookie_value() {
    let device = FakeDevice::start("admin", "s3cret");
    let target = target_for(&device, "admin", "s3cret");

    let session = plain_http().authenticate(&target).unwrap();

    assert_eq!(session.csrf_token(), device.token());
}

#[test]
fn test_fetch_sends_token_and_returns_body_verbatim() {
    let device = FakeDevice::start("admin", "s3cret");
    let config = "#config-version=FGT60F-7.2.5\r\nconfig system global\n    set hostname \"fw\"\nend\n";
    device.set_config(config);
    let target = target_for(&device, "admin", "s3cret");
    let api = plain_http();

    let session = api.authenticate(&target).unwrap();
    let snapshot = api.fetch_config(&session, &target).unwrap();

    assert_eq!(snapshot.as_bytes(), config.as_bytes());

    let fetches = device.requests_to(CONFIG_BACKUP_PATH);
    assert_eq!(fetches.len(), 1, "exactly one backup request");
    assert_eq!(fetches[0].method, "GET");
    assert_eq!(
        fetches[0].header("x-csrftoken"),
        Some(device.token().as_str())
    );
}

#[test]
fn test_fetch_empty_config() {
    let device = FakeDevice::start("admin", "s3cret");
    let target = target_for(&device, "admin", "s3cret");
    let api = plain_http();

    let session = api.authenticate(&target).unwrap();
    let snapshot = api.fetch_config(&session, &target).unwrap();

    assert!(snapshot.is_empty());
}

#[test]
fn test_wrong_password_is_missing_token() {
    let device = FakeDevice::start("admin", "s3cret");
    let target = target_for(&device, "admin", "n0t-the-s3cret");

    let err = plain_http().authenticate(&target).unwrap_err();

    assert!(
        matches!(err, Error::MissingToken { cookie: "ccsrftoken" }),
        "got {err:?}"
    );
    assert!(!err.to_string().contains("n0t-the-s3cret"));
}

#[test]
fn test_login_without_token_cookie_is_rejected() {
    let device = FakeDevice::start("admin", "s3cret");
    device.set_issue_token(false);
    let target = target_for(&device, "admin", "s3cret");

    let err = plain_http().authenticate(&target).unwrap_err();

    assert!(matches!(err, Error::MissingToken { .. }), "got {err:?}");
    assert!(device.requests_to(CONFIG_BACKUP_PATH).is_empty());
}

#[rstest]
#[case(403)]
#[case(404)]
#[case(500)]
fn test_fetch_error_status_is_surfaced(#[case] status: u16) {
    let device = FakeDevice::start("admin", "s3cret");
    device.set_config("should never be returned");
    device.set_backup_status(status);
    let target = target_for(&device, "admin", "s3cret");
    let api = plain_http();

    let session = api.authenticate(&target).unwrap();
    let err = api.fetch_config(&session, &target).unwrap_err();

    assert!(
        matches!(err, Error::FetchStatus { status: s } if s == status),
        "got {err:?}"
    );
    assert!(err.to_string().contains(&status.to_string()));
}

#[test]
fn test_logout_uses_session_token() {
    let device = FakeDevice::start("admin", "s3cret");
    let target = target_for(&device, "admin", "s3cret");
    let api = plain_http();

    let session = api.authenticate(&target).unwrap();
    api.logout(session, &target).unwrap();

    let logouts = device.requests_to(LOGOUT_PATH);
    assert_eq!(logouts.len(), 1);
    assert_eq!(
        logouts[0].header("x-csrftoken"),
        Some(device.token().as_str())
    );
}

#[test]
fn test_unreachable_device_is_login_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let target = DeviceTarget::new("127.0.0.1", Credentials::new("admin", "pw")).with_port(port);
    let err = plain_http().authenticate(&target).unwrap_err();

    assert!(matches!(err, Error::LoginTransport { .. }), "got {err:?}");
}

#[test]
fn test_sessions_are_independent() {
    let first = FakeDevice::start("admin", "one");
    let second = FakeDevice::start("admin", "two");
    let api = plain_http();

    let a = api.authenticate(&target_for(&first, "admin", "one")).unwrap();
    let err = api
        .authenticate(&target_for(&second, "admin", "one"))
        .unwrap_err();

    assert!(matches!(err, Error::MissingToken { .. }));
    assert!(
        api.fetch_config(&a, &target_for(&first, "admin", "one"))
            .is_ok()
    );
}

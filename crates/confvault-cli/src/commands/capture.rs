//! Capture command implementation

use std::time::Duration;

use colored::Colorize;
use confvault_api::HttpDeviceApi;
use confvault_core::{BackupOrchestrator, ClientOptions, Credentials, DeviceTarget};

use super::report::DeviceReport;
use crate::cli::CaptureArgs;
use crate::error::{CliError, Result};

/// Run the capture command
pub fn run_capture(args: &CaptureArgs) -> Result<()> {
    let report = capture_with(args, |var| std::env::var(var).ok())?;

    println!("{}", "Capture".bold());
    report.print();
    Ok(())
}

/// Capture one device, resolving the password through `lookup`.
pub fn capture_with(
    args: &CaptureArgs,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<DeviceReport> {
    let secret = lookup(&args.password_env).ok_or_else(|| {
        CliError::user(format!(
            "environment variable {} is not set",
            args.password_env
        ))
    })?;

    let target = DeviceTarget::new(&args.address, Credentials::new(&args.username, secret))
        .with_port(args.port);

    let api = HttpDeviceApi::new(ClientOptions {
        verify_tls: !args.insecure,
        use_tls: !args.plain_http,
        timeout: Duration::from_secs(args.timeout),
        ..ClientOptions::default()
    });

    let outcome = BackupOrchestrator::new(api, &args.root).capture(&target)?;
    Ok(DeviceReport::from_outcome(&outcome))
}

//! Inventory run implementation

use std::path::Path;

use colored::Colorize;
use confvault_api::HttpDeviceApi;
use confvault_core::{BackupOrchestrator, DeviceTarget, Settings};

use super::report::DeviceReport;
use crate::error::{CliError, Result};

/// Run the inventory command
///
/// Every device is attempted; the command fails afterwards if any did.
pub fn run_inventory(config: &Path, json: bool) -> Result<()> {
    let settings = Settings::load(config)?;
    let targets = settings.targets()?;
    if targets.is_empty() {
        return Err(CliError::user(format!(
            "no devices configured in {}",
            config.display()
        )));
    }

    let reports = capture_inventory(&settings, &targets);

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!(
            "{} {} devices into {}",
            "Capturing".bold(),
            targets.len(),
            settings.backup_root.display()
        );
        for report in &reports {
            report.print();
        }
    }

    let failed = reports.iter().filter(|r| r.is_failure()).count();
    if failed > 0 {
        return Err(CliError::PartialFailure {
            failed,
            total: reports.len(),
        });
    }
    Ok(())
}

/// Capture all targets concurrently, one report per target in input order.
pub fn capture_inventory(settings: &Settings, targets: &[DeviceTarget]) -> Vec<DeviceReport> {
    let api = HttpDeviceApi::new(settings.client_options());
    let orchestrator = BackupOrchestrator::new(api, &settings.backup_root)
        .with_author(settings.author())
        .with_max_concurrent(settings.max_concurrent);

    orchestrator
        .capture_all(targets)
        .iter()
        .zip(targets)
        .map(|(result, target)| DeviceReport::from_result(&target.address, result))
        .collect()
}

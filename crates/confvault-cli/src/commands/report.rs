//! Per-device result lines shared by `capture` and `run`

use colored::Colorize;
use confvault_core::{CaptureOutcome, Revision};
use serde::Serialize;

/// One device's result, printable or serializable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceReport {
    pub address: String,
    /// `initial`, `changed`, `unchanged` or `failed`
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeviceReport {
    pub fn from_result(address: &str, result: &confvault_core::Result<CaptureOutcome>) -> Self {
        match result {
            Ok(outcome) => Self::from_outcome(outcome),
            Err(e) => Self {
                address: address.to_string(),
                status: "failed",
                commit: None,
                stage: e.stage().map(|s| s.as_str()),
                error: Some(e.to_string()),
            },
        }
    }

    pub fn from_outcome(outcome: &CaptureOutcome) -> Self {
        let status = match outcome.revision {
            Revision::Initial(_) => "initial",
            Revision::Changed(_) => "changed",
            Revision::Unchanged => "unchanged",
        };
        Self {
            address: outcome.address.clone(),
            status,
            commit: outcome.revision.commit().map(|id| id.to_string()),
            stage: None,
            error: None,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    pub fn print(&self) {
        let short = self
            .commit
            .as_deref()
            .map(|id| &id[..id.len().min(7)])
            .unwrap_or_default();

        match (self.status, &self.error) {
            (_, Some(error)) => println!("  {} {} {}", "x".red(), self.address.cyan(), error),
            ("unchanged", None) => {
                println!("  {} {} {}", "=".dimmed(), self.address.cyan(), "unchanged".dimmed())
            }
            (status, None) => println!(
                "  {} {} {} {}",
                "+".green(),
                self.address.cyan(),
                status,
                short.yellow()
            ),
        }
    }
}

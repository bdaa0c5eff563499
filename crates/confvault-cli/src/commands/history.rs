//! History command implementation

use std::path::Path;

use colored::Colorize;
use confvault_fs::BackupStore;
use confvault_git::{RevisionInfo, RevisionTracker};
use serde::Serialize;

use crate::error::Result;

#[derive(Debug, Serialize)]
struct RevisionEntry {
    commit: String,
    message: String,
    author: String,
    timestamp: String,
}

impl From<&RevisionInfo> for RevisionEntry {
    fn from(info: &RevisionInfo) -> Self {
        Self {
            commit: info.id.to_string(),
            message: info.message.clone(),
            author: info.author.clone(),
            timestamp: info.timestamp.to_rfc3339(),
        }
    }
}

/// Run the history command
pub fn run_history(root: &Path, address: &str, max_count: usize, json: bool) -> Result<()> {
    let revisions = load_history(root, address, max_count)?;

    if json {
        let entries: Vec<RevisionEntry> = revisions.iter().map(RevisionEntry::from).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{} {}", "History".bold(), address.cyan());
    if revisions.is_empty() {
        println!("  {}", "No revisions".dimmed());
    }
    for revision in &revisions {
        println!(
            "  {} {} {} {}",
            revision.id.short().yellow(),
            revision.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            revision.author.dimmed(),
            revision.message
        );
    }
    Ok(())
}

pub fn load_history(root: &Path, address: &str, max_count: usize) -> Result<Vec<RevisionInfo>> {
    confvault_fs::validate_device_address(address)?;
    let device_dir = BackupStore::new(root).device_dir(address);

    let tracker = RevisionTracker::open(&device_dir)?;
    Ok(tracker.history(max_count)?)
}

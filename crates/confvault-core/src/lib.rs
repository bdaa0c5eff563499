//! Capture pipeline for confvault
//!
//! Ties the layer below together into one operation per device:
//!
//! ```text
//!            BackupOrchestrator::capture
//!                       |
//!     +-----------------+------------------+
//!     |                 |                  |
//! confvault-api   confvault-fs      confvault-git
//! (login, fetch)  (layout, write)   (diff, commit)
//! ```
//!
//! Each stage receives the previous stage's output; a failure stops the
//! pipeline and is reported with the [`Stage`] it happened in.

pub mod capture;
pub mod config;
pub mod error;

pub use capture::{BackupOrchestrator, CaptureOutcome, DEFAULT_MAX_CONCURRENT, Revision};
pub use config::{AuthorSection, DeviceEntry, HttpSection, Settings};
pub use error::{Error, Result, Stage};

pub use confvault_api::{ClientOptions, ConfigSnapshot, Credentials, DeviceApi, DeviceTarget};
pub use confvault_git::{Author, CommitId};

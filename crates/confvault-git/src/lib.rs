//! Git revision tracking for confvault
//!
//! Each device directory is its own repository holding a single tracked file.
//! [`RevisionTracker`] opens or creates that repository, decides whether the
//! working file differs from `HEAD`, and records a new revision when it does.

pub mod error;
pub mod history;
pub mod tracker;

pub use error::{Error, Result};
pub use history::RevisionInfo;
pub use tracker::{Author, COMMIT_MESSAGE, CommitId, RevisionTracker};

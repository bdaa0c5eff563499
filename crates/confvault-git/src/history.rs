//! Revision history of a device repository.

use chrono::{DateTime, TimeZone, Utc};

use crate::{CommitId, Result, RevisionTracker};

/// A single recorded revision.
#[derive(Debug, Clone)]
pub struct RevisionInfo {
    pub id: CommitId,

    /// First line of the commit message
    pub message: String,

    pub author: String,

    pub timestamp: DateTime<Utc>,
}

impl RevisionTracker {
    /// The last `max_count` revisions reachable from `HEAD`, newest first.
    ///
    /// An empty repository has no history and yields an empty list.
    pub fn history(&self, max_count: usize) -> Result<Vec<RevisionInfo>> {
        let Some(head) = self.head_commit()? else {
            return Ok(Vec::new());
        };

        let repo = self.repository();
        let mut revwalk = repo.revwalk()?;
        revwalk.push(head.id())?;
        revwalk.set_sorting(git2::Sort::TIME)?;

        let mut revisions = Vec::with_capacity(max_count.min(64));

        for oid_result in revwalk.take(max_count) {
            let oid = oid_result?;
            let commit = repo.find_commit(oid)?;

            let timestamp = Utc
                .timestamp_opt(commit.time().seconds(), 0)
                .single()
                .unwrap_or_default();

            let message = commit
                .message()
                .unwrap_or("")
                .lines()
                .next()
                .unwrap_or("")
                .to_string();

            let author = commit.author().name().unwrap_or("Unknown").to_string();

            revisions.push(RevisionInfo {
                id: CommitId::from(oid),
                message,
                author,
                timestamp,
            });
        }

        Ok(revisions)
    }

    /// Number of revisions reachable from `HEAD`.
    pub fn revision_count(&self) -> Result<usize> {
        let Some(head) = self.head_commit()? else {
            return Ok(0);
        };

        let mut revwalk = self.repository().revwalk()?;
        revwalk.push(head.id())?;

        let mut count = 0;
        for oid in revwalk {
            oid?;
            count += 1;
        }
        Ok(count)
    }
}

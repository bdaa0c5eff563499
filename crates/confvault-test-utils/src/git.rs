//! Read-only inspection of device repositories.
//!
//! All helpers panic on failure; they are meant for assertions.

use std::path::Path;

fn open(path: &Path) -> git2::Repository {
    git2::Repository::open(path)
        .unwrap_or_else(|e| panic!("failed to open repository at {}: {e}", path.display()))
}

/// Number of commits reachable from `HEAD`, or 0 for an unborn branch.
pub fn commit_count(path: &Path) -> usize {
    let repo = open(path);
    let head = match repo.head() {
        Ok(head) => head,
        Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return 0,
        Err(e) => panic!("commit_count: failed to resolve HEAD: {e}"),
    };
    let oid = head
        .target()
        .unwrap_or_else(|| panic!("commit_count: HEAD is symbolic"));

    let mut revwalk = repo.revwalk().unwrap();
    revwalk.push(oid).unwrap();
    revwalk.count()
}

/// Message of the commit at `HEAD`.
pub fn head_message(path: &Path) -> String {
    let repo = open(path);
    let commit = repo
        .head()
        .and_then(|h| h.peel_to_commit())
        .unwrap_or_else(|e| panic!("head_message: no HEAD commit: {e}"));
    commit.message().unwrap_or_default().to_string()
}

/// Content of `file` as committed at `HEAD`.
pub fn head_file_contents(path: &Path, file: &str) -> Vec<u8> {
    let repo = open(path);
    let tree = repo
        .head()
        .and_then(|h| h.peel_to_tree())
        .unwrap_or_else(|e| panic!("head_file_contents: no HEAD tree: {e}"));
    let entry = tree
        .get_path(Path::new(file))
        .unwrap_or_else(|e| panic!("head_file_contents: {file} not in HEAD: {e}"));
    let blob = repo
        .find_blob(entry.id())
        .unwrap_or_else(|e| panic!("head_file_contents: blob missing: {e}"));
    blob.content().to_vec()
}

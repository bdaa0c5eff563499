//! Error types for confvault-git

use std::path::PathBuf;

/// Result type for confvault-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in confvault-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Not a git repository: {path}")]
    NotARepository { path: PathBuf },

    #[error("Repository at {path} has no working directory")]
    BareRepository { path: PathBuf },

    #[error("{file} is not inside the repository at {workdir}")]
    OutsideWorkdir { file: PathBuf, workdir: PathBuf },

    #[error("Path {path} is not valid UTF-8")]
    NonUtf8Path { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

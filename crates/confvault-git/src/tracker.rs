//! Single-file revision tracking on top of git2

use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use git2::{
    Commit, ErrorCode, IndexEntry, IndexTime, ObjectType, Oid, Repository, RepositoryOpenFlags,
    Signature,
};

use crate::{Error, Result};

/// Message recorded on every revision.
pub const COMMIT_MESSAGE: &str = "Automated Commit";

const BLOB_MODE: u32 = 0o100644;

/// Identifier of a recorded revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommitId(Oid);

impl CommitId {
    pub fn as_oid(&self) -> Oid {
        self.0
    }

    /// Abbreviated 7 character form.
    pub fn short(&self) -> String {
        format!("{:.7}", self.0)
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Oid> for CommitId {
    fn from(oid: Oid) -> Self {
        Self(oid)
    }
}

/// Identity used as author and committer of recorded revisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl Author {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl Default for Author {
    fn default() -> Self {
        Self::new("confvault", "confvault@localhost")
    }
}

/// A device repository: one working directory, one tracked snapshot file.
pub struct RevisionTracker {
    repo: Repository,
    workdir: PathBuf,
}

impl RevisionTracker {
    /// Open the repository rooted exactly at `path`.
    ///
    /// Parent directories are never searched, so a device directory inside
    /// some other checkout still reports [`Error::NotARepository`].
    pub fn open(path: &Path) -> Result<Self> {
        let repo = match Repository::open_ext(
            path,
            RepositoryOpenFlags::NO_SEARCH,
            std::iter::empty::<&OsStr>(),
        ) {
            Ok(repo) => repo,
            Err(e) if e.code() == ErrorCode::NotFound => {
                return Err(Error::NotARepository {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        Self::from_repository(repo, path)
    }

    /// Create a new, empty repository at `path`.
    pub fn initialize(path: &Path) -> Result<Self> {
        let repo = Repository::init(path)?;
        tracing::info!(path = %path.display(), "Initialized device repository");
        Self::from_repository(repo, path)
    }

    fn from_repository(repo: Repository, path: &Path) -> Result<Self> {
        if repo.is_bare() {
            return Err(Error::BareRepository {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            repo,
            workdir: path.to_path_buf(),
        })
    }

    /// Working directory the tracker was opened on.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Underlying git2 repository.
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Whether `file` differs from its committed version at `HEAD`.
    ///
    /// Compares content hashes only; rewriting identical bytes is not a
    /// change. A repository without commits, or a `HEAD` that does not
    /// contain the file, always reports a change.
    pub fn has_changes(&self, file: &Path) -> Result<bool> {
        let rel = self.relative_path(file)?;

        let Some(head) = self.head_commit()? else {
            tracing::debug!(workdir = %self.workdir.display(), "HEAD is unborn");
            return Ok(true);
        };

        let committed = match head.tree()?.get_path(Path::new(&rel)) {
            Ok(entry) => entry.id(),
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(true),
            Err(e) => return Err(e.into()),
        };

        let bytes = read_file(&self.workdir.join(&rel))?;
        let current = Oid::hash_object(ObjectType::Blob, &bytes)?;

        Ok(committed != current)
    }

    /// Stage the current content of `file` and commit it on top of `HEAD`.
    pub fn commit(&self, file: &Path, author: &Author) -> Result<CommitId> {
        let rel = self.relative_path(file)?;
        let bytes = read_file(&self.workdir.join(&rel))?;

        // Staged straight from the bytes so the blob id matches what
        // `has_changes` hashes, independent of checkout filters.
        let entry = IndexEntry {
            ctime: IndexTime::new(0, 0),
            mtime: IndexTime::new(0, 0),
            dev: 0,
            ino: 0,
            mode: BLOB_MODE,
            uid: 0,
            gid: 0,
            file_size: u32::try_from(bytes.len()).unwrap_or(u32::MAX),
            id: Oid::zero(),
            flags: 0,
            flags_extended: 0,
            path: rel.as_bytes().to_vec(),
        };

        let mut index = self.repo.index()?;
        index.add_frombuffer(&entry, &bytes)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = Signature::now(&author.name, &author.email)?;

        let parent = self.head_commit()?;
        let parents: Vec<&Commit<'_>> = parent.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            COMMIT_MESSAGE,
            &tree,
            &parents,
        )?;

        tracing::debug!(commit = %oid, file = %rel, "Recorded revision");
        Ok(CommitId(oid))
    }

    /// The commit `HEAD` points at, if any.
    pub fn head(&self) -> Result<Option<CommitId>> {
        Ok(self.head_commit()?.map(|c| CommitId(c.id())))
    }

    pub(crate) fn head_commit(&self) -> Result<Option<Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Repository-relative, forward-slash path for `file`.
    fn relative_path(&self, file: &Path) -> Result<String> {
        repo_relative(&self.workdir, file)
    }
}

/// Resolve `file` against `workdir`.
///
/// Paths under `workdir` (both absolute, or both relative to the current
/// directory) are stripped of it. Any other relative path must be a bare file
/// name already inside the repository.
fn repo_relative(workdir: &Path, file: &Path) -> Result<String> {
    let rel = match file.strip_prefix(workdir) {
        Ok(rel) => rel,
        Err(_) if file.is_relative() && file.components().count() == 1 => file,
        Err(_) => {
            return Err(Error::OutsideWorkdir {
                file: file.to_path_buf(),
                workdir: workdir.to_path_buf(),
            });
        }
    };

    let rel_str = rel.to_str().ok_or_else(|| Error::NonUtf8Path {
        path: file.to_path_buf(),
    })?;

    Ok(rel_str.replace('\\', "/"))
}

fn read_file(file: &Path) -> Result<Vec<u8>> {
    fs::read(file).map_err(|source| Error::Io {
        path: file.to_path_buf(),
        source,
    })
}

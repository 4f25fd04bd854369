//! Repository access for version resolution.
//!
//! The resolution engine never talks to libgit2 directly. It consumes two
//! collaborator traits:
//!
//! - [`RepositoryAccess`] - references, tags, commit history, tag creation
//! - [`StatusProvider`] - working tree modification state
//!
//! [`GitRepository`] implements both on top of the `git2` crate.

mod repository;
mod status;

#[cfg(test)]
pub(crate) mod memory;

use std::fmt;

use thiserror::Error;

pub use repository::GitRepository;
pub use status::{ChangeState, FileStatus, WorkingTree, WorkingTreeStatus};

/// Errors from repository operations.
#[derive(Error, Debug)]
pub enum GitError {
    /// libgit2 reported a failure (object lookup, reference update, status...).
    #[error(transparent)]
    Git(#[from] git2::Error),

    /// The given path is not inside a git repository.
    #[error("repository does not exist")]
    NotARepo,

    /// The repository has no working tree to inspect.
    #[error("repository has no working tree")]
    Bare,
}

/// Result alias for repository operations.
pub type GitResult<T> = Result<T, GitError>;

/// Identity of a commit or object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash(git2::Oid);

impl Hash {
    /// The all-zero hash, used when there is no commit to point at.
    pub fn zero() -> Self {
        Self(git2::Oid::zero())
    }

    /// Whether this is the all-zero hash.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Parse a full hexadecimal object id.
    pub fn from_hex(hex: &str) -> GitResult<Self> {
        Ok(Self(git2::Oid::from_str(hex)?))
    }

    /// The underlying libgit2 object id.
    pub const fn oid(&self) -> git2::Oid {
        self.0
    }
}

impl Default for Hash {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<git2::Oid> for Hash {
    fn from(oid: git2::Oid) -> Self {
        Self(oid)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A named pointer resolving to a commit or tag object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    /// Full reference name (e.g. `refs/tags/v1.2.3`, `refs/heads/main`).
    pub name: String,
    /// The object the reference points at.
    pub target: Hash,
}

impl Reference {
    /// Reference name without its `refs/<kind>/` namespace.
    pub fn short_name(&self) -> &str {
        ["refs/tags/", "refs/heads/", "refs/remotes/"]
            .iter()
            .find_map(|prefix| self.name.strip_prefix(prefix))
            .unwrap_or(&self.name)
    }
}

/// An annotated tag object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotatedTag {
    /// Name recorded in the tag object.
    pub name: String,
    /// The tagged commit, or `None` when the tag points at something else.
    pub target_commit: Option<Hash>,
    /// Tag message.
    pub message: String,
}

/// A commit as seen by the history walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitInfo {
    /// Commit id.
    pub hash: Hash,
    /// Parent commit ids.
    pub parents: Vec<Hash>,
    /// Committer timestamp, seconds since the Unix epoch.
    pub committer_time: i64,
}

/// Order in which [`RepositoryAccess::log_from`] yields commits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogOrder {
    /// Newest committer timestamp first.
    ///
    /// This approximates recency. With clock skew or criss-crossing merges it
    /// is not a topological order.
    #[default]
    CommitterTime,
}

/// Lazily evaluated commit history.
pub type CommitLog<'a> = Box<dyn Iterator<Item = GitResult<CommitInfo>> + 'a>;

/// Read and write access to a repository's references and history.
pub trait RepositoryAccess {
    /// The currently checked out commit, or `None` for an unborn branch.
    fn head(&self) -> GitResult<Option<Reference>>;

    /// Every reference under `refs/tags/`.
    fn tags(&self) -> GitResult<Vec<Reference>>;

    /// Look up `hash` as an annotated tag object.
    ///
    /// Returns `None` when no tag object with that id exists, which is the
    /// case for lightweight tags pointing straight at a commit.
    fn tag_object(&self, hash: &Hash) -> GitResult<Option<AnnotatedTag>>;

    /// History reachable from `from`, starting with `from` itself.
    fn log_from(&self, from: &Hash, order: LogOrder) -> GitResult<CommitLog<'_>>;

    /// Resolve an abbreviated hash. `None` when unknown or ambiguous.
    fn resolve_revision(&self, partial: &str) -> GitResult<Option<Hash>>;

    /// Create an annotated tag `name` at `target` carrying `message`.
    ///
    /// Fails without side effects if the tag already exists.
    fn create_annotated_tag(&self, name: &str, target: &Hash, message: &str)
    -> GitResult<Reference>;
}

/// Computes the modification state of a working tree.
pub trait StatusProvider {
    /// Working tree location and per-path change states.
    fn status(&self) -> GitResult<(WorkingTree, WorkingTreeStatus)>;
}

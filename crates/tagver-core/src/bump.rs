//! Release tagging.
//!
//! # Two-phase workflow
//!
//! 1. **Plan** ([`plan_bump`]) - check preconditions, resolve the latest
//!    release and compute the next version and tag message.
//! 2. **Execute** ([`BumpPlan::execute`]) - create the annotated tag.
//!
//! [`bump`] runs both phases.

use semver::Version;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::git::{GitError, Hash, Reference, RepositoryAccess, StatusProvider};
use crate::latest::latest;
use crate::version::{BumpLevel, VersionError, next_version};

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// Errors from bump operations.
#[derive(Error, Debug)]
pub enum BumpError {
    /// There is no commit to tag.
    #[error("repository is empty")]
    RepositoryIsEmpty,

    /// The working tree has uncommitted or untracked changes.
    #[error("repository contains uncommitted changes")]
    RepositoryIsDirty,

    /// Repository access or tag creation failed.
    #[error(transparent)]
    Git(#[from] GitError),

    /// The next version cannot be represented.
    #[error(transparent)]
    Version(#[from] VersionError),
}

/// Result alias for bump operations.
pub type BumpResult<T> = Result<T, BumpError>;

// ──────────────────────────────────────────────
// Plan
// ──────────────────────────────────────────────

/// A bump that passed its preconditions and is ready to tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpPlan {
    /// Commit that will be tagged.
    pub target: Hash,
    /// Tag prefix carried over from the previous release.
    pub prefix: String,
    /// The latest release (or the baseline when there is none).
    pub previous: Version,
    /// The version being released.
    pub next: Version,
    /// Whether no release tag existed before.
    pub first_release: bool,
}

impl BumpPlan {
    /// Name of the previous release tag.
    pub fn previous_tag(&self) -> String {
        format!("{}{}", self.prefix, self.previous)
    }

    /// Name of the tag to create.
    pub fn tag_name(&self) -> String {
        format!("{}{}", self.prefix, self.next)
    }

    /// Annotation carried by the new tag.
    pub fn message(&self) -> String {
        if self.first_release {
            format!("first version {}", self.tag_name())
        } else {
            format!("bump version {} → {}", self.previous_tag(), self.tag_name())
        }
    }
}

/// Check preconditions and compute the next release.
///
/// Preconditions are checked in order: `start` must be present, then the
/// working tree must be clean (untracked files count as changes).
///
/// # Errors
///
/// [`BumpError::RepositoryIsEmpty`], [`BumpError::RepositoryIsDirty`], or a
/// repository failure while resolving the latest release.
#[instrument(skip(repo, start), fields(%level))]
pub fn plan_bump<R>(repo: &R, start: Option<&Reference>, level: BumpLevel) -> BumpResult<BumpPlan>
where
    R: RepositoryAccess + StatusProvider + ?Sized,
{
    let start = start.ok_or(BumpError::RepositoryIsEmpty)?;

    let (_, status) = repo.status()?;
    if !status.is_clean() {
        debug!(changed = status.changed().count(), "refusing to bump dirty tree");
        return Err(BumpError::RepositoryIsDirty);
    }

    let resolved = latest(repo, Some(start))?;
    let next = next_version(&resolved.version, level)?;
    debug!(previous = %resolved.version, %next, "computed next version");

    Ok(BumpPlan {
        target: start.target,
        first_release: resolved.guide.tags.is_empty(),
        prefix: resolved.prefix,
        previous: resolved.version,
        next,
    })
}

// ──────────────────────────────────────────────
// Execute
// ──────────────────────────────────────────────

/// Result of a successful bump.
#[derive(Debug, Clone, Serialize)]
pub struct BumpOutcome {
    /// Short name of the created tag.
    pub tag: String,
    /// The previous release, prefix included.
    pub previous: String,
    /// The new release, prefix included.
    pub next: String,
    /// Annotation of the created tag.
    pub message: String,
    /// The created reference.
    #[serde(skip)]
    pub reference: Reference,
}

impl BumpPlan {
    /// Create the annotated tag.
    ///
    /// Tag creation never overwrites an existing tag; on failure no tag is
    /// left behind.
    ///
    /// # Errors
    ///
    /// Propagates tag creation failures, including name collisions.
    #[instrument(skip(self, repo), fields(tag = %self.tag_name()))]
    pub fn execute<R: RepositoryAccess + ?Sized>(&self, repo: &R) -> BumpResult<BumpOutcome> {
        let tag = self.tag_name();
        let message = self.message();
        let reference = repo.create_annotated_tag(&tag, &self.target, &message)?;

        info!(%tag, target = %self.target, "created tag");

        Ok(BumpOutcome {
            tag,
            previous: self.previous_tag(),
            next: self.tag_name(),
            message,
            reference,
        })
    }
}

/// Tag the commit at `start` with the next `level` release.
///
/// # Errors
///
/// See [`plan_bump`] and [`BumpPlan::execute`].
pub fn bump<R>(repo: &R, start: Option<&Reference>, level: BumpLevel) -> BumpResult<BumpOutcome>
where
    R: RepositoryAccess + StatusProvider + ?Sized,
{
    plan_bump(repo, start, level)?.execute(repo)
}

//! Floating development versions.
//!
//! [`build`] turns the latest release into a version describing the current
//! state: unchanged when sitting clean on a release tag, otherwise a
//! `dev.<depth>` prerelease above it, optionally stamped with the working
//! tree's modification time and the abbreviated commit hash.
//!
//! [`describe`] wires the pieces together for a repository.

use chrono::{DateTime, Utc};
use semver::{BuildMetadata, Prerelease};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::dirty::{DirtyError, modification_time};
use crate::git::{GitError, RepositoryAccess, StatusProvider};
use crate::guide::abbreviated_hash;
use crate::latest::{ResolvedVersion, latest};
use crate::version::{VersionError, increment};

/// Format of the dirty timestamp appended to the prerelease.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Errors from describing a repository.
#[derive(Error, Debug)]
pub enum DescribeError {
    /// Repository access failed.
    #[error(transparent)]
    Git(#[from] GitError),

    /// The modification time scan failed.
    #[error(transparent)]
    Dirty(#[from] DirtyError),

    /// The synthesized version was not valid semver or overflowed.
    #[error(transparent)]
    Version(#[from] VersionError),
}

/// Result alias for describe operations.
pub type DescribeResult<T> = Result<T, DescribeError>;

/// Options for [`describe`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DescribeOptions {
    /// Attach `g<abbreviated hash>` as build metadata.
    pub add_commit_hash: bool,
}

/// The floating version of a repository.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Description {
    /// The version, its prefix and guide.
    #[serde(flatten)]
    pub resolved: ResolvedVersion,
    /// Latest modification time of the working tree, when dirty.
    pub dirty: Option<DateTime<Utc>>,
}

/// Build the floating version from the latest release.
///
/// # Errors
///
/// Fails when abbreviating the commit hash fails or the synthesized
/// identifiers are not valid semver.
pub fn build<R: RepositoryAccess + ?Sized>(
    repo: &R,
    resolved: ResolvedVersion,
    dirty: Option<DateTime<Utc>>,
    include_commit_metadata: bool,
) -> DescribeResult<ResolvedVersion> {
    if dirty.is_none() && resolved.guide.depth == 0 {
        return Ok(resolved);
    }

    let mut resolved = resolved;
    let version = &mut resolved.version;
    if version.pre.is_empty() {
        version.patch = increment(version, "patch", version.patch)?;
    }

    let mut pre = format!("dev.{}", resolved.guide.depth);
    if let Some(time) = dirty {
        pre.push('.');
        pre.push_str(&time.format(TIMESTAMP_FORMAT).to_string());
    }
    version.pre = Prerelease::new(&pre).map_err(VersionError::from)?;

    if include_commit_metadata && !resolved.guide.hash.is_zero() {
        let abbrev = abbreviated_hash(repo, &resolved.guide.hash)?;
        version.build = BuildMetadata::new(&format!("g{abbrev}")).map_err(VersionError::from)?;
    }

    Ok(resolved)
}

/// Floating version of the repository at `HEAD`.
///
/// # Errors
///
/// Propagates repository, status and metadata failures. A clean working tree
/// is not an error.
#[instrument(skip(repo))]
pub fn describe<R>(repo: &R, options: DescribeOptions) -> DescribeResult<Description>
where
    R: RepositoryAccess + StatusProvider + ?Sized,
{
    let head = repo.head()?;
    let resolved = latest(repo, head.as_ref())?;

    let (tree, status) = repo.status()?;
    let dirty = match modification_time(&tree, &status) {
        Ok(time) => Some(time),
        Err(DirtyError::NotDirty) => None,
        Err(err) => return Err(err.into()),
    };

    let resolved = build(repo, resolved, dirty, options.add_commit_hash)?;
    debug!(version = %resolved, dirty = dirty.is_some(), "described");
    Ok(Description { resolved, dirty })
}

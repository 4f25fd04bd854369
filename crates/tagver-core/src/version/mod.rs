//! Semantic versions: tag parsing, precedence, and bumping.

pub mod tag;

use std::cmp::Ordering;

use semver::Version;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use tag::{VersionTag, VersionTags, filter_and_sort};

/// Errors from version operations.
#[derive(Error, Debug)]
pub enum VersionError {
    /// A synthesized prerelease or build identifier was not valid semver.
    #[error("invalid semver: {0}")]
    InvalidSemver(#[from] semver::Error),

    /// Incrementing a component would exceed `u64::MAX`.
    #[error("cannot increment {component} of {version}: component overflow")]
    ComponentOverflow {
        /// Which component was incremented.
        component: &'static str,
        /// The version being incremented.
        version: Version,
    },
}

/// Result alias for version operations.
pub type VersionResult<T> = Result<T, VersionError>;

/// `value + 1` for the named component of `version`.
///
/// # Errors
///
/// [`VersionError::ComponentOverflow`] when `value` is `u64::MAX`.
pub fn increment(version: &Version, component: &'static str, value: u64) -> VersionResult<u64> {
    value
        .checked_add(1)
        .ok_or_else(|| VersionError::ComponentOverflow {
            component,
            version: version.clone(),
        })
}

/// Which version component a bump increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BumpLevel {
    /// Major release (X.0.0).
    Major,
    /// Minor release (x.Y.0).
    Minor,
    /// Patch release (x.y.Z).
    Patch,
}

impl std::fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Patch => write!(f, "patch"),
            Self::Minor => write!(f, "minor"),
            Self::Major => write!(f, "major"),
        }
    }
}

/// Compute the next release version by applying a bump level.
///
/// Lower components reset to zero and prerelease/build metadata are dropped.
/// A patch bump of a prerelease finalizes it: `1.2.4-dev.3` becomes `1.2.4`.
///
/// # Errors
///
/// [`VersionError::ComponentOverflow`] when the bumped component is already
/// `u64::MAX`.
pub fn next_version(current: &Version, level: BumpLevel) -> VersionResult<Version> {
    let next = match level {
        BumpLevel::Major => Version::new(increment(current, "major", current.major)?, 0, 0),
        BumpLevel::Minor => Version::new(
            current.major,
            increment(current, "minor", current.minor)?,
            0,
        ),
        BumpLevel::Patch if !current.pre.is_empty() => {
            Version::new(current.major, current.minor, current.patch)
        }
        BumpLevel::Patch => Version::new(
            current.major,
            current.minor,
            increment(current, "patch", current.patch)?,
        ),
    };
    Ok(next)
}

/// Compare two versions by semver precedence, ignoring build metadata.
///
/// `semver::Version`'s own `Ord` breaks ties on build metadata, which
/// precedence must not do.
pub fn cmp_precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch)
        .cmp(&(b.major, b.minor, b.patch))
        .then_with(|| a.pre.cmp(&b.pre))
}

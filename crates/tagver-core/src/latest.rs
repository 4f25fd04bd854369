//! The most recent release reachable from a reference.

use std::fmt;

use semver::{Prerelease, Version};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::git::{GitResult, Reference, RepositoryAccess};
use crate::guide::{Guide, resolve_guide};
use crate::tag_index::TagIndex;
use crate::version::tag::{filter_and_sort, is_release_tag};

/// Prefix used when no release tag exists yet.
pub const DEFAULT_PREFIX: &str = "v";

/// A version together with the tag prefix and the guide it was derived from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedVersion {
    /// Where the version was found relative to the start commit.
    pub guide: Guide,
    /// Tag prefix (e.g. `v`).
    pub prefix: String,
    /// The version itself.
    #[serde(serialize_with = "serialize_version")]
    pub version: Version,
}

fn serialize_version<S: serde::Serializer>(version: &Version, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(version)
}

impl ResolvedVersion {
    /// `v0.0.1-dev.0`: the version of a repository without any release.
    pub fn baseline(guide: Guide) -> Self {
        let mut version = Version::new(0, 0, 1);
        version.pre = Prerelease::new("dev.0").unwrap_or(Prerelease::EMPTY);
        Self {
            guide,
            prefix: DEFAULT_PREFIX.to_string(),
            version,
        }
    }

    /// The version without its prefix.
    pub fn version_string(&self) -> String {
        self.version.to_string()
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.version)
    }
}

/// Resolve the latest release reachable from `start`.
///
/// Only tags that parse as plain releases are considered, so prerelease tags
/// never shorten the measured distance. Without a start reference (no
/// commits yet) or without any release tag the baseline `v0.0.1-dev.0` is
/// returned; in the latter case the computed guide is kept.
///
/// # Errors
///
/// Propagates failures reading tags or history.
#[instrument(skip(repo, start), fields(start = start.map(|r| r.name.as_str())))]
pub fn latest<R: RepositoryAccess + ?Sized>(
    repo: &R,
    start: Option<&Reference>,
) -> GitResult<ResolvedVersion> {
    let Some(start) = start else {
        debug!("no commits, using baseline");
        return Ok(ResolvedVersion::baseline(Guide::default()));
    };

    let index = TagIndex::build(repo)?;
    let guide = resolve_guide(repo, &index, start.target, Some(&is_release_tag))?;

    let resolved = match filter_and_sort(&guide.tags).latest() {
        Some(tag) => ResolvedVersion {
            prefix: tag.prefix.clone(),
            version: tag.version.clone(),
            guide,
        },
        None => ResolvedVersion::baseline(guide),
    };
    debug!(version = %resolved, depth = resolved.guide.depth, "resolved latest version");
    Ok(resolved)
}

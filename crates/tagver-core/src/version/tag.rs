//! Version tags: a raw tag name split into prefix and semantic version.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use semver::{BuildMetadata, Prerelease, Version};

use super::cmp_precedence;

/// Trailing `MAJOR(.MINOR)?(.PATCH)?(-PRE)?(+BUILD)?` of a tag name.
static VERSION_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?P<major>[0-9]+)(?:\.(?P<minor>[0-9]+))?(?:\.(?P<patch>[0-9]+))?",
        r"(?:-(?P<pre>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?",
        r"(?:\+(?P<build>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?$",
    ))
    .expect("valid regex")
});

/// Tag names ending in all three numeric components and nothing else.
static FULL_RELEASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\.[0-9]+\.[0-9]+$").expect("valid regex"));

/// A tag name that carries a semantic version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionTag {
    /// The tag name as found in the repository.
    pub original: String,
    /// Everything before the version (e.g. `v`, `release-`).
    pub prefix: String,
    /// The parsed version.
    pub version: Version,
}

impl VersionTag {
    /// Parse a raw tag name. Returns `None` when it carries no version.
    ///
    /// Missing minor or patch components default to zero, so `v2` parses as
    /// `2.0.0` with prefix `v`.
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = VERSION_SUFFIX.captures(raw)?;
        let start = caps.get(0)?.start();

        let number = |name: &str| -> Option<u64> {
            caps.name(name).map_or(Some(0), |m| m.as_str().parse().ok())
        };
        let mut version = Version::new(number("major")?, number("minor")?, number("patch")?);
        if let Some(pre) = caps.name("pre") {
            version.pre = Prerelease::new(pre.as_str()).ok()?;
        }
        if let Some(build) = caps.name("build") {
            version.build = BuildMetadata::new(build.as_str()).ok()?;
        }

        Some(Self {
            original: raw.to_string(),
            prefix: raw[..start].to_string(),
            version,
        })
    }

    /// True for a plain release: no prerelease and no build metadata.
    pub fn is_release(&self) -> bool {
        self.version.pre.is_empty() && self.version.build.is_empty()
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.version)
    }
}

/// Whether `raw` names a full release: `MAJOR.MINOR.PATCH` spelled out, with
/// no prerelease or build suffix. Short forms like `v2` or `v2.5` do not count.
pub fn is_release_tag(raw: &str) -> bool {
    FULL_RELEASE.is_match(raw) && VersionTag::parse(raw).is_some_and(|t| t.is_release())
}

/// Version tags in ascending precedence order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VersionTags(Vec<VersionTag>);

impl VersionTags {
    /// The highest-precedence tag.
    pub fn latest(&self) -> Option<&VersionTag> {
        self.0.last()
    }

    /// Tags in ascending order.
    pub fn iter(&self) -> std::slice::Iter<'_, VersionTag> {
        self.0.iter()
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no tags.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unwrap into the sorted vector.
    pub fn into_vec(self) -> Vec<VersionTag> {
        self.0
    }
}

impl<'a> IntoIterator for &'a VersionTags {
    type Item = &'a VersionTag;
    type IntoIter = std::slice::Iter<'a, VersionTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Parse every raw name, drop the ones without a version, and sort the rest
/// by precedence. The sort is stable: equal versions keep their input order.
pub fn filter_and_sort<I, S>(raw: I) -> VersionTags
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tags: Vec<VersionTag> = raw
        .into_iter()
        .filter_map(|name| VersionTag::parse(name.as_ref()))
        .collect();
    tags.sort_by(|a, b| cmp_precedence(&a.version, &b.version));
    VersionTags(tags)
}

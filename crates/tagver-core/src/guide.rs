//! Distance from a commit to its nearest tagged ancestor.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::git::{GitResult, Hash, LogOrder, RepositoryAccess};
use crate::tag_index::TagIndex;

/// Shortest abbreviation tried by [`abbreviated_hash`].
pub const MIN_ABBREV_LEN: usize = 7;

/// How far a commit is from the nearest ancestor carrying a matching tag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Guide {
    /// Matching tag names on the nearest tagged ancestor; empty if none.
    pub tags: Vec<String>,
    /// Commits walked before reaching the match, the start commit included.
    /// Zero when the start itself is tagged or there is no history.
    pub depth: usize,
    /// The commit the search started from.
    #[serde(serialize_with = "serialize_hash")]
    pub hash: Hash,
}

fn serialize_hash<S: serde::Serializer>(hash: &Hash, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(hash)
}

/// Find the nearest commit reachable from `start` (inclusive) that carries a
/// tag accepted by `filter`.
///
/// [`Guide::tags`] holds only the names `filter` accepts. Other tags on the
/// matched commit, such as a prerelease next to a release, are left out.
///
/// The start commit is looked up in the index first. Otherwise history is
/// walked newest committer timestamp first. That order is an approximation:
/// with clock skew or merges of long-lived branches a causally older commit
/// can be visited before a newer one, and the reported depth follows the
/// visiting order.
///
/// # Errors
///
/// Propagates failures reading commit history.
#[instrument(skip(repo, index, filter), fields(%start))]
pub fn resolve_guide<R: RepositoryAccess + ?Sized>(
    repo: &R,
    index: &TagIndex,
    start: Hash,
    filter: Option<&dyn Fn(&str) -> bool>,
) -> GitResult<Guide> {
    let tags = index.find_matches(&start, filter);
    if !tags.is_empty() {
        debug!(?tags, "start commit is tagged");
        return Ok(Guide {
            tags,
            depth: 0,
            hash: start,
        });
    }

    let mut depth = 0;
    for commit in repo.log_from(&start, LogOrder::CommitterTime)? {
        let commit = commit?;
        if commit.hash != start {
            let tags = index.find_matches(&commit.hash, filter);
            if !tags.is_empty() {
                debug!(?tags, depth, ancestor = %commit.hash, "found tagged ancestor");
                return Ok(Guide {
                    tags,
                    depth,
                    hash: start,
                });
            }
        }
        depth += 1;
    }

    debug!(depth, "no tagged ancestor");
    Ok(Guide {
        tags: Vec::new(),
        depth,
        hash: start,
    })
}

/// Shortest prefix of `hash`, at least [`MIN_ABBREV_LEN`] characters long,
/// that the repository resolves back to exactly `hash`.
///
/// Falls back to the full hash.
///
/// # Errors
///
/// Propagates repository failures while resolving prefixes.
pub fn abbreviated_hash<R: RepositoryAccess + ?Sized>(repo: &R, hash: &Hash) -> GitResult<String> {
    let full = hash.to_string();
    for len in MIN_ABBREV_LEN..full.len() {
        let candidate = &full[..len];
        if repo.resolve_revision(candidate)? == Some(*hash) {
            return Ok(candidate.to_string());
        }
    }
    Ok(full)
}

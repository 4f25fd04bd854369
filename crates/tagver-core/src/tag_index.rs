//! Index from commit to the tag names pointing at it.

use std::collections::HashMap;

use tracing::{debug, instrument, trace};

use crate::git::{GitResult, Hash, RepositoryAccess};

/// Maps each tagged commit to its tag names, in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagIndex {
    tags: HashMap<Hash, Vec<String>>,
}

impl TagIndex {
    /// Build the index from every tag in the repository.
    ///
    /// Annotated tags are indexed under the commit they point at, using the
    /// name stored in the tag object. Lightweight tags are indexed under
    /// their reference target using the reference's short name. Annotated
    /// tags that point at something other than a commit are skipped.
    ///
    /// # Errors
    ///
    /// Propagates repository errors other than "no such tag object".
    #[instrument(skip_all)]
    pub fn build<R: RepositoryAccess + ?Sized>(repo: &R) -> GitResult<Self> {
        let mut index = Self::default();
        for reference in repo.tags()? {
            match repo.tag_object(&reference.target)? {
                Some(tag) => match tag.target_commit {
                    Some(commit) => index.insert(commit, tag.name),
                    None => trace!(tag = %tag.name, "annotated tag does not point at a commit"),
                },
                None => index.insert(reference.target, reference.short_name().to_string()),
            }
        }
        debug!(commits = index.tags.len(), "built tag index");
        Ok(index)
    }

    /// Record `name` as pointing at `commit`.
    pub fn insert(&mut self, commit: Hash, name: String) {
        self.tags.entry(commit).or_default().push(name);
    }

    /// All tag names at `commit`.
    pub fn get(&self, commit: &Hash) -> &[String] {
        self.tags.get(commit).map(Vec::as_slice).unwrap_or_default()
    }

    /// Tag names at `commit` accepted by `filter`; every name when no filter
    /// is given.
    pub fn find_matches(
        &self,
        commit: &Hash,
        filter: Option<&dyn Fn(&str) -> bool>,
    ) -> Vec<String> {
        self.get(commit)
            .iter()
            .filter(|name| filter.is_none_or(|accept| accept(name.as_str())))
            .cloned()
            .collect()
    }

    /// Number of tagged commits.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether no commit is tagged.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

//! In-memory repository used by unit tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};

use camino::Utf8PathBuf;

use super::{
    AnnotatedTag, CommitInfo, CommitLog, FileStatus, GitResult, Hash, LogOrder, Reference,
    RepositoryAccess, StatusProvider, WorkingTree, WorkingTreeStatus,
};

/// Commits, tags and status held in plain collections.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    commits: Vec<CommitInfo>,
    head: Option<Hash>,
    tags: RefCell<Vec<Reference>>,
    tag_objects: RefCell<BTreeMap<Hash, AnnotatedTag>>,
    root: Utf8PathBuf,
    status: WorkingTreeStatus,
    next_object: RefCell<u64>,
}

/// Deterministic hash for the `n`th fake object.
pub fn hash(n: u64) -> Hash {
    Hash::from_hex(&format!("{n:040x}")).unwrap()
}

impl MemoryRepository {
    /// An empty repository with no commits, tags or changes.
    pub fn new() -> Self {
        Self {
            next_object: RefCell::new(1_000),
            ..Self::default()
        }
    }

    /// Append a commit on top of `parents` and move HEAD to it.
    pub fn commit(&mut self, id: u64, parents: &[u64], time: i64) -> Hash {
        let info = CommitInfo {
            hash: hash(id),
            parents: parents.iter().copied().map(hash).collect(),
            committer_time: time,
        };
        self.commits.push(info);
        self.head = Some(hash(id));
        hash(id)
    }

    /// A linear history of `n` commits with ids `1..=n`.
    pub fn linear(n: u64) -> Self {
        let mut repo = Self::new();
        for id in 1..=n {
            let parents: Vec<u64> = if id == 1 { vec![] } else { vec![id - 1] };
            repo.commit(id, &parents, i64::try_from(id).unwrap() * 100);
        }
        repo
    }

    /// Point a plain tag reference straight at commit `commit`.
    pub fn lightweight_tag(&self, name: &str, commit: u64) {
        self.tags.borrow_mut().push(Reference {
            name: format!("refs/tags/{name}"),
            target: hash(commit),
        });
    }

    /// Create a tag object with an empty message at commit `commit`.
    pub fn annotated_tag(&self, name: &str, commit: u64) {
        self.create_annotated_tag(name, &hash(commit), "").unwrap();
    }

    /// Replace the working tree root and its status.
    pub fn set_status(&mut self, root: impl Into<Utf8PathBuf>, status: WorkingTreeStatus) {
        self.root = root.into();
        self.status = status;
    }

    /// Record one changed path.
    pub fn mark_changed(&mut self, path: &str, status: FileStatus) {
        self.status.insert(path, status);
    }

    /// `(name, message)` of every tag object, in object id order.
    pub fn tag_messages(&self) -> Vec<(String, String)> {
        self.tag_objects
            .borrow()
            .values()
            .map(|t| (t.name.clone(), t.message.clone()))
            .collect()
    }

    fn find(&self, hash: &Hash) -> Option<&CommitInfo> {
        self.commits.iter().find(|c| c.hash == *hash)
    }
}

impl RepositoryAccess for MemoryRepository {
    fn head(&self) -> GitResult<Option<Reference>> {
        Ok(self.head.map(|target| Reference {
            name: "refs/heads/main".into(),
            target,
        }))
    }

    fn tags(&self) -> GitResult<Vec<Reference>> {
        Ok(self.tags.borrow().clone())
    }

    fn tag_object(&self, hash: &Hash) -> GitResult<Option<AnnotatedTag>> {
        Ok(self.tag_objects.borrow().get(hash).cloned())
    }

    fn log_from(&self, from: &Hash, order: LogOrder) -> GitResult<CommitLog<'_>> {
        let LogOrder::CommitterTime = order;
        let mut seen = HashSet::new();
        let mut pending = vec![*from];
        let mut reachable = Vec::new();
        while let Some(hash) = pending.pop() {
            if !seen.insert(hash) {
                continue;
            }
            if let Some(commit) = self.find(&hash) {
                pending.extend(commit.parents.iter().copied());
                reachable.push(commit.clone());
            }
        }
        reachable.sort_by(|a, b| b.committer_time.cmp(&a.committer_time));
        if let Some(pos) = reachable.iter().position(|c| c.hash == *from) {
            let start = reachable.remove(pos);
            reachable.insert(0, start);
        }
        Ok(Box::new(reachable.into_iter().map(Ok)))
    }

    fn resolve_revision(&self, partial: &str) -> GitResult<Option<Hash>> {
        let objects = self.tag_objects.borrow();
        let mut candidates = self
            .commits
            .iter()
            .map(|c| c.hash)
            .chain(objects.keys().copied())
            .filter(|h| h.to_string().starts_with(partial));
        let first = candidates.next();
        Ok(match candidates.next() {
            Some(_) => None,
            None => first,
        })
    }

    fn create_annotated_tag(
        &self,
        name: &str,
        target: &Hash,
        message: &str,
    ) -> GitResult<Reference> {
        let full = format!("refs/tags/{name}");
        if self.tags.borrow().iter().any(|t| t.name == full) {
            return Err(git2::Error::from_str("tag already exists").into());
        }
        let id = {
            let mut next = self.next_object.borrow_mut();
            *next += 1;
            hash(*next)
        };
        self.tag_objects.borrow_mut().insert(
            id,
            AnnotatedTag {
                name: name.to_string(),
                target_commit: Some(*target),
                message: message.to_string(),
            },
        );
        let reference = Reference {
            name: full,
            target: id,
        };
        self.tags.borrow_mut().push(reference.clone());
        Ok(reference)
    }
}

impl StatusProvider for MemoryRepository {
    fn status(&self) -> GitResult<(WorkingTree, WorkingTreeStatus)> {
        Ok((
            WorkingTree {
                root: self.root.clone(),
            },
            self.status.clone(),
        ))
    }
}

//! `git2`-backed repository access.

use std::fmt;
use std::path::Path;

use camino::Utf8PathBuf;
use git2::{ErrorCode, ObjectType, Sort, StatusOptions};
use tracing::{debug, instrument};

use super::{
    AnnotatedTag, CommitInfo, CommitLog, FileStatus, GitError, GitResult, Hash, LogOrder,
    Reference, RepositoryAccess, StatusProvider, WorkingTree, WorkingTreeStatus,
};

/// A git repository opened through libgit2.
pub struct GitRepository {
    repo: git2::Repository,
}

impl fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitRepository")
            .field("git_dir", &self.repo.path())
            .finish()
    }
}

impl GitRepository {
    /// Open the repository containing `path`.
    ///
    /// Walks up from `path` until a `.git` directory is found.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NotARepo`] when no enclosing repository exists.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> GitResult<Self> {
        let repo = git2::Repository::discover(path.as_ref()).map_err(|e| match e.code() {
            ErrorCode::NotFound => GitError::NotARepo,
            _ => GitError::Git(e),
        })?;
        debug!(git_dir = %repo.path().display(), "opened repository");
        Ok(Self { repo })
    }

    /// Wrap an already opened `git2` repository.
    pub const fn from_git2(repo: git2::Repository) -> Self {
        Self { repo }
    }

    /// Add gitignore-style patterns applied on top of the repository's own
    /// ignore files when computing status.
    ///
    /// The rules live only as long as this handle.
    pub fn add_excludes<S: AsRef<str>>(&self, patterns: &[S]) -> GitResult<()> {
        let rules: Vec<&str> = patterns
            .iter()
            .map(AsRef::as_ref)
            .map(str::trim)
            .filter(|p| !p.is_empty() && !p.starts_with('#'))
            .collect();
        if rules.is_empty() {
            return Ok(());
        }
        debug!(count = rules.len(), "adding exclude patterns");
        self.repo.add_ignore_rule(&rules.join("\n"))?;
        Ok(())
    }

    /// The underlying `git2` handle.
    pub const fn inner(&self) -> &git2::Repository {
        &self.repo
    }

    fn commit_info(&self, oid: git2::Oid) -> GitResult<CommitInfo> {
        let commit = self.repo.find_commit(oid)?;
        Ok(CommitInfo {
            hash: oid.into(),
            parents: commit.parent_ids().map(Hash::from).collect(),
            committer_time: commit.committer().when().seconds(),
        })
    }
}

impl RepositoryAccess for GitRepository {
    fn head(&self) -> GitResult<Option<Reference>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                debug!("HEAD is unborn");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let target = head.peel_to_commit()?.id();
        let name = head.name().unwrap_or("HEAD").to_string();
        Ok(Some(Reference {
            name,
            target: target.into(),
        }))
    }

    fn tags(&self) -> GitResult<Vec<Reference>> {
        let mut out = Vec::new();
        for reference in self.repo.references_glob("refs/tags/*")? {
            let reference = reference?;
            let Some(name) = reference.name().map(str::to_string) else {
                debug!("skipping tag reference with non UTF-8 name");
                continue;
            };
            let target = match reference.target() {
                Some(oid) => oid,
                None => match reference.resolve()?.target() {
                    Some(oid) => oid,
                    None => continue,
                },
            };
            out.push(Reference {
                name,
                target: target.into(),
            });
        }
        Ok(out)
    }

    fn tag_object(&self, hash: &Hash) -> GitResult<Option<AnnotatedTag>> {
        let object = match self.repo.find_object(hash.oid(), None) {
            Ok(object) => object,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let Ok(tag) = object.into_tag() else {
            return Ok(None);
        };
        let target_commit = (tag.target_type() == Some(ObjectType::Commit))
            .then(|| Hash::from(tag.target_id()));
        Ok(Some(AnnotatedTag {
            name: String::from_utf8_lossy(tag.name_bytes()).into_owned(),
            target_commit,
            message: tag.message().unwrap_or_default().to_string(),
        }))
    }

    fn log_from(&self, from: &Hash, order: LogOrder) -> GitResult<CommitLog<'_>> {
        let mut walk = self.repo.revwalk()?;
        match order {
            LogOrder::CommitterTime => walk.set_sorting(Sort::TIME)?,
        }
        walk.push(from.oid())?;
        Ok(Box::new(walk.map(move |oid| self.commit_info(oid?))))
    }

    fn resolve_revision(&self, partial: &str) -> GitResult<Option<Hash>> {
        match self.repo.revparse_single(partial) {
            Ok(object) => Ok(Some(object.id().into())),
            Err(e)
                if matches!(
                    e.code(),
                    ErrorCode::NotFound | ErrorCode::Ambiguous | ErrorCode::InvalidSpec
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, message), fields(%target))]
    fn create_annotated_tag(
        &self,
        name: &str,
        target: &Hash,
        message: &str,
    ) -> GitResult<Reference> {
        let object = self.repo.find_object(target.oid(), Some(ObjectType::Commit))?;
        let tagger = self.repo.signature()?;
        // Writes the tag object and takes the ref lock in one call; an
        // existing ref aborts before anything becomes visible.
        let tag_id = self.repo.tag(name, &object, &tagger, message, false)?;
        debug!(%tag_id, "created annotated tag");
        Ok(Reference {
            name: format!("refs/tags/{name}"),
            target: tag_id.into(),
        })
    }
}

impl StatusProvider for GitRepository {
    #[instrument(skip(self))]
    fn status(&self) -> GitResult<(WorkingTree, WorkingTreeStatus)> {
        let workdir = self.repo.workdir().ok_or(GitError::Bare)?;
        let root = Utf8PathBuf::from_path_buf(workdir.to_path_buf())
            .map_err(|p| git2::Error::from_str(&format!("non UTF-8 path: {}", p.display())))?;

        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .include_unmodified(false);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        let mut status = WorkingTreeStatus::new();
        for entry in statuses.iter() {
            let Some(path) = entry.path() else {
                debug!("skipping status entry with non UTF-8 path");
                continue;
            };
            status.insert(path, FileStatus::from_git2(entry.status()));
        }
        debug!(entries = status.len(), "working tree status");
        Ok((WorkingTree { root }, status))
    }
}

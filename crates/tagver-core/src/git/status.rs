//! Working tree status values.

use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use git2::Status;

/// Change state of a path on one side (working copy or index).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChangeState {
    /// No change.
    #[default]
    Unmodified,
    /// Not tracked by the repository.
    Untracked,
    /// Newly added.
    Added,
    /// Content changed.
    Modified,
    /// Removed.
    Deleted,
    /// Moved.
    Renamed,
    /// File type changed (e.g. file to symlink).
    TypeChanged,
    /// Unresolved merge conflict.
    Conflicted,
}

/// Working copy and staged change states of a single path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FileStatus {
    /// State of the working copy relative to the index.
    pub worktree: ChangeState,
    /// State of the index relative to `HEAD`.
    pub staging: ChangeState,
}

impl FileStatus {
    /// A path counts as changed unless both sides are unmodified.
    pub fn is_changed(&self) -> bool {
        self.worktree != ChangeState::Unmodified || self.staging != ChangeState::Unmodified
    }

    pub(crate) fn from_git2(status: Status) -> Self {
        if status.is_conflicted() {
            return Self {
                worktree: ChangeState::Conflicted,
                staging: ChangeState::Conflicted,
            };
        }

        let staging = if status.is_index_new() {
            ChangeState::Added
        } else if status.is_index_modified() {
            ChangeState::Modified
        } else if status.is_index_deleted() {
            ChangeState::Deleted
        } else if status.is_index_renamed() {
            ChangeState::Renamed
        } else if status.is_index_typechange() {
            ChangeState::TypeChanged
        } else {
            ChangeState::Unmodified
        };

        let worktree = if status.is_wt_new() {
            ChangeState::Untracked
        } else if status.is_wt_modified() {
            ChangeState::Modified
        } else if status.is_wt_deleted() {
            ChangeState::Deleted
        } else if status.is_wt_renamed() {
            ChangeState::Renamed
        } else if status.is_wt_typechange() {
            ChangeState::TypeChanged
        } else {
            ChangeState::Unmodified
        };

        Self { worktree, staging }
    }
}

/// Handle on the checked-out files of a repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkingTree {
    /// Root directory of the working tree.
    pub root: Utf8PathBuf,
}

/// Change states keyed by path relative to the working tree root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkingTreeStatus {
    entries: BTreeMap<Utf8PathBuf, FileStatus>,
}

impl WorkingTreeStatus {
    /// Create an empty status.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the state of `path`.
    pub fn insert(&mut self, path: impl Into<Utf8PathBuf>, status: FileStatus) {
        self.entries.insert(path.into(), status);
    }

    /// State of `path`, if it was reported.
    pub fn get(&self, path: &str) -> Option<&FileStatus> {
        self.entries.get(camino::Utf8Path::new(path))
    }

    /// All reported paths.
    pub fn iter(&self) -> impl Iterator<Item = (&Utf8PathBuf, &FileStatus)> {
        self.entries.iter()
    }

    /// Paths whose working copy or staged state differs from unmodified.
    pub fn changed(&self) -> impl Iterator<Item = &Utf8PathBuf> {
        self.entries
            .iter()
            .filter(|(_, status)| status.is_changed())
            .map(|(path, _)| path)
    }

    /// True when no path is changed.
    pub fn is_clean(&self) -> bool {
        self.changed().next().is_none()
    }

    /// Number of reported paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no path was reported.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untracked_maps_to_worktree_only() {
        let status = FileStatus::from_git2(Status::WT_NEW);
        assert_eq!(status.worktree, ChangeState::Untracked);
        assert_eq!(status.staging, ChangeState::Unmodified);
        assert!(status.is_changed());
    }

    #[test]
    fn staged_and_unstaged_are_tracked_separately() {
        let status = FileStatus::from_git2(Status::INDEX_MODIFIED | Status::WT_DELETED);
        assert_eq!(status.staging, ChangeState::Modified);
        assert_eq!(status.worktree, ChangeState::Deleted);
    }

    #[test]
    fn conflicts_mark_both_sides() {
        let status = FileStatus::from_git2(Status::CONFLICTED);
        assert_eq!(status.worktree, ChangeState::Conflicted);
        assert_eq!(status.staging, ChangeState::Conflicted);
    }

    #[test]
    fn current_is_unchanged() {
        assert!(!FileStatus::from_git2(Status::CURRENT).is_changed());
    }

    #[test]
    fn clean_ignores_unmodified_entries() {
        let mut status = WorkingTreeStatus::new();
        status.insert("a.txt", FileStatus::default());
        assert!(status.is_clean());
        assert_eq!(status.len(), 1);

        status.insert(
            "b.txt",
            FileStatus {
                worktree: ChangeState::Modified,
                staging: ChangeState::Unmodified,
            },
        );
        assert!(!status.is_clean());
        let changed: Vec<&str> = status.changed().map(|p| p.as_str()).collect();
        assert_eq!(changed, vec!["b.txt"]);
    }
}

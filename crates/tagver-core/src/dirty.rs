//! Modification time of a dirty working tree.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, instrument, trace};

use crate::git::{WorkingTree, WorkingTreeStatus};

/// Errors from the modification time scan.
#[derive(Error, Debug)]
pub enum DirtyError {
    /// No path in the working tree is changed.
    ///
    /// Not a failure: callers treat it as "no dirty timestamp".
    #[error("working tree is clean")]
    NotDirty,

    /// Reading file metadata failed.
    #[error("failed to read modification time of {path}: {source}")]
    Io {
        /// The path that could not be inspected.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Result alias for the modification time scan.
pub type DirtyResult<T> = Result<T, DirtyError>;

/// Most recent modification time across all changed paths, in UTC.
///
/// A path that no longer exists (deleted) is approximated by its nearest
/// existing ancestor directory, up to the working tree root.
///
/// # Errors
///
/// Returns [`DirtyError::NotDirty`] when nothing is changed, and
/// [`DirtyError::Io`] when metadata cannot be read.
#[instrument(skip_all, fields(root = %tree.root))]
pub fn modification_time(
    tree: &WorkingTree,
    status: &WorkingTreeStatus,
) -> DirtyResult<DateTime<Utc>> {
    let mut latest: Option<DateTime<Utc>> = None;
    for path in status.changed() {
        let time = path_time(&tree.root, path)?;
        trace!(%path, %time, "changed path");
        latest = Some(latest.map_or(time, |current| current.max(time)));
    }

    let latest = latest.ok_or(DirtyError::NotDirty)?;
    debug!(%latest, "working tree is dirty");
    Ok(latest)
}

fn path_time(root: &Utf8Path, relative: &Utf8Path) -> DirtyResult<DateTime<Utc>> {
    let mut candidate = root.join(relative);
    loop {
        match candidate.symlink_metadata() {
            Ok(meta) => {
                let modified = meta.modified().map_err(|source| DirtyError::Io {
                    path: candidate.clone(),
                    source,
                })?;
                return Ok(DateTime::<Utc>::from(modified));
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound && candidate.as_path() != root => {
                match candidate.parent() {
                    Some(parent) => candidate = parent.to_path_buf(),
                    None => {
                        return Err(DirtyError::Io {
                            path: candidate,
                            source: err,
                        });
                    }
                }
            }
            Err(source) => {
                return Err(DirtyError::Io {
                    path: candidate,
                    source,
                });
            }
        }
    }
}

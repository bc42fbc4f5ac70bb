//! Conflict-policy aware file writer.
//!
//! | existing state | Skip | Overwrite | Error |
//! |----------------|------|-----------|-------|
//! | missing        | create | create  | create |
//! | file           | skipped | replace | `FileExists` |
//! | directory      | `PathCollision` in every policy |

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{EntryKind, Filesystem, WriteMode},
    },
    domain::{ConflictPolicy, RenderedFile},
    error::PlinthResult,
};

/// What the writer did with one rendered file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOutcome {
    Created,
    Overwritten,
    Skipped,
}

/// Applies one [`ConflictPolicy`] to every write of a run.
pub struct FileWriter<'a> {
    filesystem: &'a dyn Filesystem,
    policy: ConflictPolicy,
}

impl<'a> FileWriter<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, policy: ConflictPolicy) -> Self {
        Self { filesystem, policy }
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    #[instrument(skip_all, fields(path = %file.path(), policy = %self.policy))]
    pub fn write(&self, file: &RenderedFile) -> PlinthResult<WriteOutcome> {
        let path = file.path();

        match self.filesystem.entry(path)? {
            EntryKind::Missing => {
                // CreateNew also on Overwrite: nothing was there to replace, and a
                // file that appears meanwhile is reported instead of clobbered.
                self.filesystem
                    .write_atomic(path, file.contents(), WriteMode::CreateNew)?;
                debug!("created");
                Ok(WriteOutcome::Created)
            }
            EntryKind::File => match self.policy {
                ConflictPolicy::Skip => {
                    debug!("exists, skipped");
                    Ok(WriteOutcome::Skipped)
                }
                ConflictPolicy::Overwrite => {
                    self.filesystem
                        .write_atomic(path, file.contents(), WriteMode::Replace)?;
                    debug!("overwritten");
                    Ok(WriteOutcome::Overwritten)
                }
                ConflictPolicy::Error => Err(ApplicationError::FileExists {
                    path: path.as_path().to_path_buf(),
                }
                .into()),
            },
            EntryKind::Directory => Err(ApplicationError::PathCollision {
                path: path.as_path().to_path_buf(),
                reason: "a directory exists at the target path".into(),
            }
            .into()),
            EntryKind::Other => Err(ApplicationError::PathCollision {
                path: path.as_path().to_path_buf(),
                reason: "target is not a regular file".into(),
            }
            .into()),
        }
    }
}

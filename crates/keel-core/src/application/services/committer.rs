//! Applies a reconciliation to disk.
//!
//! Order matters: directories, then renames, then file bodies. The first two
//! steps are idempotent, so a run interrupted while writing bodies can be
//! repeated as is.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    application::{ApplicationError, ports::Filesystem, services::reconciler::Reconciliation},
    domain::RelativePath,
    error::KeelResult,
};

/// What a commit actually touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    pub directories_created: usize,
    pub renames_applied: usize,
    pub renames_skipped: usize,
    pub files_written: usize,
}

pub struct Committer<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> Committer<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    /// Write `rendered` bodies under `root`. Foreign and ignored entries are
    /// never touched; nothing is ever deleted.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn commit(
        &self,
        root: &Path,
        reconciliation: &Reconciliation,
        rendered: &[(RelativePath, Vec<u8>)],
    ) -> KeelResult<CommitSummary> {
        let mut summary = CommitSummary::default();

        self.filesystem.create_dir_all(root)?;
        for dir in &reconciliation.new_directories {
            self.filesystem.create_dir_all(&root.join(dir))?;
            summary.directories_created += 1;
        }

        for (from, to) in &reconciliation.renamed {
            let source = root.join(from);
            let target = root.join(to);
            if !self.filesystem.exists(&source) {
                debug!(%from, "rename source already gone, skipping");
                summary.renames_skipped += 1;
                continue;
            }
            if self.filesystem.exists(&target) {
                return Err(ApplicationError::RenameCollision {
                    from: from.as_path().to_path_buf(),
                    to: to.as_path().to_path_buf(),
                }
                .into());
            }
            if let Some(parent) = target.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.rename(&source, &target)?;
            debug!(%from, %to, "moved");
            summary.renames_applied += 1;
        }

        for (path, body) in rendered {
            if !reconciliation.is_writable(path) {
                continue;
            }
            let target = root.join(path);
            if let Some(parent) = target.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.write_file(&target, body)?;
            summary.files_written += 1;
        }

        info!(
            directories = summary.directories_created,
            renames = summary.renames_applied,
            files = summary.files_written,
            "Commit complete"
        );
        Ok(summary)
    }
}

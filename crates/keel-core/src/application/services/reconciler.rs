//! Five-way classification of the existing output tree against a plan.
//!
//! Every path in the union of the tree and the plan ends up in exactly one
//! bucket: new, ignored, renamed, foreign, or obsolete-with-loss. The last
//! bucket aborts the run. Nothing here writes to disk.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{CommentSyntax, IgnoreList, Plan, RelativePath, split_user_content},
    error::KeelResult,
};

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// Planned files found under neither their final nor their prior path.
    pub new_files: BTreeSet<RelativePath>,
    pub new_directories: BTreeSet<RelativePath>,
    /// Existing entries on the allow-list. Never read or written.
    pub ignored: BTreeSet<RelativePath>,
    /// Existing entries that belong to the user.
    pub foreign: BTreeSet<RelativePath>,
    /// `old → new` moves for files found under their prior path.
    pub renamed: BTreeMap<RelativePath, RelativePath>,
    /// Bytes after the anchor, keyed by final path.
    #[serde(skip)]
    pub user_content: BTreeMap<RelativePath, Vec<u8>>,
    /// Unplanned files carrying the marker with nothing after it. Treated
    /// as foreign; a damaged marker region looks the same.
    pub suspicious_obsolete: BTreeSet<RelativePath>,
}

impl Reconciliation {
    /// Whether the plan wants this file written on this run.
    pub fn is_writable(&self, path: &RelativePath) -> bool {
        !self.ignored.contains(path)
    }
}

pub struct TreeReconciler<'a> {
    filesystem: &'a dyn Filesystem,
    ignore: &'a IgnoreList,
}

impl<'a> TreeReconciler<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, ignore: &'a IgnoreList) -> Self {
        Self { filesystem, ignore }
    }

    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn reconcile(&self, plan: &Plan, root: &Path) -> KeelResult<Reconciliation> {
        let mut result = Reconciliation {
            new_files: plan.files().map(|f| f.final_path.clone()).collect(),
            new_directories: plan.directories().clone(),
            ..Reconciliation::default()
        };
        let renames = plan.renames();
        let mut obsolete_with_loss = Vec::new();

        let entries = self
            .filesystem
            .walk(root, &|path: &RelativePath| self.ignore.matches(path))?;

        for entry in entries {
            let path = entry.path;

            if self.ignore.matches(&path) {
                debug!(%path, "ignored");
                result.new_files.remove(&path);
                result.new_directories.remove(&path);
                result.ignored.insert(path);
                continue;
            }

            let effective = renames.get(&path).unwrap_or(&path).clone();

            if entry.is_dir {
                if plan.contains_directory(&effective) {
                    result.new_directories.remove(&effective);
                } else if plan.contains_file(&effective) {
                    return Err(type_mismatch(root, &path, "expected a file, found a directory"));
                } else {
                    debug!(%path, "foreign directory");
                    result.foreign.insert(path);
                }
                continue;
            }

            if plan.contains_file(&effective) {
                result.new_files.remove(&effective);
                if path != effective {
                    debug!(from = %path, to = %effective, "renamed");
                    result.renamed.insert(path.clone(), effective.clone());
                }
                if CommentSyntax::for_path(&effective).is_exempt() {
                    continue;
                }
                let bytes = self.filesystem.read_file(&root.join(&path))?;
                match split_user_content(&bytes) {
                    None => {
                        return Err(ApplicationError::DisclaimerAnchorMissing {
                            path: path.into_path_buf(),
                        }
                        .into());
                    }
                    Some([]) => {}
                    Some(tail) => {
                        debug!(path = %effective, bytes = tail.len(), "preserving user content");
                        result.user_content.insert(effective, tail.to_vec());
                    }
                }
                continue;
            }

            if plan.contains_directory(&effective) {
                return Err(type_mismatch(root, &path, "expected a directory, found a file"));
            }

            if CommentSyntax::for_path(&path).is_exempt() {
                result.foreign.insert(path);
                continue;
            }
            let bytes = self.filesystem.read_file(&root.join(&path))?;
            match split_user_content(&bytes) {
                Some([]) => {
                    warn!(%path, "generated file is no longer planned and its user region is empty; leaving it in place");
                    result.suspicious_obsolete.insert(path.clone());
                    result.foreign.insert(path);
                }
                Some(_) => obsolete_with_loss.push(path.into_path_buf()),
                None => {
                    debug!(%path, "foreign file");
                    result.foreign.insert(path);
                }
            }
        }

        // The walk does not descend into ignored prefixes, so planned entries
        // below one are only seen here.
        let hidden: Vec<RelativePath> = result
            .new_files
            .iter()
            .chain(&result.new_directories)
            .filter(|path| self.ignore.matches(path) && self.filesystem.exists(&root.join(path)))
            .cloned()
            .collect();
        for path in hidden {
            debug!(%path, "ignored, inside a pruned directory");
            result.new_files.remove(&path);
            result.new_directories.remove(&path);
            result.ignored.insert(path);
        }

        if !obsolete_with_loss.is_empty() {
            return Err(ApplicationError::DataLossGuard {
                paths: obsolete_with_loss,
            }
            .into());
        }

        for (from, to) in &result.renamed {
            if self.filesystem.exists(&root.join(to)) {
                return Err(ApplicationError::RenameCollision {
                    from: from.as_path().to_path_buf(),
                    to: to.as_path().to_path_buf(),
                }
                .into());
            }
        }

        debug!(
            new_files = result.new_files.len(),
            new_directories = result.new_directories.len(),
            renamed = result.renamed.len(),
            ignored = result.ignored.len(),
            foreign = result.foreign.len(),
            preserved = result.user_content.len(),
            "Reconciled"
        );
        Ok(result)
    }
}

fn type_mismatch(root: &Path, path: &RelativePath, reason: &str) -> crate::error::KeelError {
    ApplicationError::FilesystemError {
        path: PathBuf::from(root).join(path),
        reason: reason.into(),
    }
    .into()
}

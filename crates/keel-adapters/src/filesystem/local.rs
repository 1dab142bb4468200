//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use keel_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, TreeEntry},
    },
    domain::RelativePath,
    error::{KeelError, KeelResult},
};
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> KeelResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> KeelResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_file(&self, path: &Path) -> KeelResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn rename(&self, from: &Path, to: &Path) -> KeelResult<()> {
        std::fs::rename(from, to).map_err(|e| map_io_error(from, e, "rename file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn walk(
        &self,
        root: &Path,
        prune: &dyn Fn(&RelativePath) -> bool,
    ) -> KeelResult<Vec<TreeEntry>> {
        if !root.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();

        while let Some(next) = walker.next() {
            let entry = next.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                KeelError::from(ApplicationError::FilesystemError {
                    reason: format!("Failed to walk directory: {e}"),
                    path,
                })
            })?;

            let relative = entry.path().strip_prefix(root).map_err(|e| {
                KeelError::from(ApplicationError::FilesystemError {
                    path: entry.path().to_path_buf(),
                    reason: format!("Entry escapes the walk root: {e}"),
                })
            })?;
            let path = RelativePath::try_new(relative)?;
            let is_dir = entry.file_type().is_dir();

            if is_dir && prune(&path) {
                walker.skip_current_dir();
            }
            entries.push(TreeEntry { path, is_dir });
        }

        Ok(entries)
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> KeelError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

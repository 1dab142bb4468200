//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use keel_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, TreeEntry},
    },
    domain::RelativePath,
    error::KeelResult,
};

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can keep a handle after boxing
/// one into a service.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn add_ancestors(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.directories.contains(parent),
            _ => true,
        }
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Seed a file, creating its parent directories (testing helper).
    pub fn insert_file(&self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) {
        let path = path.as_ref();
        if let Ok(mut inner) = self.inner.write() {
            if let Some(parent) = path.parent() {
                inner.add_ancestors(parent);
            }
            inner.files.insert(path.to_path_buf(), content.as_ref().to_vec());
        }
    }

    /// A file's content as UTF-8 (testing helper).
    pub fn file_string(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner
            .files
            .get(path.as_ref())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Snapshot of every file and its bytes.
    pub fn snapshot(&self) -> BTreeMap<PathBuf, Vec<u8>> {
        self.inner
            .read()
            .map(|inner| inner.files.clone())
            .unwrap_or_default()
    }

    fn read(&self) -> KeelResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }

    fn write(&self) -> KeelResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

fn fs_error(path: &Path, reason: &str) -> keel_core::error::KeelError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> KeelResult<()> {
        let mut inner = self.write()?;
        if inner.files.contains_key(path) {
            return Err(fs_error(path, "A file exists at this path"));
        }
        inner.add_ancestors(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> KeelResult<()> {
        let mut inner = self.write()?;

        if !inner.parent_exists(path) {
            return Err(fs_error(path, "Parent directory does not exist"));
        }
        if inner.directories.contains(path) {
            return Err(fs_error(path, "A directory exists at this path"));
        }

        inner.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> KeelResult<Vec<u8>> {
        self.read()?
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| fs_error(path, "File not found"))
    }

    fn rename(&self, from: &Path, to: &Path) -> KeelResult<()> {
        let mut inner = self.write()?;

        if !inner.parent_exists(to) {
            return Err(fs_error(to, "Parent directory does not exist"));
        }
        let bytes = inner
            .files
            .remove(from)
            .ok_or_else(|| fs_error(from, "File not found"))?;
        inner.files.insert(to.to_path_buf(), bytes);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn walk(
        &self,
        root: &Path,
        prune: &dyn Fn(&RelativePath) -> bool,
    ) -> KeelResult<Vec<TreeEntry>> {
        let inner = self.read()?;

        // Component-wise path ordering is a pre-order depth-first walk.
        let mut all: BTreeMap<&Path, bool> = BTreeMap::new();
        for dir in &inner.directories {
            all.insert(dir.as_path(), true);
        }
        for file in inner.files.keys() {
            all.insert(file.as_path(), false);
        }

        let mut entries = Vec::new();
        let mut pruned: Vec<RelativePath> = Vec::new();
        for (path, is_dir) in all {
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            if relative.as_os_str().is_empty() {
                continue;
            }
            let path = RelativePath::try_new(relative)?;
            if pruned.iter().any(|p| path.starts_with(p)) {
                continue;
            }
            if is_dir && prune(&path) {
                pruned.push(path.clone());
            }
            entries.push(TreeEntry { path, is_dir });
        }

        Ok(entries)
    }
}

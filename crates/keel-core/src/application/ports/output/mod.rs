//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `keel-adapters` crate provides implementations.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::domain::{GroupKey, RelativePath, TemplateEntry, TemplateId};
use crate::error::KeelResult;

/// One entry found while walking the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: RelativePath,
    pub is_dir: bool,
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `keel_adapters::filesystem::LocalFilesystem` (production)
/// - `keel_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories. Existing directories are fine.
    fn create_dir_all(&self, path: &Path) -> KeelResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &[u8]) -> KeelResult<()>;

    fn read_file(&self, path: &Path) -> KeelResult<Vec<u8>>;

    /// Move a file. The destination's parent must exist.
    fn rename(&self, from: &Path, to: &Path) -> KeelResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Depth-first walk of everything under `root`, paths relative to it.
    ///
    /// Entries of one directory are visited in name order. A directory for
    /// which `prune` returns `true` is still reported but not descended into.
    /// A missing `root` yields no entries.
    fn walk(
        &self,
        root: &Path,
        prune: &dyn Fn(&RelativePath) -> bool,
    ) -> KeelResult<Vec<TreeEntry>>;
}

/// Port for template lookup.
///
/// Implemented by:
/// - `keel_adapters::catalog::BuiltinCatalog` (embedded Go service skeleton)
/// - `keel_adapters::catalog::FilesystemCatalog` (user template directory)
///
/// Bodies are immutable for the duration of a run; implementations may cache
/// them but must allow concurrent lookups.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateCatalog: Send + Sync {
    /// Template body by id; `TemplateNotFound` when absent.
    fn lookup(&self, id: &TemplateId) -> KeelResult<Arc<str>>;

    /// Entries of one group, in catalog order. Empty when the group has none.
    fn group(&self, key: GroupKey) -> KeelResult<Vec<TemplateEntry>>;
}

/// Failure reported by a template engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EngineError {
    pub message: String,
    /// 1-based line in the source passed to `render`, when known.
    pub line: Option<usize>,
}

impl EngineError {
    pub fn new(message: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }
}

/// Port for template evaluation.
///
/// Implemented by:
/// - `keel_adapters::engine::MiniJinjaEngine`
#[cfg_attr(test, mockall::automock)]
pub trait TemplateEngine: Send + Sync {
    /// Evaluate `source` against `context`. Must be a pure function of its inputs.
    fn render(&self, source: &str, context: &Value) -> Result<String, EngineError>;
}

//! Paths the generator creates once and never touches again.

use crate::domain::entities::common::RelativePath;

/// Name of the schema metadata record at the output root.
pub const METADATA_FILE: &str = ".keel-version";

const EXACT: &[&str] = &[
    "LICENSE",
    "LICENSE.md",
    "README.md",
    "CHANGELOG.md",
    "go.sum",
    "Cargo.lock",
    "package-lock.json",
    "yarn.lock",
    METADATA_FILE,
];

const PREFIXES: &[&str] = &[".git", ".hg", ".svn", "docs/_build", "site"];

/// Fixed allow-list of root-relative names and prefixes.
///
/// Matching entries are created if absent and otherwise never read,
/// diffed, or overwritten. Directories matching a prefix are not descended
/// into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreList {
    exact: Vec<String>,
    prefixes: Vec<String>,
}

impl Default for IgnoreList {
    fn default() -> Self {
        Self {
            exact: EXACT.iter().map(|s| (*s).to_owned()).collect(),
            prefixes: PREFIXES.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

impl IgnoreList {
    /// Extend the list with extra root-relative names.
    pub fn with_exact(mut self, path: impl Into<String>) -> Self {
        self.exact.push(path.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    pub fn matches(&self, path: &RelativePath) -> bool {
        self.exact.iter().any(|e| path.as_str() == e)
            || self.prefixes.iter().any(|p| path.starts_with(p))
    }
}

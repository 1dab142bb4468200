//! Machine-generated file naming convention.
//!
//! Generated source files carry a marker token in their name so they stand
//! out from hand-written siblings: `handler.go` becomes `handler_gen.go`.
//! Suffixes whose position is fixed by the target language (Go test files
//! must end in `_test.go`) keep their place and the marker goes in front:
//! `handler_test.go` becomes `handler_gen_test.go`.

use crate::domain::{entities::common::RelativePath, error::DomainError};

/// Extension stripped from every destination path before naming applies.
pub const TEMPLATE_EXTENSION: &str = ".tmpl";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    marker: String,
    source_suffixes: Vec<String>,
    reserved_suffixes: Vec<String>,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self::new("_gen", [".go"], ["_test.go"])
    }
}

impl NamingConvention {
    pub fn new<S, R>(marker: impl Into<String>, source_suffixes: S, reserved_suffixes: R) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        let mut reserved: Vec<String> = reserved_suffixes.into_iter().map(Into::into).collect();
        // Longest first so `_mock_test.go` wins over `_test.go`.
        reserved.sort_by_key(|s| std::cmp::Reverse(s.len()));
        Self {
            marker: marker.into(),
            source_suffixes: source_suffixes.into_iter().map(Into::into).collect(),
            reserved_suffixes: reserved,
        }
    }

    /// Only strips the template extension; never injects a marker.
    pub fn disabled() -> Self {
        Self::new("", Vec::<String>::new(), Vec::<String>::new())
    }

    /// Strip the template extension and inject the marker when the file is
    /// a recognized source file. Idempotent.
    pub fn apply(&self, path: &RelativePath) -> Result<RelativePath, DomainError> {
        let name = path.file_name();
        let name = match name.strip_suffix(TEMPLATE_EXTENSION) {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => name,
        };

        match self.marked_name(name) {
            Some(marked) => path.with_file_name(&marked),
            None => path.with_file_name(name),
        }
    }

    /// Whether the file name already carries the marker.
    pub fn is_marked(&self, path: &RelativePath) -> bool {
        self.split_marker(path.file_name()).is_some()
    }

    /// Inverse of [`apply`](Self::apply) for marked source files; `None`
    /// when the path carries no marker.
    pub fn strip(&self, path: &RelativePath) -> Option<RelativePath> {
        let (stem, suffix) = self.split_marker(path.file_name())?;
        path.with_file_name(&format!("{stem}{suffix}")).ok()
    }

    fn marked_name(&self, name: &str) -> Option<String> {
        if self.marker.is_empty() || self.split_marker(name).is_some() {
            return None;
        }
        let suffix = self.fixed_suffix(name)?;
        let stem = &name[..name.len() - suffix.len()];
        if stem.is_empty() {
            return None;
        }
        Some(format!("{stem}{}{suffix}", self.marker))
    }

    /// The suffix the marker must precede: a reserved suffix if one applies,
    /// otherwise the recognized source suffix.
    fn fixed_suffix<'a>(&'a self, name: &str) -> Option<&'a str> {
        let source = self
            .source_suffixes
            .iter()
            .find(|s| name.ends_with(s.as_str()))?;
        let reserved = self
            .reserved_suffixes
            .iter()
            .find(|r| r.ends_with(source.as_str()) && name.ends_with(r.as_str()) && name.len() > r.len());
        Some(reserved.unwrap_or(source).as_str())
    }

    /// Split `stem + marker + suffix` into `(stem, suffix)`.
    fn split_marker<'n>(&self, name: &'n str) -> Option<(&'n str, &'n str)> {
        if self.marker.is_empty() {
            return None;
        }
        let suffix_len = self.fixed_suffix(name)?.len();
        let (head, suffix) = name.split_at(name.len() - suffix_len);
        let stem = head.strip_suffix(self.marker.as_str())?;
        if stem.is_empty() {
            return None;
        }
        Some((stem, suffix))
    }
}

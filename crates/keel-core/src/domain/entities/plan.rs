use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;

use super::{
    common::RelativePath,
    template::TemplateId,
};
use crate::domain::{error::DomainError, params::Params};

/// A file target with its destination fully resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFile {
    pub final_path: RelativePath,
    /// Where an older generator schema put this file. Equals `final_path`
    /// unless a rename rule applied.
    pub prior_path: RelativePath,
    pub catalog_id: TemplateId,
    #[serde(skip)]
    pub params: Arc<Params>,
}

impl ResolvedFile {
    pub fn is_renamed(&self) -> bool {
        self.prior_path != self.final_path
    }
}

/// Everything one generator run intends to produce.
///
/// Invariants, enforced on insertion:
/// - no two files share a final path;
/// - no two renamed files share a prior path, and no prior path is another file's final path;
/// - every ancestor directory of a file is in `directories`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Plan {
    directories: BTreeSet<RelativePath>,
    files: BTreeMap<RelativePath, ResolvedFile>,
    #[serde(skip)]
    prior_index: BTreeMap<RelativePath, RelativePath>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_directory(&mut self, path: RelativePath) -> Result<(), DomainError> {
        if let Some(file) = self.files.get(&path) {
            return Err(conflict(&path, file.catalog_id.as_str(), "directory"));
        }
        let ancestors: Vec<_> = path.ancestors().collect();
        for ancestor in ancestors {
            self.ensure_directory(ancestor)?;
        }
        self.directories.insert(path);
        Ok(())
    }

    pub fn add_file(&mut self, file: ResolvedFile) -> Result<(), DomainError> {
        let path = &file.final_path;
        if let Some(existing) = self.files.get(path) {
            return Err(conflict(path, existing.catalog_id.as_str(), file.catalog_id.as_str()));
        }
        if self.directories.contains(path) {
            return Err(conflict(path, "directory", file.catalog_id.as_str()));
        }
        if let Some(other) = self.prior_index.get(path) {
            return Err(conflict(path, &format!("rename of {other}"), file.catalog_id.as_str()));
        }
        if file.is_renamed() {
            if let Some(other) = self.prior_index.get(&file.prior_path) {
                return Err(conflict(
                    &file.prior_path,
                    &format!("rename to {other}"),
                    file.catalog_id.as_str(),
                ));
            }
            if let Some(existing) = self.files.get(&file.prior_path) {
                return Err(conflict(
                    &file.prior_path,
                    existing.catalog_id.as_str(),
                    file.catalog_id.as_str(),
                ));
            }
        }

        for ancestor in path.ancestors().collect::<Vec<_>>() {
            self.ensure_directory(ancestor)?;
        }
        if file.is_renamed() {
            self.prior_index
                .insert(file.prior_path.clone(), file.final_path.clone());
        }
        self.files.insert(file.final_path.clone(), file);
        Ok(())
    }

    fn ensure_directory(&mut self, path: RelativePath) -> Result<(), DomainError> {
        if let Some(file) = self.files.get(&path) {
            return Err(conflict(&path, file.catalog_id.as_str(), "directory"));
        }
        self.directories.insert(path);
        Ok(())
    }

    pub fn directories(&self) -> &BTreeSet<RelativePath> {
        &self.directories
    }

    pub fn files(&self) -> impl Iterator<Item = &ResolvedFile> {
        self.files.values()
    }

    pub fn file(&self, path: &RelativePath) -> Option<&ResolvedFile> {
        self.files.get(path)
    }

    pub fn contains_file(&self, path: &RelativePath) -> bool {
        self.files.contains_key(path)
    }

    pub fn contains_directory(&self, path: &RelativePath) -> bool {
        self.directories.contains(path)
    }

    /// `prior_path → final_path` for every renamed file.
    pub fn renames(&self) -> &BTreeMap<RelativePath, RelativePath> {
        &self.prior_index
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

fn conflict(path: &RelativePath, existing: &str, incoming: &str) -> DomainError {
    DomainError::PlanConflict {
        path: path.to_string(),
        existing: existing.to_owned(),
        incoming: incoming.to_owned(),
    }
}

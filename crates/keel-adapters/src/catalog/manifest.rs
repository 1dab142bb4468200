//! `catalog.toml` parsing, shared by the built-in and on-disk catalogs.
//!
//! ```toml
//! [catalog]
//! name = "go-service"
//! description = "HTTP/gRPC service skeleton"
//!
//! [[groups.core]]
//! id = "core/main.go.tmpl"
//! dest = "cmd/{{ project.name }}/main.go"
//!
//! [[groups.core]]
//! kind = "directory"
//! dest = "internal"
//!
//! [[groups."transport.http"]]
//! id = "http/server.go.tmpl"
//! dest = "internal/transport/http/{{ transport.name | snake }}_server.go"
//! ```
//!
//! Group names are the display form of [`GroupKey`]. Entry order within a
//! group is kept.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use keel_core::{
    application::ApplicationError,
    domain::{EntryKind, GroupKey, RelativePath, TemplateEntry, TemplateId},
    error::KeelResult,
};

pub const MANIFEST_FILE: &str = "catalog.toml";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    #[serde(default)]
    catalog: RawCatalogSection,
    #[serde(default)]
    groups: BTreeMap<String, Vec<RawEntry>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCatalogSection {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntry {
    id: Option<String>,
    dest: String,
    #[serde(default)]
    kind: EntryKind,
}

/// A parsed and checked catalog manifest.
#[derive(Debug, Clone, Default)]
pub struct CatalogManifest {
    pub name: String,
    pub description: String,
    groups: HashMap<GroupKey, Vec<TemplateEntry>>,
}

impl CatalogManifest {
    /// Parse manifest text. Unknown groups, file entries without an `id`
    /// and ids that are not plain relative paths are rejected.
    pub fn parse(text: &str) -> KeelResult<Self> {
        let raw: RawManifest = toml::from_str(text).map_err(|e| invalid(e.to_string()))?;

        let mut groups = HashMap::new();
        for (name, raw_entries) in raw.groups {
            let key: GroupKey = name.parse().map_err(|e| invalid(format!("{e}")))?;
            let entries = raw_entries
                .into_iter()
                .map(|raw| entry(&name, raw))
                .collect::<KeelResult<Vec<_>>>()?;
            groups.insert(key, entries);
        }

        Ok(Self {
            name: raw.catalog.name,
            description: raw.catalog.description,
            groups,
        })
    }

    pub fn group(&self, key: GroupKey) -> Vec<TemplateEntry> {
        self.groups.get(&key).cloned().unwrap_or_default()
    }

    /// Every group with its entries, sorted by group name.
    pub fn groups(&self) -> Vec<(GroupKey, &[TemplateEntry])> {
        let mut all: Vec<_> = self
            .groups
            .iter()
            .map(|(key, entries)| (*key, entries.as_slice()))
            .collect();
        all.sort_by_key(|(key, _)| key.to_string());
        all
    }

    /// Ids of every file entry, for checking that bodies exist.
    pub fn body_ids(&self) -> impl Iterator<Item = &TemplateId> {
        self.groups
            .values()
            .flatten()
            .filter(|e| e.kind == EntryKind::File)
            .map(|e| &e.catalog_id)
    }
}

fn entry(group: &str, raw: RawEntry) -> KeelResult<TemplateEntry> {
    match raw.kind {
        EntryKind::Directory => Ok(TemplateEntry::directory(raw.dest)),
        EntryKind::File => {
            let id = raw.id.ok_or_else(|| {
                invalid(format!("file entry '{}' in group '{group}' has no id", raw.dest))
            })?;
            RelativePath::try_new(&id)
                .map_err(|e| invalid(format!("template id '{id}' is not a relative path: {e}")))?;
            Ok(TemplateEntry::file(id, raw.dest))
        }
    }
}

fn invalid(reason: String) -> keel_core::error::KeelError {
    ApplicationError::InvalidCatalog { reason }.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::domain::TransportKind;

    #[test]
    fn parses_groups_in_entry_order() {
        let manifest = CatalogManifest::parse(
            r#"
            [catalog]
            name = "mini"

            [[groups.core]]
            id = "main.go.tmpl"
            dest = "main.go"

            [[groups.core]]
            kind = "directory"
            dest = "internal"

            [[groups."transport.http"]]
            id = "server.go.tmpl"
            dest = "internal/{{ transport.name }}.go"
            "#,
        )
        .unwrap();

        assert_eq!(manifest.name, "mini");
        let core = manifest.group(GroupKey::Core);
        assert_eq!(core.len(), 2);
        assert_eq!(core[0].catalog_id.as_str(), "main.go.tmpl");
        assert_eq!(core[1].kind, EntryKind::Directory);
        assert_eq!(manifest.group(GroupKey::Transport(TransportKind::Http)).len(), 1);
        assert!(manifest.group(GroupKey::Docs).is_empty());
        assert_eq!(manifest.body_ids().count(), 2);
    }

    #[test]
    fn unknown_group_is_invalid_catalog() {
        let err = CatalogManifest::parse("[[groups.plugins]]\nid = \"a\"\ndest = \"a\"\n").unwrap_err();
        assert!(err.to_string().contains("unknown catalog group"));
    }

    #[test]
    fn file_entry_needs_an_id() {
        let err = CatalogManifest::parse("[[groups.core]]\ndest = \"main.go\"\n").unwrap_err();
        assert!(err.to_string().contains("has no id"));
    }

    #[test]
    fn escaping_ids_are_rejected() {
        let err =
            CatalogManifest::parse("[[groups.core]]\nid = \"../x\"\ndest = \"x\"\n").unwrap_err();
        assert!(err.to_string().contains("not a relative path"));
    }
}

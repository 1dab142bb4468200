//! Template catalog entries and bound references.
//!
//! ```text
//! TemplateCatalog ──group(GroupKey)──▶ Vec<TemplateEntry>
//!                                          │ bound to one Params
//!                                          ▼
//!                                      TemplateRef ──PathResolver──▶ ResolvedFile
//! ```
//!
//! A [`TemplateEntry`] is static catalog data. A [`TemplateRef`] is the
//! same entry bound to the parameter bag of one group instance (one
//! transport, one application, ...), so a single entry can yield many files.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    params::Params,
    value_objects::{DriverKind, TransportKind, WorkerKind},
};

/// Opaque key of a template body in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TemplateId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    File,
    Directory,
}

/// One catalog entry: which body to render and where.
///
/// `dest` is itself a template, evaluated against the bound parameters.
/// Directory entries have no body; their `catalog_id` is informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub catalog_id: TemplateId,
    pub dest: String,
    #[serde(default)]
    pub kind: EntryKind,
}

impl TemplateEntry {
    pub fn file(catalog_id: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            catalog_id: TemplateId::new(catalog_id),
            dest: dest.into(),
            kind: EntryKind::File,
        }
    }

    pub fn directory(dest: impl Into<String>) -> Self {
        let dest = dest.into();
        Self {
            catalog_id: TemplateId::new(format!("dir:{dest}")),
            dest,
            kind: EntryKind::Directory,
        }
    }

    pub fn bind(&self, params: Arc<Params>) -> TemplateRef {
        TemplateRef {
            catalog_id: self.catalog_id.clone(),
            dest_path_template: self.dest.clone(),
            params,
            kind: self.kind,
        }
    }
}

/// A catalog entry bound to one parameter bag. Stateless across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRef {
    pub catalog_id: TemplateId,
    pub dest_path_template: String,
    pub params: Arc<Params>,
    pub kind: EntryKind,
}

/// Selects one group of catalog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Project skeleton, always present.
    Core,
    /// Shared code for a transport kind, once per kind in use.
    TransportKind(TransportKind),
    /// One instance per configured transport.
    Transport(TransportKind),
    Worker(WorkerKind),
    Driver(DriverKind),
    /// One instance per configured application.
    Application,
    Docs,
    Packaging,
    Observability,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core => f.write_str("core"),
            Self::TransportKind(k) => write!(f, "transport_kind.{k}"),
            Self::Transport(k) => write!(f, "transport.{k}"),
            Self::Worker(k) => write!(f, "worker.{k}"),
            Self::Driver(k) => write!(f, "driver.{k}"),
            Self::Application => f.write_str("application"),
            Self::Docs => f.write_str("docs"),
            Self::Packaging => f.write_str("packaging"),
            Self::Observability => f.write_str("observability"),
        }
    }
}

impl FromStr for GroupKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.split_once('.') {
            None => match s {
                "core" => Self::Core,
                "application" => Self::Application,
                "docs" => Self::Docs,
                "packaging" => Self::Packaging,
                "observability" => Self::Observability,
                _ => return Err(unknown_group(s)),
            },
            Some(("transport_kind", kind)) => Self::TransportKind(kind.parse()?),
            Some(("transport", kind)) => Self::Transport(kind.parse()?),
            Some(("worker", kind)) => Self::Worker(kind.parse()?),
            Some(("driver", kind)) => Self::Driver(kind.parse()?),
            Some(_) => return Err(unknown_group(s)),
        };
        Ok(key)
    }
}

fn unknown_group(s: &str) -> DomainError {
    DomainError::InvalidConfig(format!("unknown catalog group: {s}"))
}

//! Version-indexed rename rules.
//!
//! A generated file may have lived somewhere else under an older generator
//! schema. Given the schema version recorded in the output tree, the table
//! rewinds a current path to where that older generator would have put it,
//! so the reconciler can move the file instead of orphaning it.

use crate::domain::{entities::common::RelativePath, naming::NamingConvention};

/// Schema version written by this generator.
pub const CURRENT_SCHEMA_VERSION: u32 = 3;

/// Version assumed when no metadata record exists.
pub const INITIAL_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPredicate {
    /// Component-wise prefix match.
    HasPrefix(String),
    /// File name carries the naming convention marker.
    HasMarker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathTransform {
    ReplacePrefix { from: String, to: String },
    StripMarker,
}

/// One schema change: files matching `predicate` were at `transform(path)`
/// in every schema version below `threshold`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameRule {
    pub threshold: u32,
    pub predicate: PathPredicate,
    pub transform: PathTransform,
}

impl RenameRule {
    fn matches(&self, path: &RelativePath, naming: &NamingConvention) -> bool {
        match &self.predicate {
            PathPredicate::HasPrefix(prefix) => path.starts_with(prefix),
            PathPredicate::HasMarker => naming.is_marked(path),
        }
    }

    fn rewind(&self, path: &RelativePath, naming: &NamingConvention) -> Option<RelativePath> {
        match &self.transform {
            PathTransform::ReplacePrefix { from, to } => {
                let rest = path.as_path().strip_prefix(from).ok()?;
                if rest.as_os_str().is_empty() {
                    RelativePath::try_new(to).ok()
                } else {
                    RelativePath::try_new(to).ok()?.join(rest).ok()
                }
            }
            PathTransform::StripMarker => naming.strip(path),
        }
    }
}

/// Ordered rule list, newest schema change first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameTable {
    rules: Vec<RenameRule>,
    naming: NamingConvention,
}

impl Default for RenameTable {
    fn default() -> Self {
        Self::builtin(NamingConvention::default())
    }
}

impl RenameTable {
    pub fn new(rules: Vec<RenameRule>, naming: NamingConvention) -> Self {
        Self { rules, naming }
    }

    /// No rules: `prior_path` always equals the final path.
    pub fn empty() -> Self {
        Self::new(Vec::new(), NamingConvention::default())
    }

    /// The generator's own history.
    pub fn builtin(naming: NamingConvention) -> Self {
        Self::new(
            vec![
                RenameRule {
                    threshold: 3,
                    predicate: PathPredicate::HasPrefix("internal/transport".into()),
                    transform: PathTransform::ReplacePrefix {
                        from: "internal/transport".into(),
                        to: "pkg/transport".into(),
                    },
                },
                RenameRule {
                    threshold: 2,
                    predicate: PathPredicate::HasMarker,
                    transform: PathTransform::StripMarker,
                },
            ],
            naming,
        )
    }

    /// Where `final_path` lived under `schema_version`.
    ///
    /// Every rule whose threshold exceeds `schema_version` is tested against
    /// the running candidate, in table order.
    pub fn prior_path(&self, final_path: &RelativePath, schema_version: u32) -> RelativePath {
        self.rules
            .iter()
            .filter(|rule| rule.threshold > schema_version)
            .fold(final_path.clone(), |candidate, rule| {
                if !rule.matches(&candidate, &self.naming) {
                    return candidate;
                }
                rule.rewind(&candidate, &self.naming).unwrap_or(candidate)
            })
    }
}

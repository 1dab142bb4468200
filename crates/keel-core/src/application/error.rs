//! Application layer errors.
//!
//! These errors represent failures while orchestrating a run: catalog
//! lookups, template evaluation, tree classification and disk writes.
//! Business rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// No template body under this catalog id.
    #[error("Template not found in catalog: {id}")]
    TemplateNotFound { id: String },

    /// The catalog itself is malformed (bad manifest, unknown group).
    #[error("Invalid template catalog: {reason}")]
    InvalidCatalog { reason: String },

    /// A destination path template failed to evaluate.
    #[error("Cannot evaluate destination path '{template}' of '{catalog_id}': {reason}")]
    PathEvaluation {
        template: String,
        catalog_id: String,
        reason: String,
    },

    /// A file body failed to render. `context` holds the lines around the
    /// fault in the composed template, when the engine reported a line.
    #[error("Template evaluation failed for {} ('{catalog_id}'): {reason}{}", .path.display(), format_context(.context))]
    TemplateEvaluation {
        path: PathBuf,
        catalog_id: String,
        reason: String,
        line: Option<usize>,
        context: String,
    },

    /// A file that will be regenerated has no end-generated marker.
    #[error("Generated file {} has no end-generated marker; refusing to overwrite it", .path.display())]
    DisclaimerAnchorMissing { path: PathBuf },

    /// Obsolete generated files still hold user content.
    #[error("Refusing to continue: no longer generated but holding user content: {}", join_paths(.paths))]
    DataLossGuard { paths: Vec<PathBuf> },

    /// A rename target already exists next to its source.
    #[error("Cannot move {} to {}: destination already exists", .from.display(), .to.display())]
    RenameCollision { from: PathBuf, to: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {}: {reason}", .path.display())]
    FilesystemError { path: PathBuf, reason: String },

    /// The schema version record cannot be parsed.
    #[error("Corrupt schema metadata at {}: {content:?} is not a version number", .path.display())]
    MetadataCorrupt { path: PathBuf, content: String },

    /// Catalog cache lock poisoned.
    #[error("Template catalog cache is unavailable")]
    StoreLockError,
}

fn format_context(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!("\n{context}")
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { id } => vec![
                format!("No body registered for '{}'", id),
                "Check the template directory passed with --templates".into(),
            ],
            Self::InvalidCatalog { reason } => vec![
                format!("Catalog problem: {}", reason),
                "Check catalog.toml in your template directory".into(),
            ],
            Self::PathEvaluation { template, .. } => vec![
                format!("Fix the destination path template '{}'", template),
                "Destination paths may only reference fields of the bound group".into(),
            ],
            Self::TemplateEvaluation { line, .. } => {
                let mut tips = vec!["Fix the template body; the faulting line is marked with '>>'".into()];
                if line.is_none() {
                    tips.push("The engine did not report a line number".into());
                }
                tips
            }
            Self::DisclaimerAnchorMissing { path } => vec![
                format!("{} predates disclaimer support or was edited above the marker", path.display()),
                "Move any hand-written code to a separate file, then delete the generated file".into(),
            ],
            Self::DataLossGuard { paths } => vec![
                format!("{} file(s) would lose user code", paths.len()),
                "Move the code below the end-generated marker elsewhere, then delete the file".into(),
                "Nothing was written".into(),
            ],
            Self::RenameCollision { from, .. } => vec![
                format!("Merge {} into its new location by hand, then delete it", from.display()),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Re-running is safe: directory creation and renames are idempotent".into(),
            ],
            Self::MetadataCorrupt { path, .. } => vec![
                format!("{} must contain a single integer", path.display()),
                "Restore it from version control".into(),
            ],
            Self::StoreLockError => vec!["Try again".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::PathEvaluation { .. } | Self::TemplateEvaluation { .. } => {
                ErrorCategory::Validation
            }
            Self::InvalidCatalog { .. } | Self::MetadataCorrupt { .. } => {
                ErrorCategory::Configuration
            }
            Self::DisclaimerAnchorMissing { .. }
            | Self::DataLossGuard { .. }
            | Self::RenameCollision { .. } => ErrorCategory::Safety,
            Self::FilesystemError { .. } | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_loss_guard_names_every_path() {
        let err = ApplicationError::DataLossGuard {
            paths: vec!["a/old_gen.go".into(), "b/gone_gen.go".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("a/old_gen.go"));
        assert!(msg.contains("b/gone_gen.go"));
        assert_eq!(err.category(), ErrorCategory::Safety);
    }

    #[test]
    fn template_evaluation_shows_context() {
        let err = ApplicationError::TemplateEvaluation {
            path: "main.go".into(),
            catalog_id: "core/main.go".into(),
            reason: "undefined value".into(),
            line: Some(4),
            context: ">>    4 | {{ nope }}".into(),
        };
        assert!(err.to_string().ends_with("\n>>    4 | {{ nope }}"));
    }
}

// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (reports carry them around)
/// - Categorizable (for CLI display and exit codes)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid project configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    // ========================================================================
    // Plan Conflicts
    // ========================================================================
    /// Two template references resolved to the same output path.
    #[error("Plan conflict: '{path}' is produced by both '{existing}' and '{incoming}'")]
    PlanConflict {
        path: String,
        existing: String,
        incoming: String,
    },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidConfig(msg) => vec![
                "Check your keel.toml manifest".into(),
                format!("Details: {}", msg),
            ],
            Self::InvalidPath { path, .. } => vec![
                format!("Destination path '{}' is not usable", path),
                "Output paths must be relative and may not contain '..'".into(),
            ],
            Self::PlanConflict {
                existing, incoming, ..
            } => vec![
                "Two templates write the same file; this is a catalog authoring bug".into(),
                format!("Check the destination paths of '{}' and '{}'", existing, incoming),
                "Names of transports, workers, drivers and applications must not collide".into(),
            ],
            Self::MissingRequiredField { field } => {
                vec![format!("Add the '{}' field to your manifest", field)]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfig(_) | Self::MissingRequiredField { .. } => {
                ErrorCategory::Validation
            }
            Self::InvalidPath { .. } | Self::PlanConflict { .. } => ErrorCategory::Conflict,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
}

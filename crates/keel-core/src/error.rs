//! The error every keel-core entry point returns.
//!
//! [`KeelError`] is a thin union of the domain and application layers. The
//! CLI only looks at [`KeelError::category`] to choose an exit code and at
//! [`KeelError::suggestions`] for the hint lines under the message.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{DomainError, ErrorCategory as DomainCategory};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum KeelError {
    /// The manifest or the plan derived from it is invalid.
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Catalog, engine, filesystem or safety failure during a run.
    #[error("{0}")]
    Application(#[from] ApplicationError),
}

impl KeelError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            // Both domain kinds trace back to the manifest.
            Self::Domain(e) => match e.category() {
                DomainCategory::Validation | DomainCategory::Conflict => ErrorCategory::Validation,
            },
            Self::Application(e) => e.category(),
        }
    }

    /// Whether the run was refused to protect existing content.
    pub fn is_safety_refusal(&self) -> bool {
        self.category() == ErrorCategory::Safety
    }
}

/// How a failure is presented and which exit code it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    /// Refused to overwrite or orphan user content.
    Safety,
    Internal,
}

pub type KeelResult<T> = Result<T, KeelError>;

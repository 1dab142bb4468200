//! Application layer for keel.
//!
//! This layer contains:
//! - **Services**: the generation pipeline (plan, reconcile, render, commit)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer. Path spelling,
//! disclaimers and the ignore list are domain rules; this layer decides
//! when they run and against which port.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    CommitSummary, Committer, ContentRenderer, GenerateOptions, GenerateService,
    GenerationReport, PathResolver, PlanBuilder, PreservedContent, Reconciliation, RenameEntry,
    RenderFailure, TreeReconciler,
};

// Re-export port traits (for adapter implementation)
pub use ports::{EngineError, Filesystem, TemplateCatalog, TemplateEngine, TreeEntry};

pub use error::ApplicationError;

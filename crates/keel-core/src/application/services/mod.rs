//! Application services - orchestrate use cases.
//!
//! One component per pipeline stage; `GenerateService` wires them together.

pub mod committer;
pub mod content_renderer;
pub mod generate_service;
pub mod metadata;
pub mod path_resolver;
pub mod plan_builder;
pub mod reconciler;

pub use committer::{CommitSummary, Committer};
pub use content_renderer::{ContentRenderer, context_window};
pub use generate_service::{
    GenerateOptions, GenerateService, GenerationReport, PreservedContent, RenameEntry,
    RenderFailure,
};
pub use path_resolver::PathResolver;
pub use plan_builder::PlanBuilder;
pub use reconciler::{Reconciliation, TreeReconciler};

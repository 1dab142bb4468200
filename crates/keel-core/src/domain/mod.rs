//! Core domain layer for keel.
//!
//! Pure logic only: no filesystem, no template engine, no logging
//! subscriber. Everything that touches the outside world goes through the
//! ports in `crate::application::ports`.
//!
//! ## Contents
//!
//! - **config**: the project manifest model and its validation
//! - **params**: typed parameter bags, one variant per catalog group family
//! - **naming / rename**: how destination paths are spelled now and were spelled before
//! - **disclaimer / ignore**: what marks a region as generated, what is never touched
//! - **text**: helper functions exposed to templates
pub mod config;
pub mod disclaimer;
pub mod entities;
pub mod error;
pub mod ignore;
pub mod naming;
pub mod params;
pub mod rename;
pub mod text;
pub mod value_objects;

pub use config::{
    ApplicationConfig, DriverConfig, Features, ProjectConfig, ProjectSection, TransportConfig,
    WorkerConfig,
};
pub use disclaimer::{ANCHOR, CommentSyntax, Disclaimer, split_user_content};
pub use entities::{
    EntryKind, GroupKey, Plan, RelativePath, ResolvedFile, TemplateEntry, TemplateId, TemplateRef,
};
pub use error::{DomainError, ErrorCategory};
pub use ignore::{IgnoreList, METADATA_FILE};
pub use naming::NamingConvention;
pub use params::{
    ApplicationParams, CoreParams, DriverParams, FeatureKind, FeatureParams, Params,
    ProjectParams, RenderParams, TransportParams, WorkerParams,
};
pub use rename::{
    CURRENT_SCHEMA_VERSION, INITIAL_SCHEMA_VERSION, PathPredicate, PathTransform, RenameRule,
    RenameTable,
};
pub use value_objects::{DriverKind, TransportKind, WorkerKind};

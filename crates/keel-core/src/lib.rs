//! keel Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for keel, a
//! regeneration-safe project generator, following hexagonal (ports and
//! adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             keel-cli (CLI)              │
//! │       (manifest, flags, reporting)      │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │          Application Services           │
//! │  PlanBuilder → TreeReconciler →         │
//! │  ContentRenderer → Committer            │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Application Ports (Traits)       │
//! │ (Filesystem, TemplateCatalog, Engine)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      keel-adapters (Infrastructure)     │
//! │ (LocalFilesystem, BuiltinCatalog, ...)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use keel_core::prelude::*;
//!
//! let service = GenerateService::new(filesystem, catalog, engine);
//! let report = service.generate(&config, Path::new("./shop"), GenerateOptions::default())?;
//! println!("{} files created", report.created_files.len());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerateOptions, GenerateService, GenerationReport,
        ports::{EngineError, Filesystem, TemplateCatalog, TemplateEngine, TreeEntry},
    };
    pub use crate::domain::{
        EntryKind, GroupKey, Plan, ProjectConfig, RelativePath, TemplateEntry, TemplateId,
    };
    pub use crate::error::{KeelError, KeelResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `keel-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: reading, walking and writing the output tree
//!   - `TemplateCatalog`: template bodies and group entries
//!   - `TemplateEngine`: template evaluation
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by `GenerateService`)

pub mod output;

pub use output::{EngineError, Filesystem, TemplateCatalog, TemplateEngine, TreeEntry};

#[cfg(test)]
pub use output::{MockTemplateCatalog, MockTemplateEngine};

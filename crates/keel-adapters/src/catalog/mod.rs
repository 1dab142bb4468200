//! Template catalogs.

mod builtin;
mod filesystem;
mod manifest;

pub use builtin::BuiltinCatalog;
pub use filesystem::FilesystemCatalog;
pub use manifest::{CatalogManifest, MANIFEST_FILE};

//! On-disk template catalog.
//!
//! # Directory layout expected
//!
//! ```text
//! my-templates/
//! ├── catalog.toml          ← group → entries manifest (required)
//! ├── core/
//! │   └── main.go.tmpl      ← body, addressed by its path as the id
//! └── http/
//!     └── listener.go.tmpl
//! ```
//!
//! The manifest is read eagerly. Bodies are read on first lookup and kept
//! for the lifetime of the catalog.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use tracing::{debug, instrument};

use keel_core::{
    application::{ApplicationError, ports::TemplateCatalog},
    domain::{GroupKey, TemplateEntry, TemplateId},
    error::KeelResult,
};

use super::manifest::{CatalogManifest, MANIFEST_FILE};

/// Catalog backed by a template directory.
#[derive(Debug)]
pub struct FilesystemCatalog {
    root: PathBuf,
    manifest: CatalogManifest,
    cache: RwLock<HashMap<TemplateId, Arc<str>>>,
}

impl FilesystemCatalog {
    /// Open the catalog rooted at `root`, parsing `root/catalog.toml`.
    ///
    /// # Errors
    ///
    /// `InvalidCatalog` when the manifest is missing or malformed.
    #[instrument(skip_all, fields(root = %root.as_ref().display()))]
    pub fn open(root: impl AsRef<Path>) -> KeelResult<Self> {
        let root = root.as_ref().to_path_buf();
        let manifest_path = root.join(MANIFEST_FILE);

        let text = fs::read_to_string(&manifest_path).map_err(|e| {
            ApplicationError::InvalidCatalog {
                reason: format!("cannot read {}: {e}", manifest_path.display()),
            }
        })?;
        let manifest = CatalogManifest::parse(&text)?;

        debug!(catalog = %manifest.name, "Opened template directory");
        Ok(Self {
            root,
            manifest,
            cache: RwLock::new(HashMap::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &CatalogManifest {
        &self.manifest
    }

    fn load(&self, id: &TemplateId) -> KeelResult<Arc<str>> {
        let path = self.root.join(id.as_str());
        match fs::read_to_string(&path) {
            Ok(body) => Ok(Arc::from(body)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ApplicationError::TemplateNotFound {
                    id: id.to_string(),
                }
                .into())
            }
            Err(e) => Err(ApplicationError::FilesystemError {
                path,
                reason: format!("Failed to read template: {e}"),
            }
            .into()),
        }
    }
}

impl TemplateCatalog for FilesystemCatalog {
    fn lookup(&self, id: &TemplateId) -> KeelResult<Arc<str>> {
        {
            let cache = self
                .cache
                .read()
                .map_err(|_| ApplicationError::StoreLockError)?;
            if let Some(body) = cache.get(id) {
                return Ok(Arc::clone(body));
            }
        }

        let body = self.load(id)?;
        let mut cache = self
            .cache
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        // Another thread may have loaded it meanwhile; keep the first copy.
        let body = cache.entry(id.clone()).or_insert(body);
        Ok(Arc::clone(body))
    }

    fn group(&self, key: GroupKey) -> KeelResult<Vec<TemplateEntry>> {
        Ok(self.manifest.group(key))
    }
}

//! Command handlers, one module per subcommand.
//!
//! Handlers translate arguments into core calls and print the result. The
//! helpers below wire the adapters the same way for every command.

pub mod catalog;
pub mod completions;
pub mod config;
pub mod generate;
pub mod init;
pub mod plan;

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use keel_adapters::{
    BuiltinCatalog, CatalogManifest, FilesystemCatalog, LocalFilesystem, MiniJinjaEngine,
};
use keel_core::{
    application::{GenerateService, TemplateCatalog},
    domain::ProjectConfig,
};

use crate::{
    cli::SourceArgs,
    config::AppConfig,
    error::{CliError, CliResult},
};

/// Manifest, output root and catalog after flags and config are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct Sources {
    pub manifest: PathBuf,
    pub output: PathBuf,
    pub templates: Option<PathBuf>,
}

impl Sources {
    pub fn resolve(args: SourceArgs, config: &AppConfig) -> Self {
        Self {
            manifest: args.manifest.unwrap_or_else(|| config.generate.manifest.clone()),
            output: args.output.unwrap_or_else(|| config.generate.output.clone()),
            templates: args.templates.or_else(|| config.generate.templates.clone()),
        }
    }
}

/// Read and parse a `keel.toml`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_manifest(path: &Path) -> CliResult<ProjectConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CliError::ManifestNotFound {
            path: path.to_path_buf(),
        },
        _ => CliError::IoError {
            message: format!("Failed to read {}", path.display()),
            source: e,
        },
    })?;

    let config: ProjectConfig = toml::from_str(&text).map_err(|e| CliError::ManifestInvalid {
        path: path.to_path_buf(),
        message: e.message().to_owned(),
        source: Some(Box::new(e)),
    })?;
    debug!(project = %config.project.name, "Manifest loaded");
    Ok(config)
}

/// Either the embedded catalog or one read from a directory.
pub enum Catalog {
    Builtin(BuiltinCatalog),
    Directory(FilesystemCatalog),
}

impl Catalog {
    pub fn open(templates: Option<&Path>) -> CliResult<Self> {
        match templates {
            Some(dir) => Ok(Self::Directory(FilesystemCatalog::open(dir)?)),
            None => Ok(Self::Builtin(BuiltinCatalog::new()?)),
        }
    }

    pub fn manifest(&self) -> &CatalogManifest {
        match self {
            Self::Builtin(c) => c.manifest(),
            Self::Directory(c) => c.manifest(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Builtin(_) => "built-in".into(),
            Self::Directory(c) => c.root().display().to_string(),
        }
    }

    fn into_port(self) -> Box<dyn TemplateCatalog> {
        match self {
            Self::Builtin(c) => Box::new(c),
            Self::Directory(c) => Box::new(c),
        }
    }
}

/// Generate service over the local filesystem.
pub fn build_service(catalog: Catalog) -> GenerateService {
    GenerateService::new(
        Box::new(LocalFilesystem::new()),
        catalog.into_port(),
        Box::new(MiniJinjaEngine::new()),
    )
}

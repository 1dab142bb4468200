//! Shared fixtures for pipeline tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use keel_adapters::{FilesystemCatalog, MemoryFilesystem, MiniJinjaEngine};
use keel_core::{
    application::GenerateService,
    domain::{Disclaimer, ProjectConfig, RelativePath, TransportConfig, TransportKind},
};
use tempfile::TempDir;

pub const ROOT: &str = "/out";

pub const MANIFEST: &str = r#"
[catalog]
name = "fixture"

[[groups.core]]
id = "main.go.tmpl"
dest = "cmd/{{ project.name }}/main.go"

[[groups.core]]
id = "app.conf.tmpl"
dest = "config/app.conf"

[[groups.core]]
id = "settings.json.tmpl"
dest = "config/settings.json"

[[groups.core]]
id = "README.md.tmpl"
dest = "README.md"

[[groups."transport.http"]]
id = "handler.go.tmpl"
dest = "internal/transport/http/{{ transport.name | snake }}_handler.go"
"#;

pub const BODIES: &[(&str, &str)] = &[
    ("main.go.tmpl", "package main\n"),
    ("app.conf.tmpl", "name = {{ project.name }}\n"),
    ("settings.json.tmpl", "{\"name\": \"{{ project.name | json_escape }}\"}\n"),
    ("README.md.tmpl", "{{ project.name }} service\n"),
    (
        "handler.go.tmpl",
        "package http\n\n// {{ transport.name }} listens on {{ transport.port }}\n",
    ),
];

/// A template directory holding `manifest` and `bodies`.
pub fn catalog_dir(manifest: &str, bodies: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("catalog.toml"), manifest).unwrap();
    for (id, body) in bodies {
        let path = dir.path().join(id);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }
    dir
}

/// A service over an in-memory tree, plus the handles tests inspect.
pub struct Harness {
    pub service: GenerateService,
    pub fs: MemoryFilesystem,
    _templates: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_catalog(MANIFEST, BODIES)
    }

    pub fn with_catalog(manifest: &str, bodies: &[(&str, &str)]) -> Self {
        Self::customized(manifest, bodies, |service| service)
    }

    /// The default fixture with the service's path rules replaced by `customize`.
    pub fn with_service(customize: impl FnOnce(GenerateService) -> GenerateService) -> Self {
        Self::customized(MANIFEST, BODIES, customize)
    }

    fn customized(
        manifest: &str,
        bodies: &[(&str, &str)],
        customize: impl FnOnce(GenerateService) -> GenerateService,
    ) -> Self {
        let templates = catalog_dir(manifest, bodies);
        let fs = MemoryFilesystem::new();
        let catalog = FilesystemCatalog::open(templates.path()).unwrap();
        let service = customize(GenerateService::new(
            Box::new(fs.clone()),
            Box::new(catalog),
            Box::new(MiniJinjaEngine::new()),
        ));
        Self {
            service,
            fs,
            _templates: templates,
        }
    }

    pub fn root(&self) -> &Path {
        Path::new(ROOT)
    }

    pub fn path(&self, relative: &str) -> String {
        format!("{ROOT}/{relative}")
    }

    pub fn read(&self, relative: &str) -> String {
        self.fs
            .file_string(self.path(relative))
            .unwrap_or_else(|| panic!("{relative} missing"))
    }

    pub fn seed(&self, relative: &str, content: &str) {
        self.fs.insert_file(self.path(relative), content);
    }
}

/// `shop` with one HTTP transport named `public`.
pub fn config() -> ProjectConfig {
    config_with_port(8080)
}

pub fn config_with_port(port: u16) -> ProjectConfig {
    let mut config = ProjectConfig::new("shop", "github.com/acme/shop");
    config.transports.push(TransportConfig {
        name: "public".into(),
        kind: TransportKind::Http,
        port,
    });
    config
}

/// What keel writes for `body` at `path`, before any user content.
pub fn generated(path: &str, body: &str) -> String {
    let path = RelativePath::new(path);
    Disclaimer::for_path(&path).wrap(body, &path)
}

//! Built-in Go service catalog, embedded in the binary.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use keel_core::{
    application::{ApplicationError, ports::TemplateCatalog},
    domain::{GroupKey, TemplateEntry, TemplateId},
    error::KeelResult,
};

use super::manifest::CatalogManifest;

const MANIFEST: &str = include_str!("../../templates/go-service/catalog.toml");

const BODIES: &[(&str, &str)] = &[
    (
        "app/handler.go.tmpl",
        include_str!("../../templates/go-service/app/handler.go.tmpl"),
    ),
    (
        "app/service.go.tmpl",
        include_str!("../../templates/go-service/app/service.go.tmpl"),
    ),
    (
        "app/service_test.go.tmpl",
        include_str!("../../templates/go-service/app/service_test.go.tmpl"),
    ),
    (
        "core/Makefile.tmpl",
        include_str!("../../templates/go-service/core/Makefile.tmpl"),
    ),
    (
        "core/README.md.tmpl",
        include_str!("../../templates/go-service/core/README.md.tmpl"),
    ),
    (
        "core/app.go.tmpl",
        include_str!("../../templates/go-service/core/app.go.tmpl"),
    ),
    (
        "core/config.go.tmpl",
        include_str!("../../templates/go-service/core/config.go.tmpl"),
    ),
    (
        "core/config.yaml.tmpl",
        include_str!("../../templates/go-service/core/config.yaml.tmpl"),
    ),
    (
        "core/defaults.json.tmpl",
        include_str!("../../templates/go-service/core/defaults.json.tmpl"),
    ),
    (
        "core/gitignore.tmpl",
        include_str!("../../templates/go-service/core/gitignore.tmpl"),
    ),
    (
        "core/go.mod.tmpl",
        include_str!("../../templates/go-service/core/go.mod.tmpl"),
    ),
    (
        "core/main.go.tmpl",
        include_str!("../../templates/go-service/core/main.go.tmpl"),
    ),
    (
        "docs/index.md.tmpl",
        include_str!("../../templates/go-service/docs/index.md.tmpl"),
    ),
    (
        "docs/operations.md.tmpl",
        include_str!("../../templates/go-service/docs/operations.md.tmpl"),
    ),
    (
        "driver/init.sql.tmpl",
        include_str!("../../templates/go-service/driver/init.sql.tmpl"),
    ),
    (
        "driver/kafka.go.tmpl",
        include_str!("../../templates/go-service/driver/kafka.go.tmpl"),
    ),
    (
        "driver/postgres.go.tmpl",
        include_str!("../../templates/go-service/driver/postgres.go.tmpl"),
    ),
    (
        "driver/redis.go.tmpl",
        include_str!("../../templates/go-service/driver/redis.go.tmpl"),
    ),
    (
        "grpc/listener.go.tmpl",
        include_str!("../../templates/go-service/grpc/listener.go.tmpl"),
    ),
    (
        "grpc/server.go.tmpl",
        include_str!("../../templates/go-service/grpc/server.go.tmpl"),
    ),
    (
        "grpc/service.proto.tmpl",
        include_str!("../../templates/go-service/grpc/service.proto.tmpl"),
    ),
    (
        "http/listener.go.tmpl",
        include_str!("../../templates/go-service/http/listener.go.tmpl"),
    ),
    (
        "http/middleware.go.tmpl",
        include_str!("../../templates/go-service/http/middleware.go.tmpl"),
    ),
    (
        "http/router.go.tmpl",
        include_str!("../../templates/go-service/http/router.go.tmpl"),
    ),
    (
        "observability/prometheus.yml.tmpl",
        include_str!("../../templates/go-service/observability/prometheus.yml.tmpl"),
    ),
    (
        "observability/telemetry.go.tmpl",
        include_str!("../../templates/go-service/observability/telemetry.go.tmpl"),
    ),
    (
        "packaging/Dockerfile.tmpl",
        include_str!("../../templates/go-service/packaging/Dockerfile.tmpl"),
    ),
    (
        "packaging/compose.yaml.tmpl",
        include_str!("../../templates/go-service/packaging/compose.yaml.tmpl"),
    ),
    (
        "worker/cron.go.tmpl",
        include_str!("../../templates/go-service/worker/cron.go.tmpl"),
    ),
    (
        "worker/queue.go.tmpl",
        include_str!("../../templates/go-service/worker/queue.go.tmpl"),
    ),
    (
        "worker/queue_test.go.tmpl",
        include_str!("../../templates/go-service/worker/queue_test.go.tmpl"),
    ),
];

/// The catalog shipped with keel.
///
/// Bodies are `'static`, so there is nothing to cache: every lookup hands
/// out a clone of the same `Arc`.
#[derive(Debug, Clone)]
pub struct BuiltinCatalog {
    manifest: CatalogManifest,
    bodies: HashMap<TemplateId, Arc<str>>,
}

impl BuiltinCatalog {
    pub fn new() -> KeelResult<Self> {
        let manifest = CatalogManifest::parse(MANIFEST)?;
        let bodies: HashMap<TemplateId, Arc<str>> = BODIES
            .iter()
            .map(|(id, body)| (TemplateId::new(*id), Arc::from(*body)))
            .collect();

        if let Some(missing) = manifest.body_ids().find(|id| !bodies.contains_key(*id)) {
            return Err(ApplicationError::InvalidCatalog {
                reason: format!("built-in entry '{missing}' has no embedded body"),
            }
            .into());
        }

        debug!(
            catalog = %manifest.name,
            templates = bodies.len(),
            "Loaded built-in catalog"
        );
        Ok(Self { manifest, bodies })
    }

    pub fn manifest(&self) -> &CatalogManifest {
        &self.manifest
    }
}

impl TemplateCatalog for BuiltinCatalog {
    fn lookup(&self, id: &TemplateId) -> KeelResult<Arc<str>> {
        self.bodies.get(id).cloned().ok_or_else(|| {
            ApplicationError::TemplateNotFound {
                id: id.to_string(),
            }
            .into()
        })
    }

    fn group(&self, key: GroupKey) -> KeelResult<Vec<TemplateEntry>> {
        Ok(self.manifest.group(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::domain::{EntryKind, TransportKind, WorkerKind};

    #[test]
    fn every_entry_has_a_body() {
        let catalog = BuiltinCatalog::new().unwrap();
        for id in catalog.manifest().body_ids() {
            assert!(catalog.lookup(id).is_ok(), "missing body for {id}");
        }
    }

    #[test]
    fn every_body_is_referenced() {
        let catalog = BuiltinCatalog::new().unwrap();
        let referenced: Vec<_> = catalog.manifest().body_ids().map(|id| id.as_str().to_owned()).collect();
        for (id, _) in BODIES {
            assert!(referenced.iter().any(|r| r.as_str() == *id), "unreferenced body {id}");
        }
    }

    #[test]
    fn core_group_holds_the_skeleton() {
        let catalog = BuiltinCatalog::new().unwrap();
        let core = catalog.group(GroupKey::Core).unwrap();

        assert!(core.iter().any(|e| e.dest == "go.mod"));
        assert!(core.iter().any(|e| e.kind == EntryKind::Directory));
    }

    #[test]
    fn kind_groups_are_separate_from_instance_groups() {
        let catalog = BuiltinCatalog::new().unwrap();

        let shared = catalog.group(GroupKey::TransportKind(TransportKind::Http)).unwrap();
        let instance = catalog.group(GroupKey::Transport(TransportKind::Http)).unwrap();
        assert!(shared.iter().all(|e| !e.dest.contains("transport.name")));
        assert!(instance.iter().all(|e| e.dest.contains("transport.name")));
        assert_eq!(catalog.group(GroupKey::Worker(WorkerKind::Queue)).unwrap().len(), 2);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let catalog = BuiltinCatalog::new().unwrap();
        let err = catalog.lookup(&TemplateId::new("nope.tmpl")).unwrap_err();
        assert!(err.to_string().contains("nope.tmpl"));
    }
}

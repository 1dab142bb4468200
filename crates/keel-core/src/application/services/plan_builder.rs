//! Plan assembly.
//!
//! Groups are visited in a fixed order so the same manifest always yields
//! the same plan and the same conflict report:
//!
//! 1. core skeleton
//! 2. one group per transport kind in use, then one per transport instance
//! 3. one per worker, then one per driver
//! 4. one per application
//! 5. docs, packaging, observability when their flag is set

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    application::{ports::TemplateCatalog, services::path_resolver::PathResolver},
    domain::{
        ApplicationParams, CoreParams, DriverParams, EntryKind, FeatureKind, FeatureParams,
        GroupKey, Params, Plan, ProjectConfig, ProjectParams, TransportKind, TransportParams,
        WorkerParams,
    },
    error::KeelResult,
};

pub struct PlanBuilder<'a> {
    catalog: &'a dyn TemplateCatalog,
    resolver: PathResolver<'a>,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(catalog: &'a dyn TemplateCatalog, resolver: PathResolver<'a>) -> Self {
        Self { catalog, resolver }
    }

    /// Build the plan for `config`. Fails on the first path conflict,
    /// before any disk access.
    #[instrument(skip_all, fields(project = %config.project.name, schema_version = schema_version))]
    pub fn build(&self, config: &ProjectConfig, schema_version: u32) -> KeelResult<Plan> {
        config.validate()?;

        let mut plan = Plan::new();
        for (key, params) in groups(config) {
            let entries = self.catalog.group(key)?;
            debug!(group = %key, bound = %params.label(), entries = entries.len(), "Adding group");

            for entry in entries {
                let tref = entry.bind(params.clone());
                match tref.kind {
                    EntryKind::Directory => {
                        plan.add_directory(self.resolver.resolve_directory(&tref)?)?;
                    }
                    EntryKind::File => {
                        plan.add_file(self.resolver.resolve(&tref, schema_version)?)?;
                    }
                }
            }
        }

        debug!(
            files = plan.file_count(),
            directories = plan.directories().len(),
            renames = plan.renames().len(),
            "Plan built"
        );
        Ok(plan)
    }
}

/// Every (group, parameter bag) pair enabled by `config`, in plan order.
fn groups(config: &ProjectConfig) -> Vec<(GroupKey, Arc<Params>)> {
    let project = ProjectParams::from_config(config);
    let core = Arc::new(Params::Core(project.clone(), CoreParams::from_config(config)));
    let mut groups = vec![(GroupKey::Core, core.clone())];

    for kind in TransportKind::ALL {
        let instances: Vec<_> = config.transports.iter().filter(|t| t.kind == kind).collect();
        if instances.is_empty() {
            continue;
        }
        groups.push((GroupKey::TransportKind(kind), core.clone()));
        for transport in instances {
            groups.push((
                GroupKey::Transport(kind),
                Arc::new(Params::Transport(project.clone(), transport.into())),
            ));
        }
    }

    for worker in &config.workers {
        groups.push((
            GroupKey::Worker(worker.kind),
            Arc::new(Params::Worker(project.clone(), WorkerParams::from(worker))),
        ));
    }

    for driver in &config.drivers {
        groups.push((
            GroupKey::Driver(driver.kind),
            Arc::new(Params::Driver(project.clone(), DriverParams::from(driver))),
        ));
    }

    for app in &config.applications {
        groups.push((
            GroupKey::Application,
            Arc::new(Params::Application(
                project.clone(),
                ApplicationParams::resolve(app, config),
            )),
        ));
    }

    let features = [
        (config.features.docs, GroupKey::Docs, FeatureKind::Docs),
        (config.features.packaging, GroupKey::Packaging, FeatureKind::Packaging),
        (
            config.features.observability,
            GroupKey::Observability,
            FeatureKind::Observability,
        ),
    ];
    for (enabled, key, name) in features {
        if enabled {
            let params = FeatureParams {
                name,
                transports: config.transports.iter().map(TransportParams::from).collect(),
                drivers: config.drivers.iter().map(DriverParams::from).collect(),
            };
            groups.push((key, Arc::new(Params::Feature(project.clone(), params))));
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::ports::{MockTemplateCatalog, MockTemplateEngine},
        domain::{
            ApplicationConfig, DomainError, NamingConvention, RenameTable, TemplateEntry,
            TransportConfig,
        },
        error::KeelError,
    };

    fn config() -> ProjectConfig {
        let mut config = ProjectConfig::new("shop", "github.com/acme/shop");
        for (name, port) in [("public", 8080), ("admin", 9090)] {
            config.transports.push(TransportConfig {
                name: name.into(),
                kind: TransportKind::Http,
                port,
            });
        }
        config.applications.push(ApplicationConfig {
            name: "orders".into(),
            transports: vec!["public".into()],
            drivers: vec![],
        });
        config
    }

    /// Engine that substitutes `transport.name` / `application.name` only.
    fn engine() -> MockTemplateEngine {
        let mut engine = MockTemplateEngine::new();
        engine.expect_render().returning(|source, ctx| {
            let mut out = source.to_owned();
            for group in ["transport", "application"] {
                if let Some(name) = ctx[group]["name"].as_str() {
                    out = out.replace(&format!("{{{{ {group}.name }}}}"), name);
                }
            }
            Ok(out)
        });
        engine
    }

    fn catalog(app_dest: &'static str) -> MockTemplateCatalog {
        let mut catalog = MockTemplateCatalog::new();
        catalog.expect_group().returning(move |key| {
            Ok(match key {
                GroupKey::Core => vec![
                    TemplateEntry::file("core/main.go", "cmd/server/main.go.tmpl"),
                    TemplateEntry::directory("internal"),
                ],
                GroupKey::TransportKind(TransportKind::Http) => {
                    vec![TemplateEntry::file("http/router.go", "internal/transport/http/router.go")]
                }
                GroupKey::Transport(TransportKind::Http) => vec![TemplateEntry::file(
                    "http/server.go",
                    "internal/transport/http/{{ transport.name }}.go",
                )],
                GroupKey::Application => vec![TemplateEntry::file("app/service.go", app_dest)],
                _ => vec![],
            })
        });
        catalog
    }

    fn build(catalog: &MockTemplateCatalog, schema_version: u32) -> KeelResult<Plan> {
        let engine = engine();
        let naming = NamingConvention::default();
        let renames = RenameTable::default();
        let builder = PlanBuilder::new(catalog, PathResolver::new(&engine, &naming, &renames));
        builder.build(&config(), schema_version)
    }

    #[test]
    fn merges_all_enabled_groups() {
        let plan = build(&catalog("internal/app/{{ application.name }}/service.go"), 3).unwrap();

        let files: Vec<_> = plan.files().map(|f| f.final_path.to_string()).collect();
        assert_eq!(
            files,
            vec![
                "cmd/server/main_gen.go",
                "internal/app/orders/service_gen.go",
                "internal/transport/http/admin_gen.go",
                "internal/transport/http/public_gen.go",
                "internal/transport/http/router_gen.go",
            ]
        );
        assert!(plan.contains_directory(&"internal/transport/http".into()));
        assert!(plan.contains_directory(&"cmd".into()));
        assert!(plan.renames().is_empty());
    }

    #[test]
    fn old_schema_records_prior_paths() {
        let plan = build(&catalog("internal/app/{{ application.name }}/service.go"), 1).unwrap();
        let router = plan
            .file(&"internal/transport/http/router_gen.go".into())
            .unwrap();
        assert_eq!(router.prior_path.as_str(), "pkg/transport/http/router.go");
    }

    #[test]
    fn duplicate_paths_fail_the_build() {
        let err = build(&catalog("internal/transport/http/public.go"), 3).unwrap_err();
        assert!(matches!(
            err,
            KeelError::Domain(DomainError::PlanConflict { ref path, .. })
                if path == "internal/transport/http/public_gen.go"
        ));
    }

    #[test]
    fn invalid_config_never_reaches_the_catalog() {
        let mut catalog = MockTemplateCatalog::new();
        catalog.expect_group().never();
        let engine = MockTemplateEngine::new();
        let naming = NamingConvention::default();
        let renames = RenameTable::default();
        let builder = PlanBuilder::new(&catalog, PathResolver::new(&engine, &naming, &renames));

        let mut bad = config();
        bad.applications[0].transports.push("missing".into());
        assert!(builder.build(&bad, 3).is_err());
    }

    #[test]
    fn group_order_is_fixed() {
        let mut config = config();
        config.features.docs = true;
        let keys: Vec<_> = groups(&config).into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                GroupKey::Core,
                GroupKey::TransportKind(TransportKind::Http),
                GroupKey::Transport(TransportKind::Http),
                GroupKey::Transport(TransportKind::Http),
                GroupKey::Application,
                GroupKey::Docs,
            ]
        );
    }
}

//! The shipped Go service catalog, rendered for real onto disk.

use std::fs;

use keel_adapters::{BuiltinCatalog, LocalFilesystem, MiniJinjaEngine};
use keel_core::{
    application::{GenerateOptions, GenerateService},
    domain::{
        ANCHOR, ApplicationConfig, DriverConfig, DriverKind, Features, ProjectConfig,
        TransportConfig, TransportKind, WorkerConfig, WorkerKind,
    },
};
use tempfile::TempDir;

fn service() -> GenerateService {
    GenerateService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(BuiltinCatalog::new().unwrap()),
        Box::new(MiniJinjaEngine::new()),
    )
}

fn full_config() -> ProjectConfig {
    let mut config = ProjectConfig::new("payments", "github.com/acme/payments");
    config.project.description = "Takes money".into();
    config.transports = vec![
        TransportConfig {
            name: "public".into(),
            kind: TransportKind::Http,
            port: 8080,
        },
        TransportConfig {
            name: "internal-rpc".into(),
            kind: TransportKind::Grpc,
            port: 9090,
        },
    ];
    config.workers = vec![
        WorkerConfig {
            name: "nightly".into(),
            kind: WorkerKind::Cron,
            schedule: Some("0 3 * * *".into()),
            queue: None,
            concurrency: 1,
        },
        WorkerConfig {
            name: "refunds".into(),
            kind: WorkerKind::Queue,
            schedule: None,
            queue: Some("refund-requests".into()),
            concurrency: 4,
        },
    ];
    config.drivers = vec![
        DriverConfig {
            name: "ledger".into(),
            kind: DriverKind::Postgres,
            dsn_env: None,
        },
        DriverConfig {
            name: "cache".into(),
            kind: DriverKind::Redis,
            dsn_env: Some("CACHE_URL".into()),
        },
        DriverConfig {
            name: "events".into(),
            kind: DriverKind::Kafka,
            dsn_env: None,
        },
    ];
    config.applications = vec![ApplicationConfig {
        name: "checkout".into(),
        transports: vec!["public".into()],
        drivers: vec!["ledger".into()],
    }];
    config.features = Features {
        docs: true,
        packaging: true,
        observability: true,
    };
    config
}

fn read(dir: &TempDir, relative: &str) -> String {
    fs::read_to_string(dir.path().join(relative))
        .unwrap_or_else(|e| panic!("cannot read {relative}: {e}"))
}

#[test]
fn full_project_renders_and_is_stable() {
    let out = TempDir::new().unwrap();
    let config = full_config();

    let first = service()
        .generate(&config, out.path(), GenerateOptions::default())
        .unwrap();
    assert!(first.render_failures.is_empty());

    let expected = [
        "go.mod",
        "cmd/payments/main_gen.go",
        "internal/app/app_gen.go",
        "internal/transport/http/router_gen.go",
        "internal/transport/http/public_listener_gen.go",
        "internal/transport/grpc/internal_rpc_listener_gen.go",
        "api/proto/payments.proto",
        "internal/worker/nightly_gen.go",
        "internal/worker/refunds_gen.go",
        "internal/worker/refunds_gen_test.go",
        "internal/driver/ledger/postgres_gen.go",
        "migrations/ledger/0001_init.sql",
        "internal/app/checkout/handler_gen.go",
        "internal/app/checkout/service_gen_test.go",
        "docs/index.md",
        "Dockerfile",
        "deploy/prometheus.yml",
        "config/defaults.json",
        "README.md",
        ".keel-version",
    ];
    for path in expected {
        assert!(out.path().join(path).is_file(), "{path} not generated");
    }

    let go_mod = read(&out, "go.mod");
    assert!(go_mod.starts_with("// Code generated by keel."));
    assert!(go_mod.contains("module github.com/acme/payments"));
    assert!(go_mod.contains("github.com/jackc/pgx/v5"));
    assert!(go_mod.contains("google.golang.org/grpc"));

    let handler = read(&out, "internal/app/checkout/handler_gen.go");
    assert!(handler.contains(r#"httptransport.Register("public""#));

    let compose = read(&out, "deploy/compose.yaml");
    assert!(compose.contains("CACHE_URL: ${CACHE_URL}"));

    let index = read(&out, "docs/index.md");
    assert!(index.starts_with("# Index\n\n<!--"));

    assert!(!read(&out, "config/defaults.json").contains(ANCHOR));
    assert!(read(&out, "config/defaults.json").contains(r#""description": "Takes money""#));

    let second = service()
        .generate(&config, out.path(), GenerateOptions::default())
        .unwrap();
    assert!(second.is_steady_state());
    assert_eq!(second.schema_version, 3);
}

#[test]
fn minimal_project_renders() {
    let out = TempDir::new().unwrap();
    let config = ProjectConfig::new("tiny", "example.com/tiny");

    let report = service()
        .generate(&config, out.path(), GenerateOptions::default())
        .unwrap();

    assert!(report.created_files.iter().any(|p| p.as_str() == "cmd/tiny/main_gen.go"));
    assert!(!out.path().join("internal/transport").exists());
    assert!(read(&out, "config/tiny.yaml").contains("transports: {}"));
}

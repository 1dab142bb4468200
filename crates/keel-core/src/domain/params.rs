//! Parameter bags bound to template references.
//!
//! Each catalog group is rendered against exactly one [`Params`] variant.
//! Variants carry only what their own templates reference, plus the shared
//! [`ProjectParams`]. The template context is always shaped as
//! `{"project": {...}, "<group>": {...}}`.

use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::{
    config::{
        ApplicationConfig, DriverConfig, Features, ProjectConfig, TransportConfig, WorkerConfig,
    },
    text,
    value_objects::{DriverKind, TransportKind, WorkerKind},
};

/// Anything that can be turned into a template context.
pub trait RenderParams {
    /// Context key the group-specific fields live under.
    fn group(&self) -> &'static str;

    /// Full template context including the `project` section.
    fn context(&self) -> Value;
}

/// Fields every template may reference as `project.*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectParams {
    pub name: String,
    pub module: String,
    /// Last segment of `module`, e.g. `payments` for `github.com/acme/payments/v2`.
    pub short_name: String,
    pub description: String,
    pub author: String,
    pub license: String,
}

impl ProjectParams {
    pub fn from_config(config: &ProjectConfig) -> Self {
        let p = &config.project;
        Self {
            name: p.name.clone(),
            module: p.module.clone(),
            short_name: text::short_name(&p.module),
            description: p.description.clone(),
            author: p.author.clone(),
            license: p.license.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransportParams {
    pub name: String,
    pub kind: TransportKind,
    pub port: u16,
}

impl From<&TransportConfig> for TransportParams {
    fn from(t: &TransportConfig) -> Self {
        Self {
            name: t.name.clone(),
            kind: t.kind,
            port: t.port,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerParams {
    pub name: String,
    pub kind: WorkerKind,
    pub schedule: Option<String>,
    pub queue: Option<String>,
    pub concurrency: u32,
}

impl From<&WorkerConfig> for WorkerParams {
    fn from(w: &WorkerConfig) -> Self {
        Self {
            name: w.name.clone(),
            kind: w.kind,
            schedule: w.schedule.clone(),
            queue: w.queue.clone(),
            concurrency: w.concurrency,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverParams {
    pub name: String,
    pub kind: DriverKind,
    pub dsn_env: String,
}

impl From<&DriverConfig> for DriverParams {
    fn from(d: &DriverConfig) -> Self {
        Self {
            name: d.name.clone(),
            kind: d.kind,
            dsn_env: d.dsn_env().to_owned(),
        }
    }
}

/// An application with its transport and driver references resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationParams {
    pub name: String,
    pub transports: Vec<TransportParams>,
    pub drivers: Vec<DriverParams>,
}

impl ApplicationParams {
    /// Unknown references are skipped; [`ProjectConfig::validate`] rejects them earlier.
    pub fn resolve(app: &ApplicationConfig, config: &ProjectConfig) -> Self {
        Self {
            name: app.name.clone(),
            transports: app
                .transports
                .iter()
                .filter_map(|name| config.transport(name))
                .map(TransportParams::from)
                .collect(),
            drivers: app
                .drivers
                .iter()
                .filter_map(|name| config.driver(name))
                .map(DriverParams::from)
                .collect(),
        }
    }
}

/// Whole-project summary used by the skeleton and the per-kind groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoreParams {
    pub transports: Vec<TransportParams>,
    pub workers: Vec<WorkerParams>,
    pub drivers: Vec<DriverParams>,
    pub applications: Vec<String>,
    pub features: FeatureFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    pub docs: bool,
    pub packaging: bool,
    pub observability: bool,
}

impl From<Features> for FeatureFlags {
    fn from(f: Features) -> Self {
        Self {
            docs: f.docs,
            packaging: f.packaging,
            observability: f.observability,
        }
    }
}

impl CoreParams {
    pub fn from_config(config: &ProjectConfig) -> Self {
        Self {
            transports: config.transports.iter().map(TransportParams::from).collect(),
            workers: config.workers.iter().map(WorkerParams::from).collect(),
            drivers: config.drivers.iter().map(DriverParams::from).collect(),
            applications: config.applications.iter().map(|a| a.name.clone()).collect(),
            features: config.features.into(),
        }
    }
}

/// Optional feature group switched on by a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Docs,
    Packaging,
    Observability,
}

impl FeatureKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Docs => "docs",
            Self::Packaging => "packaging",
            Self::Observability => "observability",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureParams {
    pub name: FeatureKind,
    pub transports: Vec<TransportParams>,
    pub drivers: Vec<DriverParams>,
}

/// Closed set of parameter bags, one variant per group family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Params {
    Core(ProjectParams, CoreParams),
    Transport(ProjectParams, TransportParams),
    Worker(ProjectParams, WorkerParams),
    Driver(ProjectParams, DriverParams),
    Application(ProjectParams, ApplicationParams),
    Feature(ProjectParams, FeatureParams),
}

impl Params {
    pub fn project(&self) -> &ProjectParams {
        match self {
            Self::Core(p, _)
            | Self::Transport(p, _)
            | Self::Worker(p, _)
            | Self::Driver(p, _)
            | Self::Application(p, _)
            | Self::Feature(p, _) => p,
        }
    }

    /// Short label for logs and error messages, e.g. `transport:public`.
    pub fn label(&self) -> String {
        match self {
            Self::Core(..) => "core".into(),
            Self::Transport(_, t) => format!("transport:{}", t.name),
            Self::Worker(_, w) => format!("worker:{}", w.name),
            Self::Driver(_, d) => format!("driver:{}", d.name),
            Self::Application(_, a) => format!("application:{}", a.name),
            Self::Feature(_, f) => format!("feature:{}", f.name.as_str()),
        }
    }

    fn group_value(&self) -> Value {
        // Derived Serialize on plain structs with string keys cannot fail.
        let value = match self {
            Self::Core(_, c) => serde_json::to_value(c),
            Self::Transport(_, t) => serde_json::to_value(t),
            Self::Worker(_, w) => serde_json::to_value(w),
            Self::Driver(_, d) => serde_json::to_value(d),
            Self::Application(_, a) => serde_json::to_value(a),
            Self::Feature(_, f) => serde_json::to_value(f),
        };
        value.unwrap_or(Value::Null)
    }
}

impl RenderParams for Params {
    fn group(&self) -> &'static str {
        match self {
            Self::Core(..) => "core",
            Self::Transport(..) => "transport",
            Self::Worker(..) => "worker",
            Self::Driver(..) => "driver",
            Self::Application(..) => "application",
            Self::Feature(..) => "feature",
        }
    }

    fn context(&self) -> Value {
        let project = serde_json::to_value(self.project()).unwrap_or(Value::Null);
        let mut ctx = json!({ "project": project });
        ctx[self.group()] = self.group_value();
        ctx
    }
}

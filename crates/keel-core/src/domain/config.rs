//! Project configuration model.
//!
//! The shape of a generated project: which transports, workers, drivers and
//! applications exist and which optional feature groups are switched on.
//! Loading this from disk is the CLI's job; the core only receives an
//! already-parsed [`ProjectConfig`] and checks its cross-references.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{DriverKind, TransportKind, WorkerKind},
};

/// Root of a project manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub project: ProjectSection,
    #[serde(default)]
    pub transports: Vec<TransportConfig>,
    #[serde(default)]
    pub workers: Vec<WorkerConfig>,
    #[serde(default)]
    pub drivers: Vec<DriverConfig>,
    #[serde(default)]
    pub applications: Vec<ApplicationConfig>,
    #[serde(default)]
    pub features: Features,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSection {
    pub name: String,
    /// Fully-qualified module path, e.g. `github.com/acme/payments`.
    pub module: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default = "default_license")]
    pub license: String,
}

fn default_license() -> String {
    "MIT".into()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportConfig {
    pub name: String,
    pub kind: TransportKind,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub name: String,
    pub kind: WorkerKind,
    /// Cron expression; required for `cron` workers.
    #[serde(default)]
    pub schedule: Option<String>,
    /// Queue or topic name; required for `queue` workers.
    #[serde(default)]
    pub queue: Option<String>,
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,
}

fn default_concurrency() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    pub name: String,
    pub kind: DriverKind,
    /// Overrides [`DriverKind::default_dsn_env`].
    #[serde(default)]
    pub dsn_env: Option<String>,
}

impl DriverConfig {
    pub fn dsn_env(&self) -> &str {
        self.dsn_env
            .as_deref()
            .unwrap_or_else(|| self.kind.default_dsn_env())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub name: String,
    /// Names of transports this application is served on.
    #[serde(default)]
    pub transports: Vec<String>,
    /// Names of drivers this application depends on.
    #[serde(default)]
    pub drivers: Vec<String>,
}

/// Optional groups gated by flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    #[serde(default)]
    pub docs: bool,
    #[serde(default)]
    pub packaging: bool,
    #[serde(default)]
    pub observability: bool,
}

impl ProjectConfig {
    /// Minimal manifest with only the project section filled in.
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            project: ProjectSection {
                name: name.into(),
                module: module.into(),
                description: String::new(),
                author: String::new(),
                license: default_license(),
            },
            transports: Vec::new(),
            workers: Vec::new(),
            drivers: Vec::new(),
            applications: Vec::new(),
            features: Features::default(),
        }
    }

    pub fn transport(&self, name: &str) -> Option<&TransportConfig> {
        self.transports.iter().find(|t| t.name == name)
    }

    pub fn driver(&self, name: &str) -> Option<&DriverConfig> {
        self.drivers.iter().find(|d| d.name == name)
    }

    /// Check names and cross-references.
    ///
    /// Names end up in file paths and identifiers, so they are restricted to
    /// ASCII alphanumerics, `-` and `_`, starting with a letter.
    pub fn validate(&self) -> Result<(), DomainError> {
        check_name("project.name", &self.project.name)?;
        if self.project.module.trim().is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "project.module",
            });
        }

        check_unique("transports", self.transports.iter().map(|t| &t.name))?;
        check_unique("workers", self.workers.iter().map(|w| &w.name))?;
        check_unique("drivers", self.drivers.iter().map(|d| &d.name))?;
        check_unique("applications", self.applications.iter().map(|a| &a.name))?;

        for worker in &self.workers {
            match worker.kind {
                WorkerKind::Cron if worker.schedule.is_none() => {
                    return Err(DomainError::InvalidConfig(format!(
                        "cron worker '{}' needs a schedule",
                        worker.name
                    )));
                }
                WorkerKind::Queue if worker.queue.is_none() => {
                    return Err(DomainError::InvalidConfig(format!(
                        "queue worker '{}' needs a queue",
                        worker.name
                    )));
                }
                _ => {}
            }
            if worker.concurrency == 0 {
                return Err(DomainError::InvalidConfig(format!(
                    "worker '{}' concurrency must be at least 1",
                    worker.name
                )));
            }
        }

        for app in &self.applications {
            for transport in &app.transports {
                if self.transport(transport).is_none() {
                    return Err(DomainError::InvalidConfig(format!(
                        "application '{}' references unknown transport '{}'",
                        app.name, transport
                    )));
                }
            }
            for driver in &app.drivers {
                if self.driver(driver).is_none() {
                    return Err(DomainError::InvalidConfig(format!(
                        "application '{}' references unknown driver '{}'",
                        app.name, driver
                    )));
                }
            }
        }

        Ok(())
    }
}

fn check_name(field: &str, name: &str) -> Result<(), DomainError> {
    let mut chars = name.chars();
    let valid_start = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid_start && valid_rest {
        Ok(())
    } else {
        Err(DomainError::InvalidConfig(format!(
            "{field} '{name}' must start with a letter and contain only letters, digits, '-' or '_'"
        )))
    }
}

fn check_unique<'a>(
    section: &str,
    names: impl Iterator<Item = &'a String>,
) -> Result<(), DomainError> {
    let mut seen = HashSet::new();
    for name in names {
        check_name(&format!("{section}.name"), name)?;
        if !seen.insert(name.as_str()) {
            return Err(DomainError::InvalidConfig(format!(
                "duplicate name '{name}' in {section}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop() -> ProjectConfig {
        let mut config = ProjectConfig::new("shop", "github.com/acme/shop");
        config.transports.push(TransportConfig {
            name: "public".into(),
            kind: TransportKind::Http,
            port: 8080,
        });
        config.drivers.push(DriverConfig {
            name: "orders-db".into(),
            kind: DriverKind::Postgres,
            dsn_env: None,
        });
        config.applications.push(ApplicationConfig {
            name: "orders".into(),
            transports: vec!["public".into()],
            drivers: vec!["orders-db".into()],
        });
        config
    }

    #[test]
    fn valid_manifest_passes() {
        assert!(shop().validate().is_ok());
    }

    #[test]
    fn unknown_driver_reference_is_rejected() {
        let mut config = shop();
        config.applications[0].drivers.push("cache".into());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unknown driver 'cache'"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut config = shop();
        let dup = config.transports[0].clone();
        config.transports.push(dup);
        assert!(matches!(config.validate(), Err(DomainError::InvalidConfig(_))));
    }

    #[test]
    fn cron_worker_requires_schedule() {
        let mut config = shop();
        config.workers.push(WorkerConfig {
            name: "nightly".into(),
            kind: WorkerKind::Cron,
            schedule: None,
            queue: None,
            concurrency: 1,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn names_must_be_path_safe() {
        assert!(check_name("x", "orders/../etc").is_err());
        assert!(check_name("x", "9lives").is_err());
        assert!(check_name("x", "orders_v2").is_ok());
    }

    #[test]
    fn driver_dsn_env_falls_back_to_kind_default() {
        let config = shop();
        assert_eq!(config.drivers[0].dsn_env(), "DATABASE_URL");
    }
}

//! Domain value objects: TransportKind, WorkerKind, DriverKind.
//!
//! # Design
//!
//! These are pure `Copy` value types compared by value.
//! Each kind selects one catalog group during plan building; the plan
//! builder iterates [`TransportKind::ALL`] and friends so group order is
//! fixed and independent of manifest order.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here and to its `ALL` table
//! 2. Add the `as_str` arm and the `FromStr` arm here
//! 3. Add the group's entries to the built-in catalog
//! 4. Nothing else changes

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── TransportKind ────────────────────────────────────────────────────────────

/// An inbound protocol a generated service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Http,
    Grpc,
}

impl TransportKind {
    pub const ALL: [TransportKind; 2] = [Self::Http, Self::Grpc];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Grpc => "grpc",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" | "rest" => Ok(Self::Http),
            "grpc" => Ok(Self::Grpc),
            other => Err(DomainError::InvalidConfig(format!(
                "unknown transport kind: {other}"
            ))),
        }
    }
}

// ── WorkerKind ───────────────────────────────────────────────────────────────

/// A background processing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerKind {
    /// Runs on a schedule.
    Cron,
    /// Consumes a message queue.
    Queue,
}

impl WorkerKind {
    pub const ALL: [WorkerKind; 2] = [Self::Cron, Self::Queue];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cron => "cron",
            Self::Queue => "queue",
        }
    }
}

impl fmt::Display for WorkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkerKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cron" | "scheduled" => Ok(Self::Cron),
            "queue" | "consumer" => Ok(Self::Queue),
            other => Err(DomainError::InvalidConfig(format!(
                "unknown worker kind: {other}"
            ))),
        }
    }
}

// ── DriverKind ───────────────────────────────────────────────────────────────

/// An outbound dependency an application binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    Postgres,
    Redis,
    Kafka,
}

impl DriverKind {
    pub const ALL: [DriverKind; 3] = [Self::Postgres, Self::Redis, Self::Kafka];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Redis => "redis",
            Self::Kafka => "kafka",
        }
    }

    /// Environment variable conventionally holding the connection string.
    pub const fn default_dsn_env(&self) -> &'static str {
        match self {
            Self::Postgres => "DATABASE_URL",
            Self::Redis => "REDIS_URL",
            Self::Kafka => "KAFKA_BROKERS",
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriverKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "redis" => Ok(Self::Redis),
            "kafka" => Ok(Self::Kafka),
            other => Err(DomainError::InvalidConfig(format!(
                "unknown driver kind: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_aliases() {
        assert_eq!(TransportKind::from_str("REST").unwrap(), TransportKind::Http);
        assert_eq!(WorkerKind::from_str("scheduled").unwrap(), WorkerKind::Cron);
        assert_eq!(DriverKind::from_str("pg").unwrap(), DriverKind::Postgres);
        assert!(DriverKind::from_str("mongo").is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for kind in DriverKind::ALL {
            assert_eq!(DriverKind::from_str(&kind.to_string()).unwrap(), kind);
        }
    }
}

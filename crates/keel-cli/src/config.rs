//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. It
//! holds defaults for the CLI itself; the project being generated is
//! described by `keel.toml`, not here.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (applied by each command)
//! 2. `KEEL_*` environment variables, `__` between nested keys
//!    (`KEEL_GENERATE__OUTPUT=../svc`)
//! 3. The config file: `--config FILE`, else [`AppConfig::config_path`]
//! 4. Built-in defaults

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub generate: GenerateConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Project manifest read by `generate` and `plan`.
    pub manifest: PathBuf,
    /// Root of the generated tree.
    pub output: PathBuf,
    /// Template catalog directory; the built-in catalog when unset.
    pub templates: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`; `--output-format` wins.
    pub format: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also append logs to this file.
    pub file: Option<PathBuf>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("keel.toml"),
            output: PathBuf::from("."),
            templates: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load defaults, then the config file, then the environment.
    ///
    /// An explicit `config_file` must exist; the default location may not.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let file = match config_file {
            Some(path) => File::from(path.as_path()).required(true),
            None => File::from(Self::config_path()).required(false),
        };
        Self::load_from(file, "KEEL")
    }

    fn load_from(
        file: File<config::FileSourceFile, config::FileFormat>,
        env_prefix: &str,
    ) -> anyhow::Result<Self> {
        let settings = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Path to the default configuration file.
    ///
    /// Uses the platform config directory, falling back to `.keel.toml` in
    /// the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "keel", "keel")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".keel.toml"))
    }

    /// Look up a dotted key such as `generate.output`. Unset optional keys
    /// yield an empty string; unknown keys and whole sections yield `None`.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = serde_json::to_value(self).ok()?;
        let mut current = &value;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::Object(_) => None,
            serde_json::Value::Null => Some(String::new()),
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn load_file(contents: &str, prefix: &str) -> AppConfig {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).unwrap();
        AppConfig::load_from(File::from(path.as_path()).required(true), prefix).unwrap()
    }

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.generate.manifest, PathBuf::from("keel.toml"));
        assert_eq!(cfg.generate.output, PathBuf::from("."));
        assert_eq!(cfg.output.format, "auto");
        assert!(cfg.logging.file.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let cfg = load_file(
            "[generate]\noutput = \"out\"\ntemplates = \"tpl\"\n\n[output]\nno_color = true\n",
            "KEEL_TEST_FILE",
        );
        assert_eq!(cfg.generate.output, PathBuf::from("out"));
        assert_eq!(cfg.generate.templates, Some(PathBuf::from("tpl")));
        assert_eq!(cfg.generate.manifest, PathBuf::from("keel.toml"));
        assert!(cfg.output.no_color);
    }

    #[test]
    fn environment_overrides_file() {
        // SAFETY: the prefix is unique to this test.
        unsafe { std::env::set_var("KEEL_TEST_ENV_GENERATE__MANIFEST", "svc.toml") };
        let cfg = load_file("[generate]\nmanifest = \"other.toml\"\n", "KEEL_TEST_ENV");
        unsafe { std::env::remove_var("KEEL_TEST_ENV_GENERATE__MANIFEST") };

        assert_eq!(cfg.generate.manifest, PathBuf::from("svc.toml"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let missing = PathBuf::from("/definitely/not/here/keel-config.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn get_dotted_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("generate.manifest").as_deref(), Some("keel.toml"));
        assert_eq!(cfg.get("output.no_color").as_deref(), Some("false"));
        assert_eq!(cfg.get("logging.file").as_deref(), Some(""));
        assert_eq!(cfg.get("generate"), None);
        assert_eq!(cfg.get("does.not.exist"), None);
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}

//! CLI error type, exit codes and user-facing error formatting.

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use keel_core::error::{ErrorCategory as CoreCategory, KeelError};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The application config could not be loaded, read or serialized.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    #[error("Project manifest not found: {}", .path.display())]
    ManifestNotFound { path: PathBuf },

    #[error("Invalid project manifest {}: {message}", .path.display())]
    ManifestInvalid {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    #[error("Manifest already exists at {}", .path.display())]
    ManifestExists { path: PathBuf },

    #[error(transparent)]
    Core(#[from] KeelError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Operation cancelled")]
    Cancelled,
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

/// How the CLI classifies an error for colour, logging and exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserError,
    NotFound,
    Configuration,
    /// The run was refused to protect existing content.
    Safety,
    Internal,
}

impl CliError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { .. } => vec!["Use --help for usage information".into()],

            Self::ConfigError { .. } => vec![
                format!(
                    "Check the config file at {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "KEEL_* environment variables override file values, e.g. KEEL_GENERATE__OUTPUT"
                    .into(),
            ],

            Self::ManifestNotFound { path } => vec![
                format!("Create one with: keel init --manifest {}", path.display()),
                "Or point at an existing manifest with --manifest FILE".into(),
            ],

            Self::ManifestInvalid { .. } => vec![
                "The manifest needs at least [project] name and module".into(),
                "Run 'keel init' in an empty directory to see a complete example".into(),
            ],

            Self::ManifestExists { .. } => vec![
                "Use --force to overwrite it".into(),
                "Or choose another file with --manifest".into(),
            ],

            Self::Core(core) => core.suggestions(),

            Self::IoError { .. } => vec![
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],

            Self::Cancelled => vec!["No changes were made".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::ManifestExists { .. } | Self::Cancelled => {
                ErrorCategory::UserError
            }
            Self::ManifestInvalid { .. } => ErrorCategory::UserError,
            Self::ManifestNotFound { .. } => ErrorCategory::NotFound,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Safety => ErrorCategory::Safety,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit status passed to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | Internal      |  1   |
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Safety        |  5   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::Internal => 1,
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Safety => 5,
        }
    }

    pub fn format_colored(&self, verbose: bool) -> String {
        let mut out = String::new();
        let title = if self.category() == ErrorCategory::Safety {
            "Refused:"
        } else {
            "Error:"
        };
        out.push_str(&format!("\n{} {}\n\n", "\u{2717}".red().bold(), title.red().bold()));
        for line in self.to_string().lines() {
            out.push_str(&format!("  {}\n", line.red()));
        }

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                out.push_str(&format!("\n  {} {}\n", "\u{2192}".dimmed(), err.to_string().dimmed()));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                out.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose {
            out.push_str(&format!(
                "\n{} {}\n",
                "\u{2139}".blue(),
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }
        out
    }

    /// Same layout as [`Self::format_colored`], no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let title = if self.category() == ErrorCategory::Safety {
            "Refused"
        } else {
            "Error"
        };
        let mut out = format!("\n{title}: {self}\n");

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                out.push_str(&format!("  Caused by: {err}\n"));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }
        out
    }

    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Safety => tracing::warn!("Refused to protect user content: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Attach a context message when converting a foreign error at a call site.
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::application::ApplicationError;
    use keel_core::domain::DomainError;
    use std::io;

    fn core(err: impl Into<KeelError>) -> CliError {
        CliError::Core(err.into())
    }

    #[test]
    fn data_loss_exits_with_safety_code() {
        let err = core(ApplicationError::DataLossGuard {
            paths: vec!["internal/app/app_gen.go".into()],
        });
        assert_eq!(err.category(), ErrorCategory::Safety);
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn rename_collision_is_a_safety_refusal() {
        let err = core(ApplicationError::RenameCollision {
            from: "cmd/shop/main.go".into(),
            to: "cmd/shop/main_gen.go".into(),
        });
        assert_eq!(err.exit_code(), 5);
        assert!(err.format_plain(false).starts_with("\nRefused:"));
    }

    #[test]
    fn core_categories_map_to_exit_codes() {
        let invalid = core(DomainError::InvalidConfig(
            "project.name must not be empty".into(),
        ));
        assert_eq!(invalid.exit_code(), 2);

        let missing = core(ApplicationError::TemplateNotFound {
            id: "main.go.tmpl".into(),
        });
        assert_eq!(missing.exit_code(), 3);

        let corrupt = core(ApplicationError::MetadataCorrupt {
            path: ".keel-version".into(),
            content: "x".into(),
        });
        assert_eq!(corrupt.exit_code(), 4);
    }

    #[test]
    fn manifest_errors() {
        let missing = CliError::ManifestNotFound {
            path: PathBuf::from("keel.toml"),
        };
        assert_eq!(missing.exit_code(), 3);
        assert!(missing.suggestions().iter().any(|s| s.contains("keel init")));

        let exists = CliError::ManifestExists {
            path: PathBuf::from("keel.toml"),
        };
        assert_eq!(exists.exit_code(), 2);
        assert!(exists.suggestions().iter().any(|s| s.contains("--force")));
    }

    #[test]
    fn io_errors_are_internal() {
        let err = CliError::from(io::Error::other("disk on fire"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn plain_format_has_suggestions_and_hint() {
        let err = CliError::ConfigError {
            message: "bad value".into(),
            source: None,
        };
        let text = err.format_plain(false);
        assert!(text.contains("Error: Configuration error: bad value"));
        assert!(text.contains("Suggestions:"));
        assert!(text.contains("--verbose"));
        assert!(!err.format_plain(true).contains("--verbose"));
    }

    #[test]
    fn verbose_format_walks_the_source_chain() {
        let err: CliResult<()> =
            Err(io::Error::new(io::ErrorKind::NotFound, "missing")).with_cli_context(|| "reading keel.toml");
        let text = err.unwrap_err().format_plain(true);
        assert!(text.contains("I/O error: reading keel.toml"));
        assert!(text.contains("Caused by: missing"));
    }
}

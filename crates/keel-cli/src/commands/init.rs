//! `keel init`: write a starter `keel.toml`.

use std::path::Path;

use tracing::{info, instrument};

use crate::{
    cli::InitArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(args: InitArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let path = args
        .manifest
        .unwrap_or_else(|| config.generate.manifest.clone());

    if path.exists() && !args.force {
        match confirm_overwrite(&path)? {
            Some(true) => {}
            Some(false) => return Err(CliError::Cancelled),
            None => return Err(CliError::ManifestExists { path }),
        }
    }

    let name = match args.name {
        Some(name) => name,
        None => default_name()?,
    };
    let module = args
        .module
        .unwrap_or_else(|| format!("example.com/{name}"));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, starter_manifest(&name, &module))
        .with_cli_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), project = %name, "Manifest written");

    output.success(&format!("Wrote {}", path.display()))?;
    output.print("Next: edit the manifest, then run 'keel generate'")?;
    Ok(())
}

/// Name of the working directory as a valid project name, or `service`.
fn default_name() -> CliResult<String> {
    let cwd = std::env::current_dir()
        .with_cli_context(|| "Failed to read the current directory")?;
    Ok(cwd
        .file_name()
        .and_then(|n| n.to_str())
        .map(sanitize)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "service".into()))
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' | '_' => c,
            'A'..='Z' => c.to_ascii_lowercase(),
            _ => '-',
        })
        .collect::<String>()
        .trim_start_matches(|c: char| !c.is_ascii_alphabetic())
        .trim_end_matches('-')
        .to_owned()
}

/// Ask before overwriting. `None` when there is no terminal to ask on.
#[cfg(feature = "interactive")]
fn confirm_overwrite(path: &Path) -> CliResult<Option<bool>> {
    use std::io::IsTerminal;

    if !std::io::stdin().is_terminal() {
        return Ok(None);
    }
    dialoguer::Confirm::new()
        .with_prompt(format!("{} exists. Overwrite?", path.display()))
        .default(false)
        .interact()
        .map(Some)
        .map_err(|e| CliError::IoError {
            message: "Failed to read confirmation".into(),
            source: std::io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm_overwrite(_path: &Path) -> CliResult<Option<bool>> {
    Ok(None)
}

fn starter_manifest(name: &str, module: &str) -> String {
    let quote = |s: &str| toml::Value::String(s.to_owned()).to_string();
    format!(
        r#"# keel project manifest. Run `keel generate` after editing.

[project]
name = {name}
module = {module}
description = ""
license = "MIT"

[[transports]]
name = "public"
kind = "http"
port = 8080

# [[workers]]
# name = "nightly"
# kind = "cron"
# schedule = "0 3 * * *"

# [[drivers]]
# name = "primary"
# kind = "postgres"

[[applications]]
name = "api"
transports = ["public"]

[features]
docs = true
packaging = true
observability = false
"#,
        name = quote(name),
        module = quote(module),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::domain::ProjectConfig;

    #[test]
    fn starter_manifest_is_valid() {
        let text = starter_manifest("shop", "example.com/shop");
        let config: ProjectConfig = toml::from_str(&text).unwrap();

        config.validate().unwrap();
        assert_eq!(config.project.name, "shop");
        assert_eq!(config.project.module, "example.com/shop");
        assert_eq!(config.applications[0].transports, vec!["public".to_owned()]);
        assert!(config.features.docs);
    }

    #[test]
    fn starter_manifest_quotes_values() {
        let text = starter_manifest("a\"b", "m");
        let config: ProjectConfig = toml::from_str(&text).unwrap();
        assert_eq!(config.project.name, "a\"b");
    }

    #[test]
    fn directory_names_are_sanitized() {
        assert_eq!(sanitize("My Service"), "my-service");
        assert_eq!(sanitize("--x--"), "x");
        assert_eq!(sanitize("payments_v2"), "payments_v2");
        assert_eq!(sanitize(".tmp9Ab"), "tmp9ab");
        assert_eq!(sanitize("2024"), "");
    }
}

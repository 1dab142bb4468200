//! CLI argument definitions using the clap derive API.
//!
//! Only argument names, help text and value enums live here. Commands read
//! these structs; they never parse `std::env::args` themselves.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name     = "keel",
    bin_name = "keel",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Regeneration-safe project generator",
    long_about = "keel renders a service skeleton from a keel.toml manifest and can be \
                  re-run over the same tree. Code you add below a generated file's \
                  end marker is kept; files keel did not generate are never touched.",
    after_help = "EXAMPLES:\n\
        \x20 keel init --name payments --module github.com/acme/payments\n\
        \x20 keel generate --output ./payments\n\
        \x20 keel generate --dry-run --output-format json\n\
        \x20 keel completions bash > /usr/share/bash-completion/completions/keel",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate or refresh a project tree from a manifest.
    #[command(
        visible_alias = "gen",
        after_help = "EXAMPLES:\n\
            \x20 keel generate\n\
            \x20 keel generate -m services/payments.toml -o ../payments\n\
            \x20 keel generate --templates ./my-catalog --dry-run"
    )]
    Generate(GenerateArgs),

    /// Print the resolved plan without touching the output tree.
    #[command(after_help = "EXAMPLES:\n\
            \x20 keel plan\n\
            \x20 keel plan -o ../payments --output-format json")]
    Plan(PlanArgs),

    /// Write a starter keel.toml.
    #[command(after_help = "EXAMPLES:\n\
            \x20 keel init\n\
            \x20 keel init --name shop --module example.com/shop --force")]
    Init(InitArgs),

    /// List the groups and entries of a template catalog.
    #[command(
        visible_alias = "ls",
        after_help = "EXAMPLES:\n\
            \x20 keel catalog\n\
            \x20 keel catalog --templates ./my-catalog --group core"
    )]
    Catalog(CatalogArgs),

    /// Inspect the application configuration.
    #[command(
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 keel config get generate.output\n\
            \x20 keel config list\n\
            \x20 keel config path"
    )]
    Config(ConfigCommands),

    /// Generate shell completion scripts.
    #[command(after_help = "EXAMPLES:\n\
            \x20 keel completions bash > ~/.local/share/bash-completion/completions/keel\n\
            \x20 keel completions zsh  > ~/.zfunc/_keel\n\
            \x20 keel completions fish > ~/.config/fish/completions/keel.fish")]
    Completions(CompletionsArgs),
}

/// Where the manifest, output tree and templates come from. Unset values
/// fall back to the `generate.*` keys of the application config.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Project manifest.
    #[arg(short = 'm', long = "manifest", value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Root of the generated tree.
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Template catalog directory (must contain catalog.toml). Defaults to
    /// the catalog built into keel.
    #[arg(short = 't', long = "templates", value_name = "DIR")]
    pub templates: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Report what would change; write nothing. Template errors are listed
    /// instead of aborting the run.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Project name written into the manifest.
    #[arg(long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// Module path written into the manifest.
    #[arg(long = "module", value_name = "MODULE")]
    pub module: Option<String>,

    /// Manifest to create.
    #[arg(short = 'm', long = "manifest", value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Overwrite an existing manifest without asking.
    #[arg(short = 'f', long = "force")]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Template catalog directory. Defaults to the built-in catalog.
    #[arg(short = 't', long = "templates", value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Only show one group, e.g. `core` or `transport.http`.
    #[arg(short = 'g', long = "group", value_name = "GROUP")]
    pub group: Option<String>,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one value, e.g. `generate.manifest`.
    Get { key: String },
    /// Print the effective configuration as TOML.
    List,
    /// Print the path of the default configuration file.
    Path,
}

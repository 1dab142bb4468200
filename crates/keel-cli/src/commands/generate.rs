//! `keel generate`: render the manifest into the output tree.

use tracing::{info, instrument};

use keel_core::application::{GenerateOptions, GenerationReport};

use crate::{
    cli::GenerateArgs,
    commands::{Catalog, Sources, build_service, load_manifest},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(dry_run = args.dry_run))]
pub fn execute(args: GenerateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let sources = Sources::resolve(args.source, &config);
    let project = load_manifest(&sources.manifest)?;
    let catalog = Catalog::open(sources.templates.as_deref())?;
    info!(
        project = %project.project.name,
        output = %sources.output.display(),
        catalog = %catalog.describe(),
        "Starting generation"
    );

    let service = build_service(catalog);
    let spinner = output.spinner(&format!("Generating {}", project.project.name));
    let result = service.generate(
        &project,
        &sources.output,
        GenerateOptions {
            dry_run: args.dry_run,
        },
    );
    spinner.finish_and_clear();
    let report = result?;

    if output.is_json() {
        output.json(&report)?;
    } else {
        print_report(&report, &output)?;
    }
    Ok(())
}

fn print_report(report: &GenerationReport, out: &OutputManager) -> CliResult<()> {
    if report.dry_run {
        out.header("Dry run: nothing was written")?;
    }

    section(out, "Created", report.created_directories.iter().map(|d| format!("{d}/")))?;
    section(out, "Created", report.created_files.iter().map(ToString::to_string))?;
    section(
        out,
        "Moved",
        report.renamed.iter().map(|r| format!("{} -> {}", r.from, r.to)),
    )?;
    section(
        out,
        "Kept user code in",
        report
            .preserved
            .iter()
            .map(|p| format!("{} ({} bytes)", p.path, p.bytes)),
    )?;

    for path in &report.suspicious_obsolete {
        out.warning(&format!(
            "{path} is no longer generated and has no user code; delete it if unused"
        ))?;
    }
    for failure in &report.render_failures {
        out.warning(&format!("{}: {}", failure.path, failure.message))?;
    }

    let summary = format!(
        "{} created, {} refreshed, {} moved, {} left alone",
        report.created_files.len(),
        report.rewritten_files.len(),
        report.renamed.len(),
        report.foreign.len() + report.ignored.len(),
    );
    if !report.render_failures.is_empty() {
        out.warning(&format!(
            "{summary}; {} template(s) failed to render",
            report.render_failures.len()
        ))?;
    } else if report.is_steady_state() {
        out.success(&format!("Up to date: {summary}"))?;
    } else {
        out.success(&summary)?;
    }
    Ok(())
}

fn section(
    out: &OutputManager,
    title: &str,
    lines: impl ExactSizeIterator<Item = String>,
) -> CliResult<()> {
    if lines.len() == 0 {
        return Ok(());
    }
    out.header(&format!("{title}:"))?;
    for line in lines {
        out.item(&line, None)?;
    }
    Ok(())
}

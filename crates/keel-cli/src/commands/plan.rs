//! `keel plan`: show what `generate` would lay down, without reconciling.

use serde::Serialize;
use tracing::instrument;

use keel_core::domain::Plan;

use crate::{
    cli::PlanArgs,
    commands::{Catalog, Sources, build_service, load_manifest},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[derive(Serialize)]
struct PlanDocument<'a> {
    schema_version: u32,
    plan: &'a Plan,
}

#[instrument(skip_all)]
pub fn execute(args: PlanArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let sources = Sources::resolve(args.source, &config);
    let project = load_manifest(&sources.manifest)?;
    let service = build_service(Catalog::open(sources.templates.as_deref())?);

    let schema_version = service.schema_version(&sources.output)?;
    let plan = service.plan(&project, &sources.output)?;

    if output.is_json() {
        output.json(&PlanDocument {
            schema_version,
            plan: &plan,
        })?;
        return Ok(());
    }

    output.header(&format!(
        "{} ({} files, tree at schema v{schema_version})",
        project.project.name,
        plan.file_count()
    ))?;
    for dir in plan.directories() {
        output.item(&format!("{dir}/"), None)?;
    }
    for file in plan.files() {
        let prior = file
            .is_renamed()
            .then(|| format!("was {}", file.prior_path));
        output.item(file.final_path.as_str(), prior.as_deref())?;
    }
    Ok(())
}

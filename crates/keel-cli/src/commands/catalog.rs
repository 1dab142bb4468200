//! `keel catalog`: list template groups and their entries.

use std::str::FromStr;

use serde::Serialize;
use tracing::instrument;

use keel_core::domain::{EntryKind, GroupKey, TemplateEntry};

use crate::{
    cli::CatalogArgs,
    commands::Catalog,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[derive(Serialize)]
struct GroupListing<'a> {
    group: String,
    entries: &'a [TemplateEntry],
}

#[instrument(skip_all)]
pub fn execute(args: CatalogArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let templates = args.templates.or(config.generate.templates);
    let catalog = Catalog::open(templates.as_deref())?;
    let filter = args
        .group
        .as_deref()
        .map(|g| {
            GroupKey::from_str(g).map_err(|e| CliError::InvalidInput {
                message: e.to_string(),
            })
        })
        .transpose()?;

    let listings: Vec<GroupListing<'_>> = catalog
        .manifest()
        .groups()
        .into_iter()
        .filter(|(key, _)| filter.is_none_or(|f| f == *key))
        .map(|(key, entries)| GroupListing {
            group: key.to_string(),
            entries,
        })
        .collect();

    if output.is_json() {
        output.json(&listings)?;
        return Ok(());
    }

    output.header(&format!("Catalog: {}", catalog.describe()))?;
    if listings.is_empty() {
        output.info("No entries")?;
    }
    for listing in &listings {
        output.print("")?;
        output.header(&listing.group)?;
        for entry in listing.entries {
            match entry.kind {
                EntryKind::Directory => output.item(&format!("{}/", entry.dest), None)?,
                EntryKind::File => output.item(&entry.dest, Some(entry.catalog_id.as_str()))?,
            }
        }
    }
    Ok(())
}

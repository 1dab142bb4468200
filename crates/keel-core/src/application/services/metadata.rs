//! The one-line schema version record at the output root.

use std::path::Path;

use tracing::debug;

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{INITIAL_SCHEMA_VERSION, METADATA_FILE},
    error::KeelResult,
};

/// Schema version recorded under `root`; [`INITIAL_SCHEMA_VERSION`] when
/// there is no record.
pub fn read_schema_version(filesystem: &dyn Filesystem, root: &Path) -> KeelResult<u32> {
    let path = root.join(METADATA_FILE);
    if !filesystem.exists(&path) {
        debug!("No schema metadata, assuming version {INITIAL_SCHEMA_VERSION}");
        return Ok(INITIAL_SCHEMA_VERSION);
    }

    let bytes = filesystem.read_file(&path)?;
    let content = String::from_utf8_lossy(&bytes);
    content
        .trim()
        .parse::<u32>()
        .map_err(|_| {
            ApplicationError::MetadataCorrupt {
                path: path.clone(),
                content: content.trim().to_owned(),
            }
            .into()
        })
}

pub fn write_schema_version(filesystem: &dyn Filesystem, root: &Path, version: u32) -> KeelResult<()> {
    filesystem.write_file(&root.join(METADATA_FILE), format!("{version}\n").as_bytes())
}

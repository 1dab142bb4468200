//! Destination path resolution.
//!
//! `dest` template → evaluated path → naming convention → rename rules.

use tracing::trace;

use crate::{
    application::{ApplicationError, ports::TemplateEngine},
    domain::{
        NamingConvention, RelativePath, RenameTable, RenderParams, ResolvedFile, TemplateRef,
    },
    error::KeelResult,
};

pub struct PathResolver<'a> {
    engine: &'a dyn TemplateEngine,
    naming: &'a NamingConvention,
    renames: &'a RenameTable,
}

impl<'a> PathResolver<'a> {
    pub fn new(
        engine: &'a dyn TemplateEngine,
        naming: &'a NamingConvention,
        renames: &'a RenameTable,
    ) -> Self {
        Self {
            engine,
            naming,
            renames,
        }
    }

    /// Resolve a file reference to its final path and the path it had
    /// under `schema_version`.
    pub fn resolve(&self, tref: &TemplateRef, schema_version: u32) -> KeelResult<ResolvedFile> {
        let evaluated = self.evaluate(tref)?;
        let final_path = self.naming.apply(&evaluated)?;
        let prior_path = self.renames.prior_path(&final_path, schema_version);

        trace!(
            catalog_id = %tref.catalog_id,
            final_path = %final_path,
            prior_path = %prior_path,
            "Resolved file path"
        );

        Ok(ResolvedFile {
            final_path,
            prior_path,
            catalog_id: tref.catalog_id.clone(),
            params: tref.params.clone(),
        })
    }

    /// Directories are evaluated only; naming and renames apply to files.
    pub fn resolve_directory(&self, tref: &TemplateRef) -> KeelResult<RelativePath> {
        self.evaluate(tref)
    }

    fn evaluate(&self, tref: &TemplateRef) -> KeelResult<RelativePath> {
        let source = tref.dest_path_template.as_str();
        let path_error = |reason: String| ApplicationError::PathEvaluation {
            template: source.to_owned(),
            catalog_id: tref.catalog_id.to_string(),
            reason,
        };

        let rendered = if is_literal(source) {
            source.to_owned()
        } else {
            self.engine
                .render(source, &tref.params.context())
                .map_err(|e| path_error(e.message))?
        };

        let trimmed = rendered.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(path_error("evaluates to an empty path".into()).into());
        }
        RelativePath::try_new(trimmed)
            .map_err(|e| path_error(e.to_string()).into())
    }
}

fn is_literal(source: &str) -> bool {
    !source.contains("{{") && !source.contains("{%")
}

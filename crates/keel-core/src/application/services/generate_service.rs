//! Generate Service - main application orchestrator.
//!
//! This service coordinates the entire generation workflow:
//! 1. Read the schema version recorded in the output tree
//! 2. Build the plan from the manifest and the catalog
//! 3. Reconcile the plan against the existing tree
//! 4. Render every writable file, re-appending preserved user content
//! 5. Commit to disk and record the schema version
//!
//! Steps 1-4 never write. Every safety refusal happens before step 5.

use std::path::Path;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    application::{
        ports::{Filesystem, TemplateCatalog, TemplateEngine},
        services::{
            committer::{CommitSummary, Committer},
            content_renderer::ContentRenderer,
            metadata,
            path_resolver::PathResolver,
            plan_builder::PlanBuilder,
            reconciler::{Reconciliation, TreeReconciler},
        },
    },
    domain::{
        CURRENT_SCHEMA_VERSION, IgnoreList, NamingConvention, Plan, ProjectConfig, RelativePath,
        RenameTable, ResolvedFile,
    },
    error::KeelResult,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Plan, reconcile and render, but write nothing.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameEntry {
    pub from: RelativePath,
    pub to: RelativePath,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreservedContent {
    pub path: RelativePath,
    pub bytes: usize,
}

/// A file whose body failed to render during a dry run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderFailure {
    pub path: RelativePath,
    pub message: String,
}

/// Everything a run did, or in dry-run mode would do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub dry_run: bool,
    /// Version found in the tree before this run.
    pub schema_version: u32,
    pub created_directories: Vec<RelativePath>,
    pub created_files: Vec<RelativePath>,
    /// Existing files whose generated region is refreshed.
    pub rewritten_files: Vec<RelativePath>,
    pub renamed: Vec<RenameEntry>,
    pub ignored: Vec<RelativePath>,
    pub foreign: Vec<RelativePath>,
    pub preserved: Vec<PreservedContent>,
    pub suspicious_obsolete: Vec<RelativePath>,
    pub render_failures: Vec<RenderFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<CommitSummary>,
}

impl GenerationReport {
    fn from_reconciliation(
        rec: &Reconciliation,
        written: &[&ResolvedFile],
        schema_version: u32,
        dry_run: bool,
    ) -> Self {
        let (created_files, rewritten_files): (Vec<_>, Vec<_>) = written
            .iter()
            .map(|f| f.final_path.clone())
            .partition(|path| rec.new_files.contains(path));

        Self {
            dry_run,
            schema_version,
            created_directories: rec.new_directories.iter().cloned().collect(),
            created_files,
            rewritten_files,
            renamed: rec
                .renamed
                .iter()
                .map(|(from, to)| RenameEntry {
                    from: from.clone(),
                    to: to.clone(),
                })
                .collect(),
            ignored: rec.ignored.iter().cloned().collect(),
            foreign: rec.foreign.iter().cloned().collect(),
            preserved: rec
                .user_content
                .iter()
                .map(|(path, bytes)| PreservedContent {
                    path: path.clone(),
                    bytes: bytes.len(),
                })
                .collect(),
            suspicious_obsolete: rec.suspicious_obsolete.iter().cloned().collect(),
            render_failures: Vec::new(),
            commit: None,
        }
    }

    /// Nothing to create and nothing to move.
    pub fn is_steady_state(&self) -> bool {
        self.created_directories.is_empty() && self.created_files.is_empty() && self.renamed.is_empty()
    }
}

/// Main generation service.
///
/// Holds the driven ports plus the path rules of this generator.
pub struct GenerateService {
    filesystem: Box<dyn Filesystem>,
    catalog: Box<dyn TemplateCatalog>,
    engine: Box<dyn TemplateEngine>,
    naming: NamingConvention,
    renames: RenameTable,
    ignore: IgnoreList,
}

impl GenerateService {
    /// Create a new generate service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use keel_core::application::GenerateService;
    ///
    /// let service = GenerateService::new(
    ///     filesystem, // impl Filesystem
    ///     catalog,    // impl TemplateCatalog
    ///     engine,     // impl TemplateEngine
    /// );
    /// ```
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        catalog: Box<dyn TemplateCatalog>,
        engine: Box<dyn TemplateEngine>,
    ) -> Self {
        let naming = NamingConvention::default();
        Self {
            filesystem,
            catalog,
            engine,
            renames: RenameTable::builtin(naming.clone()),
            naming,
            ignore: IgnoreList::default(),
        }
    }

    /// Replace the naming convention; the built-in rename table follows it.
    pub fn with_naming(mut self, naming: NamingConvention) -> Self {
        self.renames = RenameTable::builtin(naming.clone());
        self.naming = naming;
        self
    }

    pub fn with_rename_table(mut self, renames: RenameTable) -> Self {
        self.renames = renames;
        self
    }

    pub fn with_ignore_list(mut self, ignore: IgnoreList) -> Self {
        self.ignore = ignore;
        self
    }

    /// Schema version recorded under `root`.
    pub fn schema_version(&self, root: &Path) -> KeelResult<u32> {
        metadata::read_schema_version(self.filesystem.as_ref(), root)
    }

    /// The plan alone, resolved against the schema version in `root`.
    #[instrument(skip_all, fields(project = %config.project.name, root = %root.display()))]
    pub fn plan(&self, config: &ProjectConfig, root: &Path) -> KeelResult<Plan> {
        let schema_version = self.schema_version(root)?;
        self.build_plan(config, schema_version)
    }

    /// Run the full pipeline.
    #[instrument(
        skip_all,
        fields(
            project = %config.project.name,
            root = %root.display(),
            dry_run = options.dry_run
        )
    )]
    pub fn generate(
        &self,
        config: &ProjectConfig,
        root: &Path,
        options: GenerateOptions,
    ) -> KeelResult<GenerationReport> {
        info!("Generating project");

        let schema_version = self.schema_version(root)?;
        let plan = self.build_plan(config, schema_version)?;
        let reconciliation =
            TreeReconciler::new(self.filesystem.as_ref(), &self.ignore).reconcile(&plan, root)?;

        let writable: Vec<&ResolvedFile> = plan
            .files()
            .filter(|f| reconciliation.is_writable(&f.final_path))
            .collect();
        let renderer = ContentRenderer::new(self.catalog.as_ref(), self.engine.as_ref());
        let results = renderer.render_all(&writable, &reconciliation.user_content);

        let mut report = GenerationReport::from_reconciliation(
            &reconciliation,
            &writable,
            schema_version,
            options.dry_run,
        );

        let mut rendered = Vec::with_capacity(results.len());
        for (path, result) in results {
            match result {
                Ok(body) => rendered.push((path, body)),
                Err(e) if options.dry_run => {
                    warn!(%path, error = %e, "Render failed");
                    report.render_failures.push(RenderFailure {
                        path,
                        message: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        if options.dry_run {
            info!(
                files = rendered.len(),
                failures = report.render_failures.len(),
                "Dry run complete, nothing written"
            );
            return Ok(report);
        }

        let summary = Committer::new(self.filesystem.as_ref()).commit(root, &reconciliation, &rendered)?;
        // A tree written by a newer keel keeps its recorded version.
        let recorded = schema_version.max(CURRENT_SCHEMA_VERSION);
        metadata::write_schema_version(self.filesystem.as_ref(), root, recorded)?;
        report.commit = Some(summary);

        info!("Generation completed successfully");
        Ok(report)
    }

    fn build_plan(&self, config: &ProjectConfig, schema_version: u32) -> KeelResult<Plan> {
        let resolver = PathResolver::new(self.engine.as_ref(), &self.naming, &self.renames);
        PlanBuilder::new(self.catalog.as_ref(), resolver).build(config, schema_version)
    }
}

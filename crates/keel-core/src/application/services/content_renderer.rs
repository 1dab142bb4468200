//! Disclaimer-bounded rendering of file bodies.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{TemplateCatalog, TemplateEngine},
    },
    domain::{Disclaimer, RelativePath, RenderParams, ResolvedFile},
    error::KeelResult,
};

/// Lines shown on each side of a faulting template line.
const CONTEXT_RADIUS: usize = 3;

pub struct ContentRenderer<'a> {
    catalog: &'a dyn TemplateCatalog,
    engine: &'a dyn TemplateEngine,
}

impl<'a> ContentRenderer<'a> {
    pub fn new(catalog: &'a dyn TemplateCatalog, engine: &'a dyn TemplateEngine) -> Self {
        Self { catalog, engine }
    }

    /// Render one file: disclaimers around the body, evaluated against the
    /// file's parameters, followed by `user_content` verbatim.
    pub fn render(&self, file: &ResolvedFile, user_content: &[u8]) -> KeelResult<Vec<u8>> {
        let body = self.catalog.lookup(&file.catalog_id)?;
        let disclaimer = Disclaimer::for_path(&file.final_path);
        let composed = disclaimer.wrap(&body, &file.final_path);

        let rendered = self
            .engine
            .render(&composed, &file.params.context())
            .map_err(|e| ApplicationError::TemplateEvaluation {
                path: file.final_path.as_path().to_path_buf(),
                catalog_id: file.catalog_id.to_string(),
                reason: e.message,
                line: e.line,
                context: e
                    .line
                    .map(|line| context_window(&composed, line, CONTEXT_RADIUS))
                    .unwrap_or_default(),
            })?;

        let mut out = rendered.into_bytes();
        if !disclaimer.syntax().is_exempt() {
            out.extend_from_slice(user_content);
        }
        Ok(out)
    }

    /// Render many files in parallel. Results come back in input order.
    #[instrument(skip_all, fields(files = files.len()))]
    pub fn render_all(
        &self,
        files: &[&ResolvedFile],
        user_content: &BTreeMap<RelativePath, Vec<u8>>,
    ) -> Vec<(RelativePath, KeelResult<Vec<u8>>)> {
        let results: Vec<_> = files
            .par_iter()
            .map(|file| {
                let preserved = user_content
                    .get(&file.final_path)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                (file.final_path.clone(), self.render(file, preserved))
            })
            .collect();
        debug!(
            failed = results.iter().filter(|(_, r)| r.is_err()).count(),
            "Rendered files"
        );
        results
    }
}

/// Up to `radius` lines either side of 1-based `line`, numbered, with the
/// faulting line marked `>>`.
pub fn context_window(source: &str, line: usize, radius: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    if line == 0 || line > lines.len() {
        return String::new();
    }
    let first = line.saturating_sub(radius).max(1);
    let last = (line + radius).min(lines.len());

    (first..=last)
        .map(|n| {
            let marker = if n == line { ">>" } else { "  " };
            format!("{marker} {n:>4} | {}", lines[n - 1])
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        application::ports::{EngineError, MockTemplateCatalog, MockTemplateEngine},
        domain::{ANCHOR, CoreParams, Params, ProjectConfig, ProjectParams, TemplateId},
        error::KeelError,
    };

    fn file(path: &str) -> ResolvedFile {
        let config = ProjectConfig::new("shop", "github.com/acme/shop");
        ResolvedFile {
            final_path: RelativePath::new(path),
            prior_path: RelativePath::new(path),
            catalog_id: TemplateId::new("body"),
            params: Arc::new(Params::Core(
                ProjectParams::from_config(&config),
                CoreParams::from_config(&config),
            )),
        }
    }

    fn catalog(body: &'static str) -> MockTemplateCatalog {
        let mut catalog = MockTemplateCatalog::new();
        catalog
            .expect_lookup()
            .returning(move |_| Ok(Arc::from(body)));
        catalog
    }

    fn echo_engine() -> MockTemplateEngine {
        let mut engine = MockTemplateEngine::new();
        engine.expect_render().returning(|source, _| Ok(source.to_owned()));
        engine
    }

    #[test]
    fn wraps_body_and_appends_user_content() {
        let catalog = catalog("package main");
        let engine = echo_engine();
        let renderer = ContentRenderer::new(&catalog, &engine);

        let out = renderer.render(&file("main_gen.go"), b"\nfunc X(){}\n").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("// Code generated by keel"));
        assert!(text.contains("package main\n"));
        assert!(text.contains(ANCHOR));
        assert!(text.ends_with(&format!("{ANCHOR}\n\nfunc X(){{}}\n")));
    }

    #[test]
    fn exempt_files_are_body_only() {
        let catalog = catalog("{\"name\": \"shop\"}");
        let engine = echo_engine();
        let renderer = ContentRenderer::new(&catalog, &engine);

        let out = renderer.render(&file("config/app.json"), b"ignored").unwrap();
        assert_eq!(out, b"{\"name\": \"shop\"}");
    }

    #[test]
    fn failure_carries_context_from_composed_template() {
        let catalog = catalog("package main\n\nvar x = {{ nope }}");
        let mut engine = MockTemplateEngine::new();
        // Two top disclaimer lines precede the body.
        engine
            .expect_render()
            .returning(|_, _| Err(EngineError::new("undefined value", Some(5))));
        let renderer = ContentRenderer::new(&catalog, &engine);

        let err = renderer.render(&file("main_gen.go"), b"").unwrap_err();
        match err {
            KeelError::Application(ApplicationError::TemplateEvaluation {
                line, context, path, ..
            }) => {
                assert_eq!(line, Some(5));
                assert_eq!(path, std::path::PathBuf::from("main_gen.go"));
                assert!(context.contains(">>    5 | var x = {{ nope }}"));
                assert!(context.contains("      2 | // Regenerating"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_template_is_not_found() {
        let mut catalog = MockTemplateCatalog::new();
        catalog.expect_lookup().returning(|id| {
            Err(ApplicationError::TemplateNotFound {
                id: id.to_string(),
            }
            .into())
        });
        let engine = MockTemplateEngine::new();
        let renderer = ContentRenderer::new(&catalog, &engine);

        assert!(renderer.render(&file("main_gen.go"), b"").is_err());
    }

    #[test]
    fn render_all_keeps_input_order() {
        let catalog = catalog("x");
        let engine = echo_engine();
        let renderer = ContentRenderer::new(&catalog, &engine);
        let a = file("a.go");
        let b = file("b.go");
        let mut preserved = BTreeMap::new();
        preserved.insert(RelativePath::new("b.go"), b"tail".to_vec());

        let results = renderer.render_all(&[&b, &a], &preserved);
        assert_eq!(results[0].0.as_str(), "b.go");
        assert!(results[0].1.as_ref().unwrap().ends_with(b"tail"));
        assert!(!results[1].1.as_ref().unwrap().ends_with(b"tail"));
    }

    #[test]
    fn context_window_clamps_at_edges() {
        let source = "a\nb\nc";
        assert_eq!(context_window(source, 1, 3), ">>    1 | a\n      2 | b\n      3 | c");
        assert_eq!(context_window(source, 9, 3), "");
    }
}

//! Template engine backed by minijinja.

use std::sync::LazyLock;

use minijinja::{Environment, Error, UndefinedBehavior};
use regex::Regex;
use serde_json::Value;

use keel_core::{
    application::ports::{EngineError, TemplateEngine},
    domain::text,
};

/// `line N` as found in engine messages that carry no structured location.
static LINE_IN_MESSAGE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\bline (\d+)\b").ok());

/// Shared minijinja environment with the helper library installed.
///
/// Undefined variables are errors and a trailing newline in the source is
/// kept, so the rendered body ends exactly as the template does.
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        register_helpers(&mut env);
        Self { env }
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MiniJinjaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiniJinjaEngine").finish_non_exhaustive()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render(&self, source: &str, context: &Value) -> Result<String, EngineError> {
        self.env
            .render_str(source, context)
            .map_err(|e| engine_error(&e))
    }
}

/// Registers each helper under one name, usable both as `{{ x | name }}`
/// and `{{ name(x) }}`.
fn register_helpers(env: &mut Environment<'static>) {
    macro_rules! string_helper {
        ($name:literal, $f:path) => {
            env.add_filter($name, |s: String| -> String { $f(&s) });
            env.add_function($name, |s: String| -> String { $f(&s) });
        };
    }

    string_helper!("lower", text::lower);
    string_helper!("upper", text::upper);
    string_helper!("snake", text::dash_to_underscore);
    string_helper!("title", text::capitalize_words);
    string_helper!("pascal", text::pascal);
    string_helper!("json_escape", text::json_escape);
    string_helper!("short_name", text::short_name);

    env.add_filter("add", |a: i64, b: i64| -> i64 { text::add(a, b) });
    env.add_function("add", |a: i64, b: i64| -> i64 { text::add(a, b) });
}

fn engine_error(err: &Error) -> EngineError {
    let message = match err.detail() {
        Some(detail) => format!("{}: {}", err.kind(), detail),
        None => err.kind().to_string(),
    };
    let line = err.line().or_else(|| line_from_message(&err.to_string()));
    EngineError::new(message, line)
}

fn line_from_message(message: &str) -> Option<usize> {
    LINE_IN_MESSAGE
        .as_ref()?
        .captures(message)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(source: &str, ctx: Value) -> Result<String, EngineError> {
        MiniJinjaEngine::new().render(source, &ctx)
    }

    #[test]
    fn helpers_work_as_filters_and_functions() {
        let ctx = json!({ "name": "order-events" });

        assert_eq!(render("{{ name | snake }}", ctx.clone()).unwrap(), "order_events");
        assert_eq!(render("{{ pascal(name) }}", ctx.clone()).unwrap(), "OrderEvents");
        assert_eq!(render("{{ name | upper }}", ctx.clone()).unwrap(), "ORDER-EVENTS");
        assert_eq!(render("{{ add(2, 3) }} {{ 2 | add(5) }}", ctx).unwrap(), "5 7");
    }

    #[test]
    fn trailing_newline_is_kept() {
        assert_eq!(render("x\n", json!({})).unwrap(), "x\n");
    }

    #[test]
    fn undefined_variables_fail_with_a_line() {
        let err = render("a\nb\n{{ missing.field }}\n", json!({})).unwrap_err();

        assert_eq!(err.line, Some(3));
        assert!(err.message.contains("undefined"));
    }

    #[test]
    fn syntax_errors_report_their_line() {
        let err = render("ok\n{% if %}\n", json!({})).unwrap_err();
        assert_eq!(err.line, Some(2));
    }

    #[test]
    fn line_is_parsed_from_plain_messages() {
        assert_eq!(line_from_message("unexpected token on line 12"), Some(12));
        assert_eq!(line_from_message("no location"), None);
    }
}

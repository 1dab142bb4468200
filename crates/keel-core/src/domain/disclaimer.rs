//! Generated-region disclaimers and the anchor used to split files.
//!
//! Every disclaimer-bearing file is laid out as
//!
//! ```text
//! <top disclaimer>
//! <generated body>
//! <bottom disclaimer, last line contains ANCHOR>
//! <user content, preserved verbatim across runs>
//! ```
//!
//! [`ANCHOR`] is matched byte-for-byte against files written by earlier
//! runs. Changing it orphans the user content of every generated tree in
//! existence, so it carries its own version suffix.

use crate::domain::{entities::common::RelativePath, text};

/// Split marker. Never change without a migration rule.
pub const ANCHOR: &str = "keel:end-generated v1";

// The first line must match Go's `^// Code generated .* DO NOT EDIT\.$`.
const TOP_LINES: &[&str] = &[
    "Code generated by keel. DO NOT EDIT.",
    "Regenerating this project rewrites everything above the end-generated marker.",
];

// The anchor line must come last: everything after it belongs to the user.
const BOTTOM_LINES: &[&str] = &[
    "Code added below the next line is preserved when the project is regenerated.",
    ANCHOR,
];

/// How comments are written in a file category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentSyntax {
    Line(&'static str),
    Block {
        open: &'static str,
        close: &'static str,
    },
    /// Strict data formats with no comments: regenerated in full every run.
    Exempt,
}

impl CommentSyntax {
    pub fn for_path(path: &RelativePath) -> Self {
        let name = path.file_name();
        match name {
            "Makefile" | "Dockerfile" | ".gitignore" | ".dockerignore" | ".env" | ".env.example" => {
                return Self::Line("#");
            }
            _ => {}
        }

        let ext = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        match ext.to_ascii_lowercase().as_str() {
            "go" | "rs" | "proto" | "js" | "ts" | "java" | "c" | "h" | "cpp" | "swift" | "kt" | "mod" => {
                Self::Line("//")
            }
            "py" | "sh" | "yaml" | "yml" | "toml" | "rb" | "conf" | "tf" | "hcl" => {
                Self::Line("#")
            }
            "sql" | "lua" => Self::Line("--"),
            "ini" => Self::Line(";"),
            "md" | "html" | "xml" | "svg" => Self::Block {
                open: "<!--",
                close: "-->",
            },
            "css" => Self::Block {
                open: "/*",
                close: "*/",
            },
            _ => Self::Exempt,
        }
    }

    pub fn is_exempt(&self) -> bool {
        matches!(self, Self::Exempt)
    }

    fn comment(&self, line: &str) -> String {
        match self {
            Self::Line(prefix) => format!("{prefix} {line}\n"),
            Self::Block { open, close } => format!("{open} {line} {close}\n"),
            Self::Exempt => String::new(),
        }
    }
}

/// Top and bottom disclaimer rendered for one comment syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disclaimer {
    syntax: CommentSyntax,
}

impl Disclaimer {
    pub fn new(syntax: CommentSyntax) -> Self {
        Self { syntax }
    }

    pub fn for_path(path: &RelativePath) -> Self {
        Self::new(CommentSyntax::for_path(path))
    }

    pub fn syntax(&self) -> CommentSyntax {
        self.syntax
    }

    pub fn top(&self) -> String {
        TOP_LINES.iter().map(|l| self.syntax.comment(l)).collect()
    }

    pub fn bottom(&self) -> String {
        BOTTOM_LINES.iter().map(|l| self.syntax.comment(l)).collect()
    }

    /// `top + body + "\n" + bottom`, with a Markdown heading in front for
    /// `.md` files. Exempt files get the body alone.
    pub fn wrap(&self, body: &str, path: &RelativePath) -> String {
        if self.syntax.is_exempt() {
            return body.to_owned();
        }

        let mut out = String::new();
        if is_markdown(path) {
            out.push_str("# ");
            out.push_str(&markdown_title(path));
            out.push_str("\n\n");
        }
        out.push_str(&self.top());
        out.push_str(body);
        out.push('\n');
        out.push_str(&self.bottom());
        out
    }
}

/// Split existing file bytes at the anchor line.
///
/// Returns the bytes after the end of the first line containing [`ANCHOR`],
/// or `None` when the anchor is absent.
pub fn split_user_content(bytes: &[u8]) -> Option<&[u8]> {
    let anchor = ANCHOR.as_bytes();
    let start = bytes
        .windows(anchor.len())
        .position(|window| window == anchor)?;
    let after_anchor = &bytes[start + anchor.len()..];
    match after_anchor.iter().position(|&b| b == b'\n') {
        Some(newline) => Some(&after_anchor[newline + 1..]),
        None => Some(&[]),
    }
}

fn is_markdown(path: &RelativePath) -> bool {
    path.file_name().to_ascii_lowercase().ends_with(".md")
}

/// `getting-started.md` → `Getting Started`.
fn markdown_title(path: &RelativePath) -> String {
    let name = path.file_name();
    let stem = name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name);
    text::capitalize_words(&stem.replace(['-', '_'], " "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_by_extension_and_basename() {
        let syntax = |p: &str| CommentSyntax::for_path(&RelativePath::new(p));
        assert_eq!(syntax("cmd/main_gen.go"), CommentSyntax::Line("//"));
        assert_eq!(syntax("Makefile"), CommentSyntax::Line("#"));
        assert_eq!(syntax("deploy/app.conf"), CommentSyntax::Line("#"));
        assert_eq!(syntax("migrations/001.sql"), CommentSyntax::Line("--"));
        assert!(matches!(syntax("docs/index.md"), CommentSyntax::Block { open: "<!--", .. }));
        assert!(syntax("config/app.json").is_exempt());
        assert!(syntax("assets/logo.png").is_exempt());
    }

    #[test]
    fn bottom_disclaimer_carries_anchor() {
        let disclaimer = Disclaimer::new(CommentSyntax::Line("//"));
        assert!(disclaimer.bottom().contains(ANCHOR));
        assert!(!disclaimer.top().contains(ANCHOR));
        assert!(disclaimer.bottom().ends_with('\n'));
    }

    #[test]
    fn go_header_matches_generated_code_convention() {
        let path = RelativePath::new("cmd/main_gen.go");
        let wrapped = Disclaimer::for_path(&path).wrap("package main", &path);
        let first = wrapped.lines().next().unwrap();
        assert!(first.starts_with("// Code generated "));
        assert!(first.ends_with(" DO NOT EDIT."));
    }

    #[test]
    fn wrap_then_split_yields_empty_user_content() {
        let path = RelativePath::new("handler.go");
        let wrapped = Disclaimer::for_path(&path).wrap("package x\n", &path);
        assert_eq!(split_user_content(wrapped.as_bytes()), Some(&b""[..]));
    }

    #[test]
    fn split_returns_bytes_after_anchor_line() {
        let path = RelativePath::new("handler.go");
        let mut file = Disclaimer::for_path(&path).wrap("package x", &path);
        file.push_str("\nfunc X(){}\n");
        assert_eq!(split_user_content(file.as_bytes()), Some(&b"\nfunc X(){}\n"[..]));
    }

    #[test]
    fn split_without_anchor_is_none() {
        assert!(split_user_content(b"package main\n").is_none());
    }

    #[test]
    fn anchor_at_end_of_file_has_no_user_content() {
        assert_eq!(split_user_content(b"// keel:end-generated v1"), Some(&b""[..]));
    }

    #[test]
    fn markdown_gets_heading_from_file_name() {
        let path = RelativePath::new("docs/getting-started.md");
        let wrapped = Disclaimer::for_path(&path).wrap("Body", &path);
        assert!(wrapped.starts_with("# Getting Started\n\n<!-- "));
    }

    #[test]
    fn exempt_files_are_not_wrapped() {
        let path = RelativePath::new("package.json");
        assert_eq!(Disclaimer::for_path(&path).wrap("{}", &path), "{}");
    }
}

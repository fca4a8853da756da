//! Line-oriented patterns for comments and preprocessor directives.
//!
//! These are heuristics, not a lexer: comment markers inside string or
//! character literals are stripped like any other, and only the first
//! line of a backslash-continued directive is recognized.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Whole-line `//` comment (with its newline), trailing `//` comment,
    /// or non-nested `/* ... */` block.
    static ref COMMENT: Regex =
        Regex::new(r"(?m)^[ \t]*//[^\n]*(?:\n|$)|//[^\n]*|/\*(?s:.*?)\*/").unwrap();
    static ref DIRECTIVE: Regex = Regex::new(
        r"(?m)^[ \t]*#[ \t]*(?:include|ifdef|ifndef|if|elifdef|elifndef|elif|else|endif|define|undef|error|pragma|line)\b[^\n]*(?:\n|$)"
    )
    .unwrap();
    static ref KEYWORD: Regex = Regex::new(r"^#[ \t]*([A-Za-z_]+)").unwrap();
    static ref INCLUDED_FILE: Regex = Regex::new(r#"^#[ \t]*include[ \t]*(?:<([^>]+)>|"([^"]+)")"#).unwrap();
    static ref NAMESPACE: Regex = Regex::new(r"\bnamespace\b").unwrap();
    static ref BLANK_RUNS: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Every comment token in `text`, in source order.
pub fn find_comments(text: &str) -> Vec<&str> {
    COMMENT.find_iter(text).map(|m| m.as_str()).collect()
}

/// Remove every comment token from `text`.
pub fn strip_comments(text: &str) -> String {
    COMMENT.replace_all(text, "").into_owned()
}

/// Split `text` into the body without directive lines and the directives
/// themselves (trimmed, in source order).
pub fn extract_directives(text: &str) -> (String, Vec<String>) {
    let directives = DIRECTIVE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .collect();
    let body = DIRECTIVE.replace_all(text, "").into_owned();
    (body, directives)
}

/// Keyword of a directive line (`"endif"` for `#  endif // X`).
pub fn directive_keyword(line: &str) -> Option<&str> {
    KEYWORD
        .captures(line.trim())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Target of an include line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Included<'a> {
    /// `#include <a/b.h>`
    System(&'a str),
    /// `#include "a/b.h"`
    Local(&'a str),
}

pub fn included_file(line: &str) -> Option<Included<'_>> {
    let caps = INCLUDED_FILE.captures(line.trim())?;
    if let Some(m) = caps.get(1) {
        return Some(Included::System(m.as_str()));
    }
    caps.get(2).map(|m| Included::Local(m.as_str()))
}

/// Replace the first `namespace` token with `export namespace`.
pub fn export_first_namespace(body: &str) -> String {
    NAMESPACE.replace(body, "export namespace").into_owned()
}

/// Collapse runs of three or more newlines to one blank line.
pub fn collapse_blank_runs(text: &str) -> String {
    BLANK_RUNS.replace_all(text, "\n\n").into_owned()
}

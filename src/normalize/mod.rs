//! Preprocessor normalizer.
//!
//! Turns one source file into a directive-free body plus a filtered list
//! of directives, relative to everything already emitted into the global
//! module fragment:
//!
//! 1. strip comments
//! 2. pull out directive lines
//! 3. mute the file's include guard and directives already emitted
//! 4. mute duplicate includes
//!
//! Include elision across the whole module happens once per module, see
//! [`includes::comment_out_unnecessary_includes`].

pub mod guards;
pub mod includes;
pub mod patterns;

use std::collections::HashSet;
use tracing::debug;

use crate::source::SourceFile;

pub use guards::{comment_out_duplicate_includes, comment_out_include_guards};
pub use includes::comment_out_unnecessary_includes;
pub use patterns::{extract_directives, strip_comments};

/// Append-only list of lines emitted before the exported module body.
#[derive(Debug, Clone, Default)]
pub struct GlobalFragment {
    lines: Vec<String>,
    seen: HashSet<String>,
}

impl GlobalFragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fragment = Self::new();
        fragment.extend(lines);
        fragment
    }

    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        self.seen.insert(line.clone());
        self.lines.push(line);
    }

    pub fn extend<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for line in lines {
            self.push(line);
        }
    }

    /// Whether `line` was emitted verbatim.
    pub fn contains(&self, line: &str) -> bool {
        self.seen.contains(line)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl PartialEq for GlobalFragment {
    fn eq(&self, other: &Self) -> bool {
        self.lines == other.lines
    }
}

impl Eq for GlobalFragment {}

/// Output of [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFile {
    /// File text with comments and directive lines removed.
    pub body: String,
    /// Directives after elision, muted ones prefixed with `// `.
    pub directives: Vec<String>,
    /// The input fragment with `directives` appended.
    pub fragment: GlobalFragment,
}

/// Normalize one file against the running global fragment.
pub fn normalize(file: &SourceFile, fragment: GlobalFragment) -> NormalizedFile {
    let stripped = strip_comments(&file.content);
    let (body, raw) = extract_directives(&stripped);
    let found = raw.len();

    let directives = comment_out_include_guards(&file.filename, raw, &fragment);
    let directives = comment_out_duplicate_includes(&fragment, directives);

    debug!(
        file = %file.filename,
        directives = found,
        muted = directives.iter().filter(|d| guards::is_commented(d)).count(),
        "normalized"
    );

    let mut fragment = fragment;
    fragment.extend(directives.iter().cloned());
    NormalizedFile {
        body,
        directives,
        fragment,
    }
}

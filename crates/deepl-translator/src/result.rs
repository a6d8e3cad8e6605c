//! Translation results.

use std::fmt;

use serde::Serialize;

/// Languages the site reported using, as primary subtags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetectedLanguages {
    pub source: Option<String>,
    pub target: Option<String>,
}

/// A completed translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationResult {
    pub text: String,
    pub detected: DetectedLanguages,
}

impl fmt::Display for TranslationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Join rendered output lines, one per line, each without its own trailing newlines.
///
/// Each output line is its own paragraph element, so the separator restores
/// the input's line structure without doubling blank lines.
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(|line| line.as_ref().trim_end_matches('\n'))
        .collect::<Vec<_>>()
        .join("\n")
}

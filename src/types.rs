//! Core, format-agnostic types shared across the generator.
//!
//! Front ends attach [`Location`]s to every parsed node; the emitter and the
//! source map layer consume them. [`Diagnostic`] is the payload delivered to
//! the caller's error sink for per-message problems.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{ast::Document, source_map::SourceMap};

/// A position in a source document. Lines and columns are 1-based; `offset`
/// is the absolute character offset from the start of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

impl Location {
    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        Location {
            line,
            column,
            offset,
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The shape of the generated module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetType {
    /// `const resource = ...` followed by `export default resource`.
    #[default]
    Plain,
    /// A function that registers `{locale, resource}` onto a passed-in
    /// component object (single-file-component embedding).
    Sfc,
}

impl Display for TargetType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetType::Plain => write!(f, "plain"),
            TargetType::Sfc => write!(f, "sfc"),
        }
    }
}

/// Environment mode for generation. Development wraps each compiled message
/// function so it carries its original source string for introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// A per-message problem reported through the caller's error sink.
///
/// Carries enough context (original text, dotted path) to localize the
/// offending message in the source resource file.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Human-readable description of the problem.
    pub message: String,
    /// The original message text being compiled.
    pub source: Option<String>,
    /// Dotted path of the message within the document, e.g. `menu.items.2`.
    pub path: Option<String>,
    /// Compiler-specific error code, when the compiler reported one.
    pub code: Option<u32>,
    /// Compiler-specific error domain, when the compiler reported one.
    pub domain: Option<String>,
    /// Position of the problem within the message text.
    pub location: Option<Location>,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) if !path.is_empty() => write!(f, "{} (at {})", self.message, path),
            _ => write!(f, "{}", self.message),
        }
    }
}

/// The result of one generation call: the parsed document tree (for caller
/// inspection or caching), the generated module code, and the merged source
/// map when map building was requested.
#[derive(Debug, Clone)]
pub struct Generated {
    pub ast: Document,
    pub code: String,
    pub map: Option<SourceMap>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        assert_eq!(Location::new(7, 3, 42).to_string(), "7:3");
    }

    #[test]
    fn test_target_type_display() {
        assert_eq!(TargetType::Plain.to_string(), "plain");
        assert_eq!(TargetType::Sfc.to_string(), "sfc");
    }

    #[test]
    fn test_diagnostic_display_includes_path() {
        let diagnostic = Diagnostic {
            message: "Unexpected placeholder".to_string(),
            source: Some("hi {".to_string()),
            path: Some("menu.title".to_string()),
            code: None,
            domain: None,
            location: None,
        };
        assert_eq!(
            diagnostic.to_string(),
            "Unexpected placeholder (at menu.title)"
        );
    }
}

//! All supported locale resource document formats.
//!
//! Each front end parses its own grammar into the shared document tree in
//! [`crate::ast`]; format quirks (YAML scalar typing, JavaScript template
//! literals and function values) stay inside the front ends. This module
//! provides the [`FormatType`] enum for generic format handling.

pub(crate) mod cursor;
pub mod javascript;
pub mod json;
pub mod yaml;

use std::{
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

use crate::Error;

/// Represents all supported document formats for generic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// JSON resource documents.
    Json,
    /// YAML resource documents.
    Yaml,
    /// Restricted JavaScript modules exporting an object literal.
    JavaScript,
}

impl FormatType {
    /// The canonical file extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Json => "json",
            FormatType::Yaml => "yaml",
            FormatType::JavaScript => "js",
        }
    }

    /// Default document name used when the caller supplies none.
    pub(crate) fn default_filename(&self) -> &'static str {
        match self {
            FormatType::Json => "bundle.json",
            FormatType::Yaml => "bundle.yaml",
            FormatType::JavaScript => "bundle.js",
        }
    }
}

impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Json => write!(f, "json"),
            FormatType::Yaml => write!(f, "yaml"),
            FormatType::JavaScript => write!(f, "javascript"),
        }
    }
}

/// Accepts the common names and extensions for each format,
/// case-insensitively.
impl FromStr for FormatType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" | "json5" => Ok(FormatType::Json),
            "yaml" | "yml" => Ok(FormatType::Yaml),
            "javascript" | "js" | "mjs" | "cjs" => Ok(FormatType::JavaScript),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// Infers the document format from a file path's extension.
///
/// # Example
/// ```rust
/// use localegen::formats::{FormatType, infer_format_from_extension};
/// assert_eq!(
///     infer_format_from_extension("locales/en.yaml").unwrap(),
///     FormatType::Yaml
/// );
/// ```
pub fn infer_format_from_extension<P: AsRef<Path>>(path: P) -> Result<FormatType, Error> {
    match path.as_ref().extension().and_then(|s| s.to_str()) {
        Some(extension) => extension.parse(),
        None => Err(Error::UnknownFormat(format!(
            "no file extension on `{}`",
            path.as_ref().display()
        ))),
    }
}

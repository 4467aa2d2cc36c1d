//! All error types for the localegen crate.
//!
//! These are the *fatal* failures: malformed input documents, invalid
//! configuration, and source map decoding problems. Per-message compilation
//! problems are not errors; they are streamed to the caller's diagnostic
//! sink and generation continues with degraded output.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("JSON parse error at line {line}, column {column}: {message}")]
    JsonParse {
        message: String,
        line: u32,
        column: u32,
    },

    #[error("YAML parse error at line {line}, column {column}: {message}")]
    YamlParse {
        message: String,
        line: u32,
        column: u32,
    },

    #[error("JavaScript parse error at line {line}, column {column}: {message}")]
    JavaScriptParse {
        message: String,
        line: u32,
        column: u32,
    },

    #[error("you need to define an object as the locale message with 'export default'")]
    ObjectDefaultExportRequired,

    #[error("you need to define 'export default' that will return the locale messages")]
    DefaultExportRequired,

    #[error("source map error: {0}")]
    SourceMap(String),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("'{requester}' requires 'vue-i18n' or 'petite-vue-i18n' to be present in the dependency tree")]
    MissingRuntime { requester: String },

    #[error("validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Creates a new validation error
    pub fn validation_error(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_format_error() {
        let error = Error::UnknownFormat("toml".to_string());
        assert_eq!(error.to_string(), "unknown format `toml`");
    }

    #[test]
    fn test_parse_errors_carry_position() {
        let error = Error::JsonParse {
            message: "unexpected character `;`".to_string(),
            line: 3,
            column: 14,
        };
        assert_eq!(
            error.to_string(),
            "JSON parse error at line 3, column 14: unexpected character `;`"
        );
    }

    #[test]
    fn test_default_export_errors() {
        assert_eq!(
            Error::ObjectDefaultExportRequired.to_string(),
            "you need to define an object as the locale message with 'export default'"
        );
        assert_eq!(
            Error::DefaultExportRequired.to_string(),
            "you need to define 'export default' that will return the locale messages"
        );
    }

    #[test]
    fn test_missing_runtime_error_names_requester() {
        let error = Error::MissingRuntime {
            requester: "my-bundler-plugin".to_string(),
        };
        assert!(error.to_string().contains("my-bundler-plugin"));
        assert!(error.to_string().contains("vue-i18n"));
        assert!(error.to_string().contains("petite-vue-i18n"));
    }

    #[test]
    fn test_validation_error() {
        let error = Error::validation_error("locale `no bueno` is not a language identifier");
        assert!(error.to_string().starts_with("validation error: "));
    }
}

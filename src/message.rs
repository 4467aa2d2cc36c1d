//! The message-function compiler adapter.
//!
//! The message-template compiler itself (placeholder and plural syntax) is
//! an external collaborator consumed through the [`MessageCompiler`] trait.
//! This module wraps one compilation: markup detection, optional escaping,
//! error enrichment with the message's dotted path, and the development
//! wrapper that attaches the original source string to the produced
//! function.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::{
    options::GenerateOptions,
    source_map::SourceMap,
    types::{Diagnostic, Environment, Location},
};

lazy_static! {
    static ref HTML_TAG_RE: Regex =
        Regex::new(r#"</?[\w\s="/.':;#-/]+>"#).expect("valid markup detection regex");
}

/// Compilation mode requested from the external compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompileMode {
    Normal,
    /// Emit an arrow function expression (the mode document generation
    /// always requests).
    #[default]
    Arrow,
}

/// Per-call input for [`MessageCompiler::compile`].
#[derive(Debug, Clone)]
pub struct CompileRequest<'a> {
    pub mode: CompileMode,
    /// Document name, usable as the compiled map's source.
    pub filename: &'a str,
    /// Whether a source map for the compiled code is wanted.
    pub source_map: bool,
}

/// One error reported by the external compiler.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerError {
    pub message: String,
    pub code: Option<u32>,
    pub domain: Option<String>,
    pub location: Option<Location>,
}

/// The external compiler's output for one message.
#[derive(Debug, Clone)]
pub struct CompiledMessage {
    /// A function expression rendering the message.
    pub code: String,
    /// The compiler's message AST, opaque to generation.
    pub ast: Option<Value>,
    pub map: Option<SourceMap>,
}

/// The stable contract to the external message-template compiler.
///
/// Implementations must be reentrant: one instance is shared across every
/// leaf of a document. Errors are streamed through `on_error` rather than
/// returned, so a failed compilation still yields a result.
pub trait MessageCompiler {
    fn compile(
        &self,
        message: &str,
        request: &CompileRequest<'_>,
        on_error: &mut dyn FnMut(CompilerError),
    ) -> CompiledMessage;
}

/// A compiled message function ready to splice into the generated document.
#[derive(Debug, Clone)]
pub struct MessageFunction {
    /// Code to emit in place of the string literal. Degrades to the raw
    /// message text when compilation reported errors.
    pub code: String,
    pub ast: Option<Value>,
    pub map: Option<SourceMap>,
    pub errors: Vec<CompilerError>,
}

/// Joins path segments into the dotted form used for error attribution.
pub fn dotted_path(path: &[String]) -> String {
    path.join(".")
}

/// Detects embedded markup tags in a message.
pub fn detect_html_tag(message: &str) -> bool {
    HTML_TAG_RE.is_match(message)
}

/// Escapes markup-significant characters in a message.
pub fn escape_html(message: &str) -> String {
    let mut escaped = String::with_capacity(message.len());
    for ch in message.chars() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Compiles one string leaf into a message function.
///
/// Markup in the message produces an advisory through `on_error` when
/// `strict_message` is set, and the message is HTML-escaped before
/// compilation when `escape_html` is set. Compiler errors are forwarded to
/// `on_error` enriched with the original text and dotted path, and collected
/// on the returned [`MessageFunction`]; the emitted code then degrades to
/// the message text itself so generation can complete. Never fails; the
/// caller decides whether collected errors are fatal.
pub fn generate_message_function(
    message: &str,
    options: &GenerateOptions,
    path: &[String],
    compiler: &dyn MessageCompiler,
    on_error: &mut dyn FnMut(Diagnostic),
) -> MessageFunction {
    let mut detected_html = false;
    if detect_html_tag(message) {
        detected_html = true;
        if options.strict_message {
            on_error(Diagnostic {
                message: format!("Detected HTML in '{}' message.", message),
                source: Some(message.to_string()),
                path: Some(dotted_path(path)),
                code: None,
                domain: None,
                location: None,
            });
        }
    }

    let input = if detected_html && options.escape_html {
        escape_html(message)
    } else {
        message.to_string()
    };

    let request = CompileRequest {
        mode: CompileMode::Arrow,
        filename: &options.filename,
        source_map: options.source_map,
    };
    let mut errors = Vec::new();
    let compiled = compiler.compile(&input, &request, &mut |error| {
        on_error(Diagnostic {
            message: error.message.clone(),
            source: Some(message.to_string()),
            path: Some(dotted_path(path)),
            code: error.code,
            domain: error.domain.clone(),
            location: error.location,
        });
        errors.push(error);
    });

    let code = if errors.is_empty() {
        match options.env {
            Environment::Development => format!(
                "(()=>{{const fn={};fn.source={};return fn;}})()",
                compiled.code,
                Value::from(message)
            ),
            Environment::Production => compiled.code,
        }
    } else {
        input
    };

    MessageFunction {
        code,
        ast: compiled.ast,
        map: compiled.map,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compiles every message to an arrow function returning its text.
    struct EchoCompiler;

    impl MessageCompiler for EchoCompiler {
        fn compile(
            &self,
            message: &str,
            _request: &CompileRequest<'_>,
            _on_error: &mut dyn FnMut(CompilerError),
        ) -> CompiledMessage {
            CompiledMessage {
                code: format!("(ctx) => {}", Value::from(message)),
                ast: None,
                map: None,
            }
        }
    }

    /// Reports one parse error per message.
    struct FailingCompiler;

    impl MessageCompiler for FailingCompiler {
        fn compile(
            &self,
            _message: &str,
            _request: &CompileRequest<'_>,
            on_error: &mut dyn FnMut(CompilerError),
        ) -> CompiledMessage {
            on_error(CompilerError {
                message: "unexpected end of placeholder".to_string(),
                code: Some(7),
                domain: Some("parser".to_string()),
                location: Some(Location::new(1, 4, 3)),
            });
            CompiledMessage {
                code: String::new(),
                ast: None,
                map: None,
            }
        }
    }

    fn collect(diagnostics: &mut Vec<Diagnostic>) -> impl FnMut(Diagnostic) + '_ {
        |diagnostic| diagnostics.push(diagnostic)
    }

    #[test]
    fn test_detect_html_tag() {
        assert!(detect_html_tag("hello <b>world</b>"));
        assert!(detect_html_tag("<span class=\"x\">hi</span>"));
        assert!(!detect_html_tag("hello {name}"));
        assert!(!detect_html_tag("1 < 2"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"hi\" & 'bye'</b>"),
            "&lt;b&gt;&quot;hi&quot; &amp; &apos;bye&apos;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_dotted_path() {
        assert_eq!(dotted_path(&[]), "");
        let path = vec!["a".to_string(), "b".to_string(), "2".to_string()];
        assert_eq!(dotted_path(&path), "a.b.2");
    }

    #[test]
    fn test_development_wraps_with_source() {
        let options = GenerateOptions::new();
        let mut diagnostics = Vec::new();
        let function = generate_message_function(
            "hi {name}",
            &options,
            &["greeting".to_string()],
            &EchoCompiler,
            &mut collect(&mut diagnostics),
        );
        assert_eq!(
            function.code,
            "(()=>{const fn=(ctx) => \"hi {name}\";fn.source=\"hi {name}\";return fn;})()"
        );
        assert!(function.errors.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_production_emits_bare_code() {
        let options = GenerateOptions::new().with_env(Environment::Production);
        let mut diagnostics = Vec::new();
        let function = generate_message_function(
            "hi",
            &options,
            &[],
            &EchoCompiler,
            &mut collect(&mut diagnostics),
        );
        assert_eq!(function.code, "(ctx) => \"hi\"");
    }

    #[test]
    fn test_strict_markup_advisory() {
        let options = GenerateOptions::new();
        let mut diagnostics = Vec::new();
        let _ = generate_message_function(
            "hello <b>world</b>",
            &options,
            &["title".to_string()],
            &EchoCompiler,
            &mut collect(&mut diagnostics),
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "Detected HTML in 'hello <b>world</b>' message."
        );
        assert_eq!(diagnostics[0].path.as_deref(), Some("title"));
        assert_eq!(diagnostics[0].source.as_deref(), Some("hello <b>world</b>"));
    }

    #[test]
    fn test_lenient_markup_is_silent() {
        let options = GenerateOptions::new().with_strict_message(false);
        let mut diagnostics = Vec::new();
        let _ = generate_message_function(
            "hello <b>world</b>",
            &options,
            &[],
            &EchoCompiler,
            &mut collect(&mut diagnostics),
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_escape_html_option_escapes_before_compiling() {
        let options = GenerateOptions::new()
            .with_strict_message(false)
            .with_escape_html(true)
            .with_env(Environment::Production);
        let mut diagnostics = Vec::new();
        let function = generate_message_function(
            "<b>hi</b>",
            &options,
            &[],
            &EchoCompiler,
            &mut collect(&mut diagnostics),
        );
        assert_eq!(function.code, "(ctx) => \"&lt;b&gt;hi&lt;/b&gt;\"");
    }

    #[test]
    fn test_compiler_errors_degrade_to_source_text() {
        let options = GenerateOptions::new();
        let mut diagnostics = Vec::new();
        let function = generate_message_function(
            "hi {",
            &options,
            &["a".to_string(), "b".to_string(), "2".to_string()],
            &FailingCompiler,
            &mut collect(&mut diagnostics),
        );
        assert_eq!(function.code, "hi {");
        assert_eq!(function.errors.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].path.as_deref(), Some("a.b.2"));
        assert_eq!(diagnostics[0].code, Some(7));
        assert_eq!(diagnostics[0].domain.as_deref(), Some("parser"));
        assert_eq!(diagnostics[0].source.as_deref(), Some("hi {"));
    }
}

#![allow(dead_code)]
//! Shared fixtures: deterministic message compilers standing in for the
//! external message-template compiler.

use localegen::{
    message::{CompileRequest, CompiledMessage, CompilerError, MessageCompiler},
    source_map::{Mapping, Position, SourceMapGenerator},
    types::Location,
};

/// Compiles every message to an arrow function returning its text, with a
/// one-segment source map when one is requested.
pub struct EchoCompiler;

impl MessageCompiler for EchoCompiler {
    fn compile(
        &self,
        message: &str,
        request: &CompileRequest<'_>,
        _on_error: &mut dyn FnMut(CompilerError),
    ) -> CompiledMessage {
        let map = request.source_map.then(|| {
            let mut generator = SourceMapGenerator::new(None);
            generator.add_mapping(Mapping {
                generated: Position { line: 1, column: 0 },
                source: Some("message".to_string()),
                original: Some(Position { line: 1, column: 0 }),
                name: None,
            });
            generator.into_map()
        });
        CompiledMessage {
            code: format!("(ctx) => {}", serde_json::Value::from(message)),
            ast: None,
            map,
        }
    }
}

/// Reports one parse error for every message whose text contains `{`
/// without a closing `}`, compiling the rest like [`EchoCompiler`].
pub struct StrictBraceCompiler;

impl MessageCompiler for StrictBraceCompiler {
    fn compile(
        &self,
        message: &str,
        request: &CompileRequest<'_>,
        on_error: &mut dyn FnMut(CompilerError),
    ) -> CompiledMessage {
        if message.matches('{').count() != message.matches('}').count() {
            on_error(CompilerError {
                message: "unterminated placeholder".to_string(),
                code: Some(2),
                domain: Some("parser".to_string()),
                location: Some(Location::new(1, message.find('{').unwrap_or(0) as u32 + 1, 0)),
            });
            return CompiledMessage {
                code: String::new(),
                ast: None,
                map: None,
            };
        }
        EchoCompiler.compile(message, request, &mut |_| {})
    }
}

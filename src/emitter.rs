//! The code buffer shared by all generation paths.
//!
//! An append-only text accumulator tracking the current generated line,
//! column, and offset, with indentation control and optional source map
//! recording. One [`CodeGenerator`] is created per generation call and
//! discarded after; nothing is shared between calls.

use crate::{
    source_map::{Mapping, Position, SourceMapGenerator},
    types::Location,
};

pub struct CodeGenerator {
    code: String,
    line: u32,
    column: u32,
    offset: usize,
    indent_level: usize,
    filename: String,
    map: Option<SourceMapGenerator>,
}

impl CodeGenerator {
    /// Creates a fresh buffer. When `source_map` is set, a map builder is
    /// seeded with the document source content under `filename`.
    pub fn new(filename: &str, source: &str, source_map: bool) -> Self {
        let map = if source_map {
            let mut generator = SourceMapGenerator::new(Some(filename));
            generator.set_source_content(filename, source);
            Some(generator)
        } else {
            None
        };
        CodeGenerator {
            code: String::new(),
            line: 1,
            column: 1,
            offset: 0,
            indent_level: 0,
            filename: filename.to_string(),
            map,
        }
    }

    /// Appends text without recording a mapping.
    pub fn push(&mut self, code: &str) {
        self.push_with(code, None, None);
    }

    /// Appends text; when a map is being built and a source location is
    /// given, records a mapping from the current generated position to it.
    pub fn push_with(&mut self, code: &str, loc: Option<Location>, name: Option<&str>) {
        if self.map.is_some() {
            if let Some(loc) = loc {
                self.add_mapping(loc, name);
            }
        }
        self.code.push_str(code);
        self.advance(code);
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
        self.push_indent_newline();
    }

    pub fn deindent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
        self.push_indent_newline();
    }

    /// Emits a line break at the current indentation depth.
    pub fn newline(&mut self) {
        self.push_indent_newline();
    }

    pub fn pushline(&mut self, code: &str) {
        self.push(code);
        self.newline();
    }

    fn push_indent_newline(&mut self) {
        let text = format!("\n{}", "  ".repeat(self.indent_level));
        self.push(&text);
    }

    fn add_mapping(&mut self, loc: Location, name: Option<&str>) {
        if let Some(map) = &mut self.map {
            map.add_mapping(Mapping {
                generated: Position {
                    line: self.line,
                    column: self.column - 1,
                },
                source: Some(self.filename.clone()),
                original: Some(Position {
                    line: loc.line,
                    column: loc.column.saturating_sub(1),
                }),
                name: name.map(str::to_string),
            });
        }
    }

    fn advance(&mut self, text: &str) {
        let mut lines = 0u32;
        let mut chars_after_newline = 0u32;
        let mut chars = 0usize;
        for ch in text.chars() {
            chars += 1;
            if ch == '\n' {
                lines += 1;
                chars_after_newline = 0;
            } else {
                chars_after_newline += 1;
            }
        }
        self.offset += chars;
        if lines == 0 {
            self.column += chars as u32;
        } else {
            self.line += lines;
            self.column = chars_after_newline + 1;
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Consumes the buffer, returning the generated code and the map
    /// builder when one was requested.
    pub fn into_parts(self) -> (String, Option<SourceMapGenerator>) {
        (self.code, self.map)
    }
}

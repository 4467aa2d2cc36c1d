//! YAML front end: a spanned parser for the block/flow subset locale
//! resource files use.
//!
//! Supported: block mappings and sequences by indentation, flow `{}`/`[]`
//! collections, plain and quoted scalars, comments, an optional `---`
//! document start, and core-schema scalar typing. Anchors, aliases, tags,
//! block scalars, and multi-document streams are parse errors.

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    ast::{ArrayNode, Document, Key, Node, ObjectNode, Property, Scalar, ScalarNode},
    error::Error,
    types::Location,
};

lazy_static! {
    static ref INT_RE: Regex = Regex::new(r"^[-+]?[0-9]+$").expect("valid int regex");
    static ref FLOAT_RE: Regex =
        Regex::new(r"^[-+]?(\.[0-9]+|[0-9]+(\.[0-9]*)?)([eE][+-]?[0-9]+)?$")
            .expect("valid float regex");
}

pub(crate) fn parse(source: &str, _filename: &str) -> Result<Document, Error> {
    let lines = split_lines(source)?;
    let mut parser = YamlParser { lines, index: 0 };
    let root = parser.parse_document()?;
    Ok(Document { root })
}

/// One non-blank, non-comment physical line.
#[derive(Debug, Clone, Copy)]
struct YamlLine<'s> {
    /// Leading space count.
    indent: usize,
    /// Content after the indentation, trailing `\r` stripped.
    text: &'s str,
    line_no: u32,
    /// Absolute character offset of the line start.
    char_offset: usize,
}

fn split_lines(source: &str) -> Result<Vec<YamlLine<'_>>, Error> {
    let mut lines = Vec::new();
    let mut char_offset = 0usize;
    for (index, raw) in source.split('\n').enumerate() {
        let line_no = index as u32 + 1;
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        let trimmed = line.trim_start_matches(' ');
        let indent = line.len() - trimmed.len();
        if trimmed.starts_with('\t') {
            return Err(Error::YamlParse {
                message: "tabs are not allowed in indentation".to_string(),
                line: line_no,
                column: indent as u32 + 1,
            });
        }
        if !trimmed.is_empty() && !trimmed.starts_with('#') {
            lines.push(YamlLine {
                indent,
                text: trimmed,
                line_no,
                char_offset,
            });
        }
        char_offset += raw.chars().count() + 1;
    }
    Ok(lines)
}

fn is_sequence_start(text: &str) -> bool {
    text == "-" || text.starts_with("- ")
}

fn is_document_marker(text: &str) -> bool {
    text == "---" || text.starts_with("--- ") || text == "..."
}

/// Finds the byte index of a `:` separator at flow depth zero, outside
/// quotes, followed by a space or the end of the line.
fn find_mapping_separator(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                } else if q == b'"' && b == b'\\' {
                    i += 1;
                }
            }
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'{' | b'[' => depth += 1,
                b'}' | b']' => depth = depth.saturating_sub(1),
                b':' if depth == 0 => {
                    if i + 1 >= bytes.len() || bytes[i + 1] == b' ' {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }
    None
}

struct YamlParser<'s> {
    lines: Vec<YamlLine<'s>>,
    index: usize,
}

impl<'s> YamlParser<'s> {
    fn current(&self) -> Option<YamlLine<'s>> {
        self.lines.get(self.index).copied()
    }

    fn error_at(line: YamlLine<'_>, message: impl Into<String>) -> Error {
        Error::YamlParse {
            message: message.into(),
            line: line.line_no,
            column: line.indent as u32 + 1,
        }
    }

    fn parse_document(&mut self) -> Result<Node, Error> {
        let mut root: Option<Node> = None;
        if let Some(line) = self.current() {
            if line.text == "---" {
                self.index += 1;
            } else if let Some(rest) = line.text.strip_prefix("--- ") {
                self.index += 1;
                let pad = line.text.len() - rest.trim_start_matches(' ').len();
                let trimmed = &line.text[pad..];
                root = Some(self.parse_inline_root(line, trimmed, line.indent + pad)?);
            }
        }

        if root.is_none() {
            root = Some(match self.current() {
                None => Node::Scalar(ScalarNode {
                    value: Scalar::Null,
                    loc: Location::new(1, 1, 0),
                }),
                Some(line) if is_sequence_start(line.text) => self.parse_sequence(line.indent)?,
                Some(line) if find_mapping_separator(line.text).is_some() => {
                    self.parse_mapping(line.indent)?
                }
                Some(line) => {
                    self.index += 1;
                    self.parse_inline_root(line, line.text, line.indent)?
                }
            });
        }

        if let Some(line) = self.current() {
            if line.text == "..." {
                self.index += 1;
            }
        }
        if let Some(line) = self.current() {
            if line.text == "---" || line.text.starts_with("--- ") {
                return Err(Self::error_at(
                    line,
                    "multi-document streams are not supported",
                ));
            }
            return Err(Self::error_at(line, "unexpected content after document"));
        }
        Ok(root.expect("document root parsed"))
    }

    fn parse_inline_root(
        &mut self,
        line: YamlLine<'s>,
        text: &'s str,
        col_base: usize,
    ) -> Result<Node, Error> {
        let mut scan = InlineScanner::new(text, line.line_no, col_base, line.char_offset + col_base);
        let value = scan.parse_value(FlowContext::Block)?;
        scan.skip_spaces();
        if !scan.at_comment_or_end() {
            return Err(scan.error("unexpected content after value"));
        }
        Ok(value)
    }

    fn parse_mapping(&mut self, indent: usize) -> Result<Node, Error> {
        let first = self.current().expect("mapping has a first line");
        let loc = Location::new(
            first.line_no,
            indent as u32 + 1,
            first.char_offset + indent,
        );
        let mut entries = Vec::new();
        while let Some(line) = self.current() {
            if line.indent < indent {
                break;
            }
            if line.indent > indent {
                return Err(Self::error_at(line, "bad indentation in mapping"));
            }
            if is_sequence_start(line.text) || is_document_marker(line.text) {
                break;
            }
            self.index += 1;
            entries.push(self.parse_mapping_entry(line, line.text, line.indent, indent)?);
        }
        Ok(Node::Object(ObjectNode { entries, loc }))
    }

    /// Parses one `key: value` entry whose text starts at `col_base` of
    /// `line`, consuming following lines when the value is a nested block.
    fn parse_mapping_entry(
        &mut self,
        line: YamlLine<'s>,
        text: &'s str,
        col_base: usize,
        indent: usize,
    ) -> Result<Property, Error> {
        let mut scan = InlineScanner::new(text, line.line_no, col_base, line.char_offset + col_base);
        let key = scan.parse_key()?;
        scan.skip_spaces();
        if scan.at_comment_or_end() {
            let fallback = scan.location();
            let value = self.parse_block_value(indent, true, fallback)?;
            return Ok(Property { key, value });
        }
        let value = scan.parse_value(FlowContext::Block)?;
        scan.skip_spaces();
        if !scan.at_comment_or_end() {
            return Err(scan.error("unexpected content after value"));
        }
        Ok(Property { key, value })
    }

    /// Parses the block value following an entry or sequence dash: a nested
    /// collection on deeper-indented lines, a sequence at the same indent
    /// (mapping values only), or null when nothing follows.
    fn parse_block_value(
        &mut self,
        parent_indent: usize,
        allow_same_indent_sequence: bool,
        fallback: Location,
    ) -> Result<Node, Error> {
        match self.current() {
            Some(line) if line.indent > parent_indent => {
                if is_sequence_start(line.text) {
                    self.parse_sequence(line.indent)
                } else {
                    self.parse_mapping(line.indent)
                }
            }
            Some(line)
                if allow_same_indent_sequence
                    && line.indent == parent_indent
                    && is_sequence_start(line.text) =>
            {
                self.parse_sequence(line.indent)
            }
            _ => Ok(Node::Scalar(ScalarNode {
                value: Scalar::Null,
                loc: fallback,
            })),
        }
    }

    fn parse_sequence(&mut self, indent: usize) -> Result<Node, Error> {
        let first = self.current().expect("sequence has a first line");
        let loc = Location::new(
            first.line_no,
            indent as u32 + 1,
            first.char_offset + indent,
        );
        let mut items = Vec::new();
        while let Some(line) = self.current() {
            if line.indent != indent || !is_sequence_start(line.text) {
                break;
            }
            self.index += 1;
            let rest = &line.text[1..];
            let trimmed = rest.trim_start_matches(' ');
            let item_col_base = line.indent + 1 + (rest.len() - trimmed.len());

            if trimmed.is_empty() || trimmed.starts_with('#') {
                let fallback =
                    Location::new(line.line_no, line.indent as u32 + 2, line.char_offset + line.indent + 1);
                items.push(self.parse_block_value(indent, false, fallback)?);
            } else if is_sequence_start(trimmed) {
                return Err(Self::error_at(
                    line,
                    "nested sequences must start on their own line",
                ));
            } else if find_mapping_separator(trimmed).is_some() {
                items.push(self.parse_dash_line_mapping(line, trimmed, item_col_base)?);
            } else {
                let mut scan = InlineScanner::new(
                    trimmed,
                    line.line_no,
                    item_col_base,
                    line.char_offset + item_col_base,
                );
                let value = scan.parse_value(FlowContext::Block)?;
                scan.skip_spaces();
                if !scan.at_comment_or_end() {
                    return Err(scan.error("unexpected content after value"));
                }
                items.push(value);
            }
        }
        Ok(Node::Array(ArrayNode { items, loc }))
    }

    /// A mapping whose first entry shares the sequence dash's line; further
    /// entries continue at the indentation of that first key.
    fn parse_dash_line_mapping(
        &mut self,
        line: YamlLine<'s>,
        text: &'s str,
        item_indent: usize,
    ) -> Result<Node, Error> {
        let loc = Location::new(
            line.line_no,
            item_indent as u32 + 1,
            line.char_offset + item_indent,
        );
        let mut entries = vec![self.parse_mapping_entry(line, text, item_indent, item_indent)?];
        while let Some(next) = self.current() {
            if next.indent != item_indent || is_sequence_start(next.text) {
                break;
            }
            self.index += 1;
            entries.push(self.parse_mapping_entry(next, next.text, next.indent, item_indent)?);
        }
        Ok(Node::Object(ObjectNode { entries, loc }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowContext {
    /// Plain scalars run to the end of the line (or a comment).
    Block,
    /// Plain scalars stop at `,`, `]`, `}`, and `:`.
    Flow,
}

/// Scans the remainder of a single physical line.
struct InlineScanner<'s> {
    text: &'s str,
    byte_pos: usize,
    char_pos: usize,
    line_no: u32,
    col_base: usize,
    offset_base: usize,
}

impl<'s> InlineScanner<'s> {
    fn new(text: &'s str, line_no: u32, col_base: usize, offset_base: usize) -> Self {
        InlineScanner {
            text,
            byte_pos: 0,
            char_pos: 0,
            line_no,
            col_base,
            offset_base,
        }
    }

    fn location(&self) -> Location {
        Location::new(
            self.line_no,
            (self.col_base + self.char_pos) as u32 + 1,
            self.offset_base + self.char_pos,
        )
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::YamlParse {
            message: message.into(),
            line: self.line_no,
            column: (self.col_base + self.char_pos) as u32 + 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.byte_pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.byte_pos += ch.len_utf8();
        self.char_pos += 1;
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn skip_spaces(&mut self) {
        while self.peek() == Some(' ') {
            self.bump();
        }
    }

    fn at_end(&self) -> bool {
        self.byte_pos >= self.text.len()
    }

    fn at_comment_or_end(&self) -> bool {
        self.at_end() || self.peek() == Some('#')
    }

    fn parse_key(&mut self) -> Result<Key, Error> {
        let loc = self.location();
        let name = match self.peek() {
            Some('"') => self.parse_double_quoted()?,
            Some('\'') => self.parse_single_quoted()?,
            _ => {
                let start = self.byte_pos;
                loop {
                    match self.peek() {
                        None => return Err(self.error("expected `:` in mapping entry")),
                        Some(':') => {
                            let after = self.text[self.byte_pos + 1..].chars().next();
                            if after.is_none() || after == Some(' ') {
                                break;
                            }
                            self.bump();
                        }
                        Some(_) => {
                            self.bump();
                        }
                    }
                }
                self.text[start..self.byte_pos].trim_end_matches(' ').to_string()
            }
        };
        if name.is_empty() {
            return Err(self.error("empty mapping key"));
        }
        self.skip_spaces();
        if !self.eat(':') {
            return Err(self.error("expected `:` after key"));
        }
        Ok(Key { name, loc })
    }

    fn parse_value(&mut self, context: FlowContext) -> Result<Node, Error> {
        match self.peek() {
            Some('{') => self.parse_flow_mapping(),
            Some('[') => self.parse_flow_sequence(),
            Some('"') => {
                let loc = self.location();
                let value = self.parse_double_quoted()?;
                Ok(Node::Scalar(ScalarNode {
                    value: Scalar::Str(value),
                    loc,
                }))
            }
            Some('\'') => {
                let loc = self.location();
                let value = self.parse_single_quoted()?;
                Ok(Node::Scalar(ScalarNode {
                    value: Scalar::Str(value),
                    loc,
                }))
            }
            Some('&') | Some('*') | Some('!') => {
                Err(self.error("anchors, aliases, and tags are not supported"))
            }
            Some('|') | Some('>') => Err(self.error("block scalars are not supported")),
            _ => self.parse_plain_scalar(context),
        }
    }

    fn parse_flow_mapping(&mut self) -> Result<Node, Error> {
        let loc = self.location();
        self.bump();
        let mut entries = Vec::new();
        self.skip_spaces();
        if self.eat('}') {
            return Ok(Node::Object(ObjectNode { entries, loc }));
        }
        loop {
            self.skip_spaces();
            let key = self.parse_flow_key()?;
            self.skip_spaces();
            let value = self.parse_value(FlowContext::Flow)?;
            entries.push(Property { key, value });
            self.skip_spaces();
            if self.eat(',') {
                continue;
            }
            if self.eat('}') {
                break;
            }
            return Err(self.error("expected `,` or `}` in flow mapping"));
        }
        Ok(Node::Object(ObjectNode { entries, loc }))
    }

    fn parse_flow_key(&mut self) -> Result<Key, Error> {
        let loc = self.location();
        let name = match self.peek() {
            Some('"') => self.parse_double_quoted()?,
            Some('\'') => self.parse_single_quoted()?,
            _ => {
                let start = self.byte_pos;
                while let Some(ch) = self.peek() {
                    if ch == ':' || ch == ',' || ch == '}' || ch == ']' {
                        break;
                    }
                    self.bump();
                }
                self.text[start..self.byte_pos].trim_end_matches(' ').to_string()
            }
        };
        if name.is_empty() {
            return Err(self.error("empty mapping key"));
        }
        self.skip_spaces();
        if !self.eat(':') {
            return Err(self.error("expected `:` after key"));
        }
        Ok(Key { name, loc })
    }

    fn parse_flow_sequence(&mut self) -> Result<Node, Error> {
        let loc = self.location();
        self.bump();
        let mut items = Vec::new();
        self.skip_spaces();
        if self.eat(']') {
            return Ok(Node::Array(ArrayNode { items, loc }));
        }
        loop {
            self.skip_spaces();
            items.push(self.parse_value(FlowContext::Flow)?);
            self.skip_spaces();
            if self.eat(',') {
                continue;
            }
            if self.eat(']') {
                break;
            }
            return Err(self.error("expected `,` or `]` in flow sequence"));
        }
        Ok(Node::Array(ArrayNode { items, loc }))
    }

    fn parse_plain_scalar(&mut self, context: FlowContext) -> Result<Node, Error> {
        let loc = self.location();
        let start = self.byte_pos;
        let mut prev = ' ';
        while let Some(ch) = self.peek() {
            if ch == '#' && prev == ' ' {
                break;
            }
            if context == FlowContext::Flow && matches!(ch, ',' | ']' | '}' | ':') {
                break;
            }
            prev = ch;
            self.bump();
        }
        let raw = self.text[start..self.byte_pos].trim_end_matches(' ');
        if raw.is_empty() {
            return Ok(Node::Scalar(ScalarNode {
                value: Scalar::Null,
                loc,
            }));
        }
        Ok(Node::Scalar(ScalarNode {
            value: classify_plain_scalar(raw),
            loc,
        }))
    }

    fn parse_double_quoted(&mut self) -> Result<String, Error> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(value),
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('0') => value.push('\0'),
                    Some('"') => value.push('"'),
                    Some('\\') => value.push('\\'),
                    Some('u') => {
                        let mut code = 0u32;
                        for _ in 0..4 {
                            let digit = self
                                .bump()
                                .and_then(|c| c.to_digit(16))
                                .ok_or_else(|| self.error("invalid unicode escape"))?;
                            code = code * 16 + digit;
                        }
                        value.push(
                            char::from_u32(code)
                                .ok_or_else(|| self.error("invalid unicode escape"))?,
                        );
                    }
                    Some(other) => value.push(other),
                    None => return Err(self.error("unterminated escape sequence")),
                },
                Some(ch) => value.push(ch),
                None => return Err(self.error("unterminated quoted scalar")),
            }
        }
    }

    fn parse_single_quoted(&mut self) -> Result<String, Error> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('\'') => {
                    if self.eat('\'') {
                        value.push('\'');
                    } else {
                        return Ok(value);
                    }
                }
                Some(ch) => value.push(ch),
                None => return Err(self.error("unterminated quoted scalar")),
            }
        }
    }
}

/// Core-schema typing for plain scalars.
fn classify_plain_scalar(raw: &str) -> Scalar {
    match raw {
        "null" | "Null" | "NULL" | "~" => return Scalar::Null,
        "true" | "True" | "TRUE" => return Scalar::Bool(true),
        "false" | "False" | "FALSE" => return Scalar::Bool(false),
        _ => {}
    }
    if INT_RE.is_match(raw) || FLOAT_RE.is_match(raw) {
        return Scalar::Number(raw.to_string());
    }
    Scalar::Str(raw.to_string())
}

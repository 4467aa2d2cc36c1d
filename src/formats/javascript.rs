//! Restricted JavaScript front end.
//!
//! Accepts an ES module whose default export is an object literal of
//! locale messages. The module is scanned for its default export first:
//! an object literal is parsed into the shared document tree; function and
//! arrow exports are reported as dynamic so the caller can decide between
//! passing the source through and failing.
//!
//! Values inside the object are restricted to data: string literals,
//! no-substitution template literals, numeric/boolean/null literals, and
//! nested object/array literals. Function and arrow expressions are
//! captured verbatim as raw code; any other expression becomes an
//! unsupported node, which generation skips without a separator artifact.

use crate::{
    ast::{ArrayNode, Document, Key, Node, ObjectNode, Property, RawNode, Scalar, ScalarNode},
    error::Error,
    formats::cursor::Cursor,
};

/// The shape of a module's default export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Object,
    Function,
    ArrowFunction,
}

/// Result of scanning a module for its default export.
#[derive(Debug)]
pub(crate) struct ModuleScan {
    pub export: Option<ExportKind>,
    pub document: Option<Document>,
}

pub(crate) fn parse(source: &str, _filename: &str) -> Result<ModuleScan, Error> {
    let mut parser = JsParser {
        cursor: Cursor::new(source),
    };
    loop {
        parser.skip_trivia();
        if parser.cursor.is_eof() {
            break;
        }
        if parser.eat_keyword("export") {
            parser.skip_trivia();
            if parser.eat_keyword("default") {
                parser.skip_trivia();
                return parser.parse_default_export();
            }
            parser.skip_statement()?;
        } else {
            parser.skip_statement()?;
        }
    }
    Ok(ModuleScan {
        export: None,
        document: None,
    })
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_continue(ch: char) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}

struct JsParser<'s> {
    cursor: Cursor<'s>,
}

impl<'s> JsParser<'s> {
    fn error(&self, message: impl Into<String>) -> Error {
        Error::JavaScriptParse {
            message: message.into(),
            line: self.cursor.line(),
            column: self.cursor.column(),
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.cursor.bump();
                }
                Some('/') if self.cursor.starts_with("//") => {
                    while !matches!(self.cursor.peek(), None | Some('\n')) {
                        self.cursor.bump();
                    }
                }
                Some('/') if self.cursor.starts_with("/*") => {
                    self.cursor.bump();
                    self.cursor.bump();
                    while !self.cursor.is_eof() && !self.cursor.starts_with("*/") {
                        self.cursor.bump();
                    }
                    self.cursor.eat_str("*/");
                }
                _ => break,
            }
        }
    }

    fn at_keyword(&self, word: &str) -> bool {
        self.cursor.starts_with(word)
            && !self.cursor.rest()[word.len()..]
                .chars()
                .next()
                .is_some_and(is_ident_continue)
    }

    fn eat_keyword(&mut self, word: &str) -> bool {
        if self.at_keyword(word) {
            self.cursor.eat_str(word);
            true
        } else {
            false
        }
    }

    fn parse_default_export(&mut self) -> Result<ModuleScan, Error> {
        match self.cursor.peek() {
            Some('{') => {
                let root = self.parse_object()?;
                Ok(ModuleScan {
                    export: Some(ExportKind::Object),
                    document: Some(Document { root }),
                })
            }
            _ if self.at_keyword("function") => Ok(ModuleScan {
                export: Some(ExportKind::Function),
                document: None,
            }),
            _ if self.at_keyword("async") => {
                self.eat_keyword("async");
                self.skip_trivia();
                let kind = if self.at_keyword("function") {
                    ExportKind::Function
                } else {
                    ExportKind::ArrowFunction
                };
                Ok(ModuleScan {
                    export: Some(kind),
                    document: None,
                })
            }
            Some('(') => {
                self.skip_balanced('(', ')')?;
                self.skip_trivia();
                let export = if self.cursor.starts_with("=>") {
                    Some(ExportKind::ArrowFunction)
                } else {
                    None
                };
                Ok(ModuleScan {
                    export,
                    document: None,
                })
            }
            Some(ch) if is_ident_start(ch) => {
                while self.cursor.peek().is_some_and(is_ident_continue) {
                    self.cursor.bump();
                }
                self.skip_trivia();
                let export = if self.cursor.starts_with("=>") {
                    Some(ExportKind::ArrowFunction)
                } else {
                    None
                };
                Ok(ModuleScan {
                    export,
                    document: None,
                })
            }
            _ => Ok(ModuleScan {
                export: None,
                document: None,
            }),
        }
    }

    fn parse_object(&mut self) -> Result<Node, Error> {
        let loc = self.cursor.location();
        self.cursor.bump();
        let mut entries = Vec::new();
        loop {
            self.skip_trivia();
            match self.cursor.peek() {
                Some('}') => {
                    self.cursor.bump();
                    break;
                }
                None => return Err(self.error("unterminated object literal")),
                _ => {}
            }
            if self.cursor.starts_with("...") {
                // Spread is not data; drop it with no entry.
                self.consume_expression()?;
            } else if let Some(property) = self.parse_property()? {
                entries.push(property);
            }
            self.skip_trivia();
            match self.cursor.peek() {
                Some(',') => {
                    self.cursor.bump();
                }
                Some('}') => {}
                None => return Err(self.error("unterminated object literal")),
                Some(ch) => {
                    return Err(self.error(format!(
                        "unexpected character `{}` in object literal",
                        ch
                    )));
                }
            }
        }
        Ok(Node::Object(ObjectNode { entries, loc }))
    }

    /// Parses one property. Returns `None` for properties the restricted
    /// grammar cannot key (computed keys), which are dropped entirely.
    fn parse_property(&mut self) -> Result<Option<Property>, Error> {
        let key_loc = self.cursor.location();
        if self.cursor.peek() == Some('[') {
            self.skip_balanced('[', ']')?;
            self.skip_trivia();
            if self.cursor.eat(':') {
                self.skip_trivia();
                self.consume_expression()?;
            } else if self.cursor.peek() == Some('(') {
                self.skip_balanced('(', ')')?;
                self.skip_trivia();
                self.skip_balanced('{', '}')?;
            }
            return Ok(None);
        }

        let name = match self.cursor.peek() {
            Some('"') | Some('\'') => self.parse_string_literal()?,
            Some(ch) if ch.is_ascii_digit() || ch == '.' => self.number_lexeme(),
            Some(ch) if is_ident_start(ch) => {
                let start = self.cursor.byte_pos();
                while self.cursor.peek().is_some_and(is_ident_continue) {
                    self.cursor.bump();
                }
                self.cursor.slice_from(start).to_string()
            }
            Some(ch) => {
                return Err(self.error(format!("unexpected character `{}` in object literal", ch)));
            }
            None => return Err(self.error("unterminated object literal")),
        };
        let key = Key {
            name,
            loc: key_loc,
        };

        self.skip_trivia();
        match self.cursor.peek() {
            Some(':') => {
                self.cursor.bump();
                self.skip_trivia();
                let value = self.parse_value_expr()?;
                Ok(Some(Property { key, value }))
            }
            Some('(') => {
                // Method shorthand, kept as a function expression.
                let start = self.cursor.byte_pos();
                self.skip_balanced('(', ')')?;
                self.skip_trivia();
                if self.cursor.peek() != Some('{') {
                    return Err(self.error("expected a method body"));
                }
                self.skip_balanced('{', '}')?;
                let code = format!("function {}", self.cursor.slice_from(start));
                Ok(Some(Property {
                    key,
                    value: Node::Raw(RawNode { code, loc: key_loc }),
                }))
            }
            Some(',') | Some('}') => {
                // Shorthand property references a binding, not data.
                Ok(Some(Property {
                    key,
                    value: Node::Unsupported(key_loc),
                }))
            }
            _ => Err(self.error("expected `:` after property key")),
        }
    }

    fn parse_value_expr(&mut self) -> Result<Node, Error> {
        let loc = self.cursor.location();
        let candidate = match self.cursor.peek() {
            Some('{') => Some(self.parse_object()?),
            Some('[') => Some(self.parse_array()?),
            Some('"') | Some('\'') => {
                let value = self.parse_string_literal()?;
                Some(Node::Scalar(ScalarNode {
                    value: Scalar::Str(value),
                    loc,
                }))
            }
            Some('`') => self.scan_template()?.map(|cooked| {
                Node::Scalar(ScalarNode {
                    value: Scalar::Str(cooked),
                    loc,
                })
            }),
            Some(ch) if ch.is_ascii_digit() || ch == '.' || ch == '-' || ch == '+' => {
                let raw = self.number_lexeme();
                if raw.is_empty() || raw == "-" || raw == "+" || raw == "." {
                    None
                } else {
                    Some(Node::Scalar(ScalarNode {
                        value: Scalar::Number(raw),
                        loc,
                    }))
                }
            }
            _ if self.at_keyword("true") => {
                self.eat_keyword("true");
                Some(Node::Scalar(ScalarNode {
                    value: Scalar::Bool(true),
                    loc,
                }))
            }
            _ if self.at_keyword("false") => {
                self.eat_keyword("false");
                Some(Node::Scalar(ScalarNode {
                    value: Scalar::Bool(false),
                    loc,
                }))
            }
            _ if self.at_keyword("null") => {
                self.eat_keyword("null");
                Some(Node::Scalar(ScalarNode {
                    value: Scalar::Null,
                    loc,
                }))
            }
            _ if self.at_keyword("undefined") => {
                self.eat_keyword("undefined");
                None
            }
            _ if self.at_keyword("function") => Some(self.parse_function_expression()?),
            _ if self.at_keyword("async") => Some(self.parse_async_expression()?),
            Some('(') => self.try_parse_arrow()?,
            Some(ch) if is_ident_start(ch) => self.try_parse_arrow()?,
            _ => None,
        };

        self.skip_trivia();
        if self.at_value_terminator() {
            return Ok(candidate.unwrap_or(Node::Unsupported(loc)));
        }
        // The value continues as a larger expression the restricted grammar
        // does not model; consume it whole and skip it.
        self.consume_expression()?;
        Ok(Node::Unsupported(loc))
    }

    fn at_value_terminator(&self) -> bool {
        matches!(self.cursor.peek(), None | Some(',') | Some('}') | Some(']'))
    }

    fn parse_array(&mut self) -> Result<Node, Error> {
        let loc = self.cursor.location();
        self.cursor.bump();
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.cursor.peek() {
                Some(']') => {
                    self.cursor.bump();
                    break;
                }
                Some(',') => {
                    // Elision hole.
                    items.push(Node::Unsupported(self.cursor.location()));
                    self.cursor.bump();
                    continue;
                }
                None => return Err(self.error("unterminated array literal")),
                _ => {}
            }
            if self.cursor.starts_with("...") {
                self.consume_expression()?;
                items.push(Node::Unsupported(self.cursor.location()));
            } else {
                items.push(self.parse_value_expr()?);
            }
            self.skip_trivia();
            match self.cursor.peek() {
                Some(',') => {
                    self.cursor.bump();
                }
                Some(']') => {}
                None => return Err(self.error("unterminated array literal")),
                Some(ch) => {
                    return Err(
                        self.error(format!("unexpected character `{}` in array literal", ch))
                    );
                }
            }
        }
        Ok(Node::Array(ArrayNode { items, loc }))
    }

    fn parse_function_expression(&mut self) -> Result<Node, Error> {
        let loc = self.cursor.location();
        let start = self.cursor.byte_pos();
        self.eat_keyword("function");
        self.skip_trivia();
        self.cursor.eat('*');
        self.skip_trivia();
        if self.cursor.peek().is_some_and(is_ident_start) {
            while self.cursor.peek().is_some_and(is_ident_continue) {
                self.cursor.bump();
            }
            self.skip_trivia();
        }
        if self.cursor.peek() != Some('(') {
            return Err(self.error("expected function parameters"));
        }
        self.skip_balanced('(', ')')?;
        self.skip_trivia();
        if self.cursor.peek() != Some('{') {
            return Err(self.error("expected a function body"));
        }
        self.skip_balanced('{', '}')?;
        Ok(Node::Raw(RawNode {
            code: self.cursor.slice_from(start).to_string(),
            loc,
        }))
    }

    fn parse_async_expression(&mut self) -> Result<Node, Error> {
        let loc = self.cursor.location();
        let start = self.cursor.byte_pos();
        self.eat_keyword("async");
        self.skip_trivia();
        if self.at_keyword("function") {
            let function = self.parse_function_expression()?;
            let Node::Raw(raw) = function else {
                unreachable!("function expressions parse to raw nodes");
            };
            return Ok(Node::Raw(RawNode {
                code: self.cursor.slice_from(start).to_string(),
                loc: raw.loc,
            }));
        }
        match self.try_parse_arrow()? {
            Some(_) => Ok(Node::Raw(RawNode {
                code: self.cursor.slice_from(start).to_string(),
                loc,
            })),
            None => Ok(Node::Unsupported(loc)),
        }
    }

    /// Attempts to parse an arrow function at the cursor. Restores the
    /// cursor and returns `None` when no `=>` follows the parameter list.
    fn try_parse_arrow(&mut self) -> Result<Option<Node>, Error> {
        let loc = self.cursor.location();
        let start = self.cursor.byte_pos();
        let saved = self.cursor.clone();
        if self.cursor.peek() == Some('(') {
            self.skip_balanced('(', ')')?;
        } else {
            while self.cursor.peek().is_some_and(is_ident_continue) {
                self.cursor.bump();
            }
        }
        self.skip_trivia();
        if !self.cursor.starts_with("=>") {
            self.cursor = saved;
            return Ok(None);
        }
        self.cursor.eat_str("=>");
        self.skip_trivia();
        if self.cursor.peek() == Some('{') {
            self.skip_balanced('{', '}')?;
        } else {
            self.consume_expression()?;
        }
        Ok(Some(Node::Raw(RawNode {
            code: self.cursor.slice_from(start).to_string(),
            loc,
        })))
    }

    /// Consumes an arbitrary expression up to the next `,`, `}`, or `]` at
    /// bracket depth zero.
    fn consume_expression(&mut self) -> Result<(), Error> {
        loop {
            match self.cursor.peek() {
                None => return Ok(()),
                Some(',') | Some('}') | Some(']') => return Ok(()),
                Some('(') => self.skip_balanced('(', ')')?,
                Some('[') => self.skip_balanced('[', ']')?,
                Some('{') => self.skip_balanced('{', '}')?,
                Some('"') | Some('\'') => {
                    self.parse_string_literal()?;
                }
                Some('`') => {
                    self.scan_template()?;
                }
                Some('/') if self.cursor.starts_with("//") || self.cursor.starts_with("/*") => {
                    self.skip_trivia();
                }
                Some(_) => {
                    self.cursor.bump();
                }
            }
        }
    }

    fn skip_balanced(&mut self, open: char, close: char) -> Result<(), Error> {
        let mut depth = 0usize;
        loop {
            match self.cursor.peek() {
                None => {
                    return Err(self.error(format!("unterminated `{}`...`{}` region", open, close)));
                }
                Some(ch) if ch == open => {
                    depth += 1;
                    self.cursor.bump();
                }
                Some(ch) if ch == close => {
                    depth -= 1;
                    self.cursor.bump();
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Some('"') | Some('\'') => {
                    self.parse_string_literal()?;
                }
                Some('`') => {
                    self.scan_template()?;
                }
                Some('/') if self.cursor.starts_with("//") || self.cursor.starts_with("/*") => {
                    self.skip_trivia();
                }
                Some(_) => {
                    self.cursor.bump();
                }
            }
        }
    }

    /// Consumes a statement through `;` or a newline at bracket depth zero.
    fn skip_statement(&mut self) -> Result<(), Error> {
        loop {
            match self.cursor.peek() {
                None => return Ok(()),
                Some(';') | Some('\n') => {
                    self.cursor.bump();
                    return Ok(());
                }
                Some('(') => self.skip_balanced('(', ')')?,
                Some('[') => self.skip_balanced('[', ']')?,
                Some('{') => self.skip_balanced('{', '}')?,
                Some('"') | Some('\'') => {
                    self.parse_string_literal()?;
                }
                Some('`') => {
                    self.scan_template()?;
                }
                Some('/') if self.cursor.starts_with("//") || self.cursor.starts_with("/*") => {
                    self.skip_trivia();
                }
                Some(_) => {
                    self.cursor.bump();
                }
            }
        }
    }

    fn parse_string_literal(&mut self) -> Result<String, Error> {
        let quote = self.cursor.bump().expect("string literal starts at a quote");
        let mut value = String::new();
        loop {
            match self.cursor.bump() {
                None | Some('\n') => return Err(self.error("unterminated string literal")),
                Some(ch) if ch == quote => return Ok(value),
                Some('\\') => {
                    if let Some(ch) = self.parse_escape_sequence()? {
                        value.push(ch);
                    }
                }
                Some(ch) => value.push(ch),
            }
        }
    }

    /// Interprets one escape sequence, the backslash already consumed.
    /// Returns `None` for a line continuation, which cooks to nothing.
    fn parse_escape_sequence(&mut self) -> Result<Option<char>, Error> {
        match self.cursor.bump() {
            Some('n') => Ok(Some('\n')),
            Some('t') => Ok(Some('\t')),
            Some('r') => Ok(Some('\r')),
            Some('b') => Ok(Some('\u{0008}')),
            Some('f') => Ok(Some('\u{000C}')),
            Some('v') => Ok(Some('\u{000B}')),
            Some('0') => Ok(Some('\0')),
            Some('x') => Ok(Some(self.parse_hex_escape(2)?)),
            Some('u') => Ok(Some(self.parse_unicode_escape()?)),
            Some('\n') => Ok(None),
            Some(other) => Ok(Some(other)),
            None => Err(self.error("unterminated escape sequence")),
        }
    }

    fn parse_hex_escape(&mut self, digits: u32) -> Result<char, Error> {
        let mut code = 0u32;
        for _ in 0..digits {
            let digit = self
                .cursor
                .bump()
                .and_then(|ch| ch.to_digit(16))
                .ok_or_else(|| self.error("invalid hex escape"))?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| self.error("invalid hex escape"))
    }

    fn parse_unicode_escape(&mut self) -> Result<char, Error> {
        if self.cursor.eat('{') {
            let mut code = 0u32;
            loop {
                match self.cursor.bump() {
                    Some('}') => break,
                    Some(ch) => {
                        let digit = ch
                            .to_digit(16)
                            .ok_or_else(|| self.error("invalid unicode escape"))?;
                        code = code * 16 + digit;
                    }
                    None => return Err(self.error("unterminated unicode escape")),
                }
            }
            return char::from_u32(code).ok_or_else(|| self.error("invalid unicode escape"));
        }
        self.parse_hex_escape(4)
    }

    /// Scans a template literal. Returns the cooked string when the
    /// template has no substitutions, `None` otherwise (fully consumed
    /// either way).
    fn scan_template(&mut self) -> Result<Option<String>, Error> {
        self.cursor.bump();
        let mut cooked = String::new();
        let mut has_substitution = false;
        loop {
            match self.cursor.peek() {
                None => return Err(self.error("unterminated template literal")),
                Some('`') => {
                    self.cursor.bump();
                    break;
                }
                Some('\\') => {
                    self.cursor.bump();
                    if let Some(ch) = self.parse_escape_sequence()? {
                        cooked.push(ch);
                    }
                }
                Some('$') if self.cursor.starts_with("${") => {
                    has_substitution = true;
                    self.cursor.bump();
                    self.skip_balanced('{', '}')?;
                }
                Some(ch) => {
                    cooked.push(ch);
                    self.cursor.bump();
                }
            }
        }
        Ok(if has_substitution { None } else { Some(cooked) })
    }

    fn number_lexeme(&mut self) -> String {
        let start = self.cursor.byte_pos();
        if matches!(self.cursor.peek(), Some('-') | Some('+')) {
            self.cursor.bump();
        }
        if self.cursor.starts_with("0x")
            || self.cursor.starts_with("0X")
            || self.cursor.starts_with("0o")
            || self.cursor.starts_with("0O")
            || self.cursor.starts_with("0b")
            || self.cursor.starts_with("0B")
        {
            self.cursor.bump();
            self.cursor.bump();
            while self
                .cursor
                .peek()
                .is_some_and(|ch| ch.is_ascii_alphanumeric() || ch == '_')
            {
                self.cursor.bump();
            }
            return self.cursor.slice_from(start).replace('_', "");
        }
        while self
            .cursor
            .peek()
            .is_some_and(|ch| ch.is_ascii_digit() || ch == '_')
        {
            self.cursor.bump();
        }
        if self.cursor.peek() == Some('.') {
            self.cursor.bump();
            while self
                .cursor
                .peek()
                .is_some_and(|ch| ch.is_ascii_digit() || ch == '_')
            {
                self.cursor.bump();
            }
        }
        if matches!(self.cursor.peek(), Some('e') | Some('E')) {
            self.cursor.bump();
            if matches!(self.cursor.peek(), Some('+') | Some('-')) {
                self.cursor.bump();
            }
            while self.cursor.peek().is_some_and(|ch| ch.is_ascii_digit()) {
                self.cursor.bump();
            }
        }
        self.cursor.slice_from(start).replace('_', "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;
    use indoc::indoc;

    fn scan(source: &str) -> ModuleScan {
        parse(source, "test.js").unwrap()
    }

    fn root_entries(scan: &ModuleScan) -> &[Property] {
        match &scan.document.as_ref().expect("document parsed").root {
            Node::Object(object) => &object.entries,
            other => panic!("expected object root, got {:?}", other),
        }
    }

    #[test]
    fn test_object_default_export() {
        let scanned = scan("export default { hello: \"hi\" }\n");
        assert_eq!(scanned.export, Some(ExportKind::Object));
        let entries = root_entries(&scanned);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key.name, "hello");
        assert!(matches!(
            entries[0].value,
            Node::Scalar(ScalarNode { value: Scalar::Str(ref s), .. }) if s == "hi"
        ));
    }

    #[test]
    fn test_imports_and_statements_are_skipped() {
        let source = indoc! {r#"
            import { shared } from './shared'
            // header comment
            const fallback = { a: 1 };
            export default { greeting: 'hello' }
        "#};
        let scanned = scan(source);
        assert_eq!(scanned.export, Some(ExportKind::Object));
        assert_eq!(root_entries(&scanned).len(), 1);
    }

    #[test]
    fn test_function_export_kinds() {
        assert_eq!(
            scan("export default function () { return {} }\n").export,
            Some(ExportKind::Function)
        );
        assert_eq!(
            scan("export default () => ({ a: 1 })\n").export,
            Some(ExportKind::ArrowFunction)
        );
        assert_eq!(
            scan("export default locale => ({ [locale]: 1 })\n").export,
            Some(ExportKind::ArrowFunction)
        );
        assert_eq!(
            scan("export default async () => ({})\n").export,
            Some(ExportKind::ArrowFunction)
        );
    }

    #[test]
    fn test_missing_or_unknown_export() {
        assert_eq!(scan("const x = 1;\n").export, None);
        assert_eq!(scan("export const a = {};\n").export, None);
        assert_eq!(scan("export default 42\n").export, None);
    }

    #[test]
    fn test_template_literal_without_substitution_is_a_string() {
        let scanned = scan("export default { msg: `hello\nworld` }");
        assert!(matches!(
            root_entries(&scanned)[0].value,
            Node::Scalar(ScalarNode { value: Scalar::Str(ref s), .. }) if s == "hello\nworld"
        ));
    }

    #[test]
    fn test_template_and_string_escapes_cook_identically() {
        let scanned = scan(
            "export default { a: `\\u00A0\\x41\\b\\f\\v\\0\\n`, b: '\\u00A0\\x41\\b\\f\\v\\0\\n' }",
        );
        let entries = root_entries(&scanned);
        let cooked_of = |node: &Node| match node {
            Node::Scalar(ScalarNode {
                value: Scalar::Str(s),
                ..
            }) => s.clone(),
            other => panic!("expected string scalar, got {:?}", other),
        };
        let expected = "\u{00A0}A\u{0008}\u{000C}\u{000B}\0\n";
        assert_eq!(cooked_of(&entries[0].value), expected);
        assert_eq!(cooked_of(&entries[1].value), expected);
    }

    #[test]
    fn test_template_line_continuation_cooks_to_nothing() {
        let scanned = scan("export default { msg: `ab\\\ncd` }");
        assert!(matches!(
            root_entries(&scanned)[0].value,
            Node::Scalar(ScalarNode { value: Scalar::Str(ref s), .. }) if s == "abcd"
        ));
    }

    #[test]
    fn test_template_literal_with_substitution_is_unsupported() {
        let scanned = scan("export default { msg: `hello ${name}` }");
        assert!(matches!(
            root_entries(&scanned)[0].value,
            Node::Unsupported(_)
        ));
    }

    #[test]
    fn test_function_values_are_raw() {
        let scanned = scan("export default { fn: function (ctx) { return ctx.count } }");
        let Node::Raw(raw) = &root_entries(&scanned)[0].value else {
            panic!("expected raw function value");
        };
        assert_eq!(raw.code, "function (ctx) { return ctx.count }");
    }

    #[test]
    fn test_arrow_values_are_raw() {
        let scanned = scan("export default { fn: (ctx) => ctx.named('n'), other: 1 }");
        let entries = root_entries(&scanned);
        let Node::Raw(raw) = &entries[0].value else {
            panic!("expected raw arrow value");
        };
        assert_eq!(raw.code, "(ctx) => ctx.named('n')");
        assert!(matches!(
            entries[1].value,
            Node::Scalar(ScalarNode { value: Scalar::Number(ref raw), .. }) if raw == "1"
        ));
    }

    #[test]
    fn test_method_shorthand_becomes_function() {
        let scanned = scan("export default { greet(name) { return name } }");
        let Node::Raw(raw) = &root_entries(&scanned)[0].value else {
            panic!("expected raw method value");
        };
        assert_eq!(raw.code, "function (name) { return name }");
    }

    #[test]
    fn test_unsupported_values_are_marked() {
        let scanned = scan(indoc! {"
            export default {
              a: someIdentifier,
              b: call(1, 2),
              c: 'kept',
              d: 1 + 2,
            }
        "});
        let entries = root_entries(&scanned);
        assert_eq!(entries.len(), 4);
        assert!(matches!(entries[0].value, Node::Unsupported(_)));
        assert!(matches!(entries[1].value, Node::Unsupported(_)));
        assert!(matches!(
            entries[2].value,
            Node::Scalar(ScalarNode { value: Scalar::Str(ref s), .. }) if s == "kept"
        ));
        assert!(matches!(entries[3].value, Node::Unsupported(_)));
    }

    #[test]
    fn test_nested_containers_and_literals() {
        let scanned = scan(indoc! {"
            export default {
              nested: { list: [1, true, null, 'x'] },
              'quoted key': 2,
              10: 'numeric key',
            }
        "});
        let entries = root_entries(&scanned);
        assert_eq!(entries.len(), 3);
        let Node::Object(nested) = &entries[0].value else {
            panic!("expected nested object");
        };
        let Node::Array(list) = &nested.entries[0].value else {
            panic!("expected nested array");
        };
        assert_eq!(list.items.len(), 4);
        assert_eq!(entries[1].key.name, "quoted key");
        assert_eq!(entries[2].key.name, "10");
    }

    #[test]
    fn test_spread_and_computed_keys_are_dropped() {
        let scanned = scan(indoc! {"
            export default {
              ...base,
              [dynamicKey]: 1,
              kept: 'v',
            }
        "});
        let entries = root_entries(&scanned);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key.name, "kept");
    }

    #[test]
    fn test_value_locations() {
        let scanned = scan("export default { hello: \"hi\" }");
        let entries = root_entries(&scanned);
        assert_eq!(entries[0].key.loc, Location::new(1, 18, 17));
        assert_eq!(entries[0].value.loc(), Location::new(1, 25, 24));
    }

    #[test]
    fn test_unterminated_object_is_an_error() {
        assert!(parse("export default { a: 1", "test.js").is_err());
    }
}

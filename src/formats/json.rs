//! JSON front end: a spanned recursive-descent parser for RFC 8259
//! documents, producing the shared document tree.

use crate::{
    ast::{ArrayNode, Document, Key, Node, ObjectNode, Property, Scalar, ScalarNode},
    error::Error,
    formats::cursor::Cursor,
};

pub(crate) fn parse(source: &str, _filename: &str) -> Result<Document, Error> {
    let mut parser = JsonParser {
        cursor: Cursor::new(source),
    };
    parser.skip_whitespace();
    let root = parser.parse_value()?;
    parser.skip_whitespace();
    if !parser.cursor.is_eof() {
        return Err(parser.error("unexpected trailing characters"));
    }
    Ok(Document { root })
}

struct JsonParser<'s> {
    cursor: Cursor<'s>,
}

impl<'s> JsonParser<'s> {
    fn error(&self, message: impl Into<String>) -> Error {
        Error::JsonParse {
            message: message.into(),
            line: self.cursor.line(),
            column: self.cursor.column(),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.cursor.peek(), Some(' ' | '\t' | '\n' | '\r')) {
            self.cursor.bump();
        }
    }

    fn parse_value(&mut self) -> Result<Node, Error> {
        match self.cursor.peek() {
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some('"') => {
                let loc = self.cursor.location();
                let value = self.parse_string()?;
                Ok(Node::Scalar(ScalarNode {
                    value: Scalar::Str(value),
                    loc,
                }))
            }
            Some('t') | Some('f') => {
                let loc = self.cursor.location();
                if self.cursor.eat_str("true") {
                    Ok(Node::Scalar(ScalarNode {
                        value: Scalar::Bool(true),
                        loc,
                    }))
                } else if self.cursor.eat_str("false") {
                    Ok(Node::Scalar(ScalarNode {
                        value: Scalar::Bool(false),
                        loc,
                    }))
                } else {
                    Err(self.error("unexpected keyword"))
                }
            }
            Some('n') => {
                let loc = self.cursor.location();
                if self.cursor.eat_str("null") {
                    Ok(Node::Scalar(ScalarNode {
                        value: Scalar::Null,
                        loc,
                    }))
                } else {
                    Err(self.error("unexpected keyword"))
                }
            }
            Some(ch) if ch == '-' || ch.is_ascii_digit() => self.parse_number(),
            Some(ch) => Err(self.error(format!("unexpected character `{}`", ch))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_object(&mut self) -> Result<Node, Error> {
        let loc = self.cursor.location();
        self.cursor.bump();
        let mut entries = Vec::new();
        self.skip_whitespace();
        if self.cursor.eat('}') {
            return Ok(Node::Object(ObjectNode { entries, loc }));
        }
        loop {
            self.skip_whitespace();
            if self.cursor.peek() != Some('"') {
                return Err(self.error("expected a string key"));
            }
            let key_loc = self.cursor.location();
            let name = self.parse_string()?;
            self.skip_whitespace();
            if !self.cursor.eat(':') {
                return Err(self.error("expected `:` after key"));
            }
            self.skip_whitespace();
            let value = self.parse_value()?;
            entries.push(Property {
                key: Key { name, loc: key_loc },
                value,
            });
            self.skip_whitespace();
            if self.cursor.eat(',') {
                continue;
            }
            if self.cursor.eat('}') {
                break;
            }
            return Err(self.error("expected `,` or `}` in object"));
        }
        Ok(Node::Object(ObjectNode { entries, loc }))
    }

    fn parse_array(&mut self) -> Result<Node, Error> {
        let loc = self.cursor.location();
        self.cursor.bump();
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.cursor.eat(']') {
            return Ok(Node::Array(ArrayNode { items, loc }));
        }
        loop {
            self.skip_whitespace();
            items.push(self.parse_value()?);
            self.skip_whitespace();
            if self.cursor.eat(',') {
                continue;
            }
            if self.cursor.eat(']') {
                break;
            }
            return Err(self.error("expected `,` or `]` in array"));
        }
        Ok(Node::Array(ArrayNode { items, loc }))
    }

    fn parse_string(&mut self) -> Result<String, Error> {
        self.cursor.bump();
        let mut value = String::new();
        loop {
            match self.cursor.bump() {
                Some('"') => return Ok(value),
                Some('\\') => value.push(self.parse_escape()?),
                Some('\n') | None => return Err(self.error("unterminated string")),
                Some(ch) if (ch as u32) < 0x20 => {
                    return Err(self.error("control character in string"));
                }
                Some(ch) => value.push(ch),
            }
        }
    }

    fn parse_escape(&mut self) -> Result<char, Error> {
        match self.cursor.bump() {
            Some('"') => Ok('"'),
            Some('\\') => Ok('\\'),
            Some('/') => Ok('/'),
            Some('b') => Ok('\u{0008}'),
            Some('f') => Ok('\u{000C}'),
            Some('n') => Ok('\n'),
            Some('r') => Ok('\r'),
            Some('t') => Ok('\t'),
            Some('u') => self.parse_unicode_escape(),
            Some(ch) => Err(self.error(format!("invalid escape `\\{}`", ch))),
            None => Err(self.error("unterminated escape sequence")),
        }
    }

    fn parse_unicode_escape(&mut self) -> Result<char, Error> {
        let first = self.parse_hex4()?;
        // Surrogate pairs arrive as two consecutive \u escapes.
        if (0xD800..=0xDBFF).contains(&first) {
            if !(self.cursor.eat('\\') && self.cursor.eat('u')) {
                return Err(self.error("unpaired surrogate escape"));
            }
            let second = self.parse_hex4()?;
            if !(0xDC00..=0xDFFF).contains(&second) {
                return Err(self.error("invalid low surrogate"));
            }
            let combined = 0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00);
            return char::from_u32(combined).ok_or_else(|| self.error("invalid surrogate pair"));
        }
        char::from_u32(first).ok_or_else(|| self.error("invalid unicode escape"))
    }

    fn parse_hex4(&mut self) -> Result<u32, Error> {
        let mut value = 0u32;
        for _ in 0..4 {
            let digit = self
                .cursor
                .bump()
                .and_then(|ch| ch.to_digit(16))
                .ok_or_else(|| self.error("invalid unicode escape"))?;
            value = value * 16 + digit;
        }
        Ok(value)
    }

    fn parse_number(&mut self) -> Result<Node, Error> {
        let loc = self.cursor.location();
        let start = self.cursor.byte_pos();
        self.cursor.eat('-');
        if !matches!(self.cursor.peek(), Some(ch) if ch.is_ascii_digit()) {
            return Err(self.error("expected a digit"));
        }
        while matches!(self.cursor.peek(), Some(ch) if ch.is_ascii_digit()) {
            self.cursor.bump();
        }
        if self.cursor.peek() == Some('.') {
            self.cursor.bump();
            if !matches!(self.cursor.peek(), Some(ch) if ch.is_ascii_digit()) {
                return Err(self.error("expected a digit after `.`"));
            }
            while matches!(self.cursor.peek(), Some(ch) if ch.is_ascii_digit()) {
                self.cursor.bump();
            }
        }
        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            self.cursor.bump();
            if matches!(self.cursor.peek(), Some('+' | '-')) {
                self.cursor.bump();
            }
            if !matches!(self.cursor.peek(), Some(ch) if ch.is_ascii_digit()) {
                return Err(self.error("expected a digit in exponent"));
            }
            while matches!(self.cursor.peek(), Some(ch) if ch.is_ascii_digit()) {
                self.cursor.bump();
            }
        }
        Ok(Node::Scalar(ScalarNode {
            value: Scalar::Number(self.cursor.slice_from(start).to_string()),
            loc,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;

    fn parse_root(source: &str) -> Node {
        parse(source, "test.json").unwrap().root
    }

    #[test]
    fn test_parse_flat_object() {
        let root = parse_root(r#"{"hello": "hi", "count": 3}"#);
        let Node::Object(object) = root else {
            panic!("expected object root");
        };
        assert_eq!(object.entries.len(), 2);
        assert_eq!(object.entries[0].key.name, "hello");
        assert_eq!(
            object.entries[0].value,
            Node::Scalar(ScalarNode {
                value: Scalar::Str("hi".to_string()),
                loc: Location::new(1, 11, 10),
            })
        );
        assert_eq!(object.entries[1].key.name, "count");
        let Node::Scalar(scalar) = &object.entries[1].value else {
            panic!("expected scalar");
        };
        assert_eq!(scalar.value, Scalar::Number("3".to_string()));
    }

    #[test]
    fn test_parse_nested_containers() {
        let root = parse_root(r#"{"a": {"b": [1, true, null, "x"]}}"#);
        let Node::Object(object) = root else {
            panic!("expected object root");
        };
        let Node::Object(inner) = &object.entries[0].value else {
            panic!("expected nested object");
        };
        let Node::Array(array) = &inner.entries[0].value else {
            panic!("expected array");
        };
        assert_eq!(array.items.len(), 4);
    }

    #[test]
    fn test_locations_span_lines() {
        let source = "{\n  \"greeting\": \"hi\"\n}";
        let root = parse_root(source);
        let Node::Object(object) = root else {
            panic!("expected object root");
        };
        assert_eq!(object.entries[0].key.loc, Location::new(2, 3, 4));
        assert_eq!(object.entries[0].value.loc().line, 2);
        assert_eq!(object.entries[0].value.loc().column, 15);
    }

    #[test]
    fn test_string_escapes() {
        let root = parse_root(r#"{"msg": "line\nbreak é 😀"}"#);
        let Node::Object(object) = root else {
            panic!("expected object root");
        };
        let Node::Scalar(scalar) = &object.entries[0].value else {
            panic!("expected scalar");
        };
        assert_eq!(scalar.value, Scalar::Str("line\nbreak é 😀".to_string()));
    }

    #[test]
    fn test_empty_containers() {
        assert!(matches!(
            parse_root("{}"),
            Node::Object(ObjectNode { ref entries, .. }) if entries.is_empty()
        ));
        assert!(matches!(
            parse_root("[]"),
            Node::Array(ArrayNode { ref items, .. }) if items.is_empty()
        ));
    }

    #[test]
    fn test_number_lexemes_preserved() {
        let root = parse_root(r#"[42, -7, 2.5, 1e3]"#);
        let Node::Array(array) = root else {
            panic!("expected array root");
        };
        let lexemes: Vec<&str> = array
            .items
            .iter()
            .map(|item| match item {
                Node::Scalar(ScalarNode {
                    value: Scalar::Number(raw),
                    ..
                }) => raw.as_str(),
                _ => panic!("expected number"),
            })
            .collect();
        assert_eq!(lexemes, vec!["42", "-7", "2.5", "1e3"]);
    }

    #[test]
    fn test_parse_errors_carry_position() {
        let error = parse("{\n  \"a\" 1\n}", "test.json").unwrap_err();
        let Error::JsonParse { line, column, .. } = error else {
            panic!("expected JSON parse error");
        };
        assert_eq!(line, 2);
        assert_eq!(column, 7);
    }

    #[test]
    fn test_rejects_trailing_comma() {
        assert!(parse(r#"{"a": 1,}"#, "test.json").is_err());
        assert!(parse("[1, 2,]", "test.json").is_err());
    }

    #[test]
    fn test_rejects_trailing_garbage() {
        assert!(parse("{} extra", "test.json").is_err());
    }
}

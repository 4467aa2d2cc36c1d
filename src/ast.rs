//! The parsed document tree shared by every format front end.
//!
//! Each front end parses its own grammar but produces the same spanned node
//! kinds, so a single walker in [`crate::codegen`] serves all formats.
//! Format quirks stay in the front ends: YAML scalar typing, JavaScript
//! template literals (already cooked into strings), function expressions
//! (kept as verbatim [`Node::Raw`] code), and values the restricted
//! JavaScript grammar cannot express as data ([`Node::Unsupported`]).

use serde_json::{Number, Value};

use crate::types::Location;

/// A parsed locale resource document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Node,
}

/// One node of the document tree. Trees are read-only after parsing and
/// never mutated by generation.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Object(ObjectNode),
    Array(ArrayNode),
    Scalar(ScalarNode),
    /// Verbatim code carried through generation unchanged (JavaScript
    /// function and arrow expressions).
    Raw(RawNode),
    /// A value the restricted grammar cannot treat as data. Skipped during
    /// generation with no emission artifact.
    Unsupported(Location),
}

impl Node {
    pub fn loc(&self) -> Location {
        match self {
            Node::Object(n) => n.loc,
            Node::Array(n) => n.loc,
            Node::Scalar(n) => n.loc,
            Node::Raw(n) => n.loc,
            Node::Unsupported(loc) => *loc,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectNode {
    pub entries: Vec<Property>,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: Key,
    pub value: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    pub name: String,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayNode {
    pub items: Vec<Node>,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarNode {
    pub value: Scalar,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawNode {
    pub code: String,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    /// Numbers carry their raw source lexeme; evaluation and emission
    /// normalize through the parsed value.
    Number(String),
    Bool(bool),
    Null,
}

/// Evaluates a tree to a plain JSON value. Used by legacy mode, which
/// serializes the whole document once instead of walking it.
///
/// `Raw` and `Unsupported` nodes have no static value and evaluate to null.
pub fn static_value(node: &Node) -> Value {
    match node {
        Node::Object(object) => Value::Object(
            object
                .entries
                .iter()
                .map(|property| {
                    (
                        property.key.name.clone(),
                        static_value(&property.value),
                    )
                })
                .collect(),
        ),
        Node::Array(array) => Value::Array(array.items.iter().map(static_value).collect()),
        Node::Scalar(scalar) => scalar_value(&scalar.value),
        Node::Raw(_) | Node::Unsupported(_) => Value::Null,
    }
}

fn scalar_value(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Str(s) => Value::String(s.clone()),
        Scalar::Number(raw) => number_value(raw),
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::Null => Value::Null,
    }
}

/// The largest magnitude at which every integer is exactly representable
/// as a double, matching the range generated code can count on.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Converts a numeric lexeme to a JSON number, preferring integer
/// representation: integral floats within the safe range collapse to
/// integers, so `1e3` and `2.50` evaluate to `1000` and `2.5`.
/// Radix-prefixed JavaScript literals are widened to i64.
pub(crate) fn number_value(raw: &str) -> Value {
    let (negative, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let radix = if body.starts_with("0x") || body.starts_with("0X") {
        Some(16)
    } else if body.starts_with("0o") || body.starts_with("0O") {
        Some(8)
    } else if body.starts_with("0b") || body.starts_with("0B") {
        Some(2)
    } else {
        None
    };
    if let Some(radix) = radix {
        if let Ok(value) = i64::from_str_radix(&body[2..], radix) {
            return Value::Number(Number::from(if negative { -value } else { value }));
        }
    } else if let Ok(value) = raw.parse::<i64>() {
        return Value::Number(Number::from(value));
    } else if let Ok(value) = raw.parse::<f64>() {
        if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
            return Value::Number(Number::from(value as i64));
        }
        if let Some(number) = Number::from_f64(value) {
            return Value::Number(number);
        }
    }
    Value::Null
}

//! Caller-facing inputs accepted by builder operations.
//!
//! Builder methods take `impl Into<Term>`, so plain Rust values, variables,
//! dates and already-built ASTs can be mixed freely:
//!
//! ```text
//! q.triple("v:Person", "type", "@schema:Person")?
//!  .triple(Var::new("Person"), "age", 42)?
//! ```

use rust_decimal::Decimal;
use serde_json::{Map, Value, json};
use std::fmt;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339};

/// A heterogeneous argument before slot coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// A bare string. `v:` prefixed strings name variables.
    Str(String),
    /// Text that always becomes a string literal, never a node or variable.
    Text(String),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Bool(bool),
    /// An ISO-8601 date-time.
    DateTime(String),
    Var(String),
    /// An already serialized subtree or `{"@type", "@value"}` literal.
    Ast(Value),
    List(Vec<Term>),
    Null,
}

impl Term {
    /// Forces a string literal from anything printable.
    pub fn text(value: impl fmt::Display) -> Self {
        Term::Text(value.to_string())
    }

    /// Anything that can serialize itself into a query subtree.
    pub fn ast(value: &impl ToAst) -> Self {
        Term::Ast(value.to_ast())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Term::Null)
    }

    /// Variable name when the term refers to one.
    pub fn variable_name(&self) -> Option<&str> {
        match self {
            Term::Var(name) => Some(name),
            Term::Str(s) => s.strip_prefix("v:"),
            _ => None,
        }
    }
}

/// Capability of producing a finished query subtree.
pub trait ToAst {
    fn to_ast(&self) -> Value;
}

impl ToAst for Value {
    fn to_ast(&self) -> Value {
        self.clone()
    }
}

/// The four value slots and their wire discriminators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Node,
    Value,
    Data,
    Arithmetic,
}

impl SlotKind {
    pub fn discriminator(self) -> &'static str {
        match self {
            SlotKind::Node => "NodeValue",
            SlotKind::Value => "Value",
            SlotKind::Data => "DataValue",
            SlotKind::Arithmetic => "ArithmeticValue",
        }
    }
}

/// A query variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var(String);

impl Var {
    /// Accepts both `"Name"` and `"v:Name"`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.strip_prefix("v:") {
            Some(stripped) => Var(stripped.to_string()),
            None => Var(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v:{}", self.0)
    }
}

/// Builds several variables at once.
pub fn vars(names: &[&str]) -> Vec<Var> {
    names.iter().map(|n| Var::new(*n)).collect()
}

/// A typed literal, e.g. `literal("1", "integer")`.
///
/// Types without a prefix are taken from `xsd:`.
pub fn literal(value: impl Into<Value>, datatype: &str) -> Term {
    let datatype = if datatype.contains(':') {
        datatype.to_string()
    } else {
        format!("xsd:{}", datatype)
    };
    Term::Ast(json!({"@type": datatype, "@value": value.into()}))
}

pub fn string(value: impl Into<String>) -> Term {
    literal(value.into(), "xsd:string")
}

pub fn boolean(value: bool) -> Term {
    literal(value, "xsd:boolean")
}

pub fn datetime(value: PrimitiveDateTime) -> Term {
    Term::from(value)
}

/// An explicit node reference.
pub fn iri(name: impl Into<String>) -> Term {
    Term::Ast(json!({"@type": "NodeValue", "node": name.into()}))
}

fn iso_datetime(value: PrimitiveDateTime) -> String {
    let formatted = if value.microsecond() == 0 {
        value.format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second]"
        ))
    } else {
        value.format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]"
        ))
    };
    formatted.unwrap_or_else(|_| value.to_string())
}

impl From<&str> for Term {
    fn from(value: &str) -> Self {
        Term::Str(value.to_string())
    }
}

impl From<String> for Term {
    fn from(value: String) -> Self {
        Term::Str(value)
    }
}

impl From<&String> for Term {
    fn from(value: &String) -> Self {
        Term::Str(value.clone())
    }
}

impl From<i32> for Term {
    fn from(value: i32) -> Self {
        Term::Int(value.into())
    }
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Term::Int(value)
    }
}

impl From<u32> for Term {
    fn from(value: u32) -> Self {
        Term::Int(value.into())
    }
}

impl From<f32> for Term {
    fn from(value: f32) -> Self {
        Term::Float(value.into())
    }
}

impl From<f64> for Term {
    fn from(value: f64) -> Self {
        Term::Float(value)
    }
}

impl From<Decimal> for Term {
    fn from(value: Decimal) -> Self {
        Term::Decimal(value)
    }
}

impl From<bool> for Term {
    fn from(value: bool) -> Self {
        Term::Bool(value)
    }
}

impl From<Date> for Term {
    fn from(value: Date) -> Self {
        Term::DateTime(iso_datetime(value.midnight()))
    }
}

impl From<PrimitiveDateTime> for Term {
    fn from(value: PrimitiveDateTime) -> Self {
        Term::DateTime(iso_datetime(value))
    }
}

impl From<OffsetDateTime> for Term {
    fn from(value: OffsetDateTime) -> Self {
        Term::DateTime(value.format(&Rfc3339).unwrap_or_else(|_| value.to_string()))
    }
}

impl From<Var> for Term {
    fn from(value: Var) -> Self {
        Term::Var(value.0)
    }
}

impl From<&Var> for Term {
    fn from(value: &Var) -> Self {
        Term::Var(value.0.clone())
    }
}

impl From<Value> for Term {
    fn from(value: Value) -> Self {
        Term::Ast(value)
    }
}

impl<T: Into<Term>> From<Vec<T>> for Term {
    fn from(value: Vec<T>) -> Self {
        Term::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Term>, const N: usize> From<[T; N]> for Term {
    fn from(value: [T; N]) -> Self {
        Term::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Term>> From<Option<T>> for Term {
    fn from(value: Option<T>) -> Self {
        value.map_or(Term::Null, Into::into)
    }
}

impl From<&Doc> for Term {
    fn from(value: &Doc) -> Self {
        Term::Ast(value.to_ast())
    }
}

impl From<Doc> for Term {
    fn from(value: Doc) -> Self {
        Term::Ast(value.to_ast())
    }
}

/// Document content to be written by the document operations.
///
/// Objects become dictionary templates, arrays become value lists and
/// `v:` strings become variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Doc(Value);

impl Doc {
    pub fn new(content: impl Into<Value>) -> Self {
        Doc(content.into())
    }

    pub fn content(&self) -> &Value {
        &self.0
    }
}

fn encode_doc(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Bool(b) => json!({"@type": "Value", "data": {"@type": "xsd:boolean", "@value": b}}),
        Value::Number(n) => {
            let datatype = if n.is_f64() { "xsd:decimal" } else { "xsd:integer" };
            json!({"@type": "Value", "data": {"@type": datatype, "@value": n}})
        }
        Value::String(s) => match s.strip_prefix("v:") {
            Some(name) => json!({"@type": "Value", "variable": name}),
            None => json!({"@type": "Value", "data": {"@type": "xsd:string", "@value": s}}),
        },
        Value::Array(items) => json!({
            "@type": "Value",
            "list": items.iter().map(encode_doc).collect::<Vec<_>>(),
        }),
        Value::Object(map) => {
            let pairs: Vec<Value> = map
                .iter()
                .map(|(field, v)| {
                    json!({"@type": "FieldValuePair", "field": field, "value": encode_doc(v)})
                })
                .collect();
            let mut template = Map::new();
            template.insert("@type".into(), "DictionaryTemplate".into());
            template.insert("data".into(), Value::Array(pairs));
            json!({"@type": "Value", "dictionary": template})
        }
    }
}

impl ToAst for Doc {
    fn to_ast(&self) -> Value {
        encode_doc(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_var_strips_prefix() {
        assert_eq!(Var::new("v:X").name(), "X");
        assert_eq!(Var::new("X").to_string(), "v:X");
    }

    #[test]
    fn test_dates_render_iso() {
        assert_eq!(
            Term::from(datetime!(2025-01-01 12:00:00)),
            Term::DateTime("2025-01-01T12:00:00".into())
        );
        assert_eq!(
            Term::from(date!(2024-02-29)),
            Term::DateTime("2024-02-29T00:00:00".into())
        );
    }

    #[test]
    fn test_option_none_is_null() {
        assert!(Term::from(None::<i64>).is_null());
    }

    #[test]
    fn test_literal_defaults_prefix() {
        assert_eq!(
            literal("1", "integer"),
            Term::Ast(json!({"@type": "xsd:integer", "@value": "1"}))
        );
    }
}

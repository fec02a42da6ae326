//! Normalization of [`Term`] arguments into slot-tagged value wrappers.

use crate::error::{Result, WoqlError};
use crate::value::{SlotKind, Term};
use crate::vocab::Vocabulary;
use serde_json::{Map, Number, Value, json};

/// A coerced argument, before it is tagged with its slot discriminator.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueWrapper {
    Variable(String),
    NodeReference(String),
    /// A `{"@type": datatype, "@value": value}` literal.
    Literal(Value),
    List(Vec<ValueWrapper>),
    /// A subtree that was already serialized and is passed through as is.
    Raw(Value),
}

impl ValueWrapper {
    pub fn literal(datatype: &str, value: impl Into<Value>) -> Self {
        ValueWrapper::Literal(json!({"@type": datatype, "@value": value.into()}))
    }

    /// Datatype of a literal wrapper.
    pub fn datatype(&self) -> Option<&str> {
        match self {
            ValueWrapper::Literal(v) => v.get("@type").and_then(Value::as_str),
            _ => None,
        }
    }

    pub fn to_json(&self, slot: SlotKind) -> Value {
        let tag = slot.discriminator();
        match self {
            ValueWrapper::Variable(name) => json!({"@type": tag, "variable": name}),
            ValueWrapper::NodeReference(iri) => json!({"@type": tag, "node": iri}),
            ValueWrapper::Literal(data) => json!({"@type": tag, "data": data}),
            ValueWrapper::List(items) => json!({
                "@type": tag,
                "list": items.iter().map(|i| i.to_json(slot)).collect::<Vec<_>>(),
            }),
            ValueWrapper::Raw(value) => value.clone(),
        }
    }
}

fn default_datatype(term: &Term) -> &'static str {
    match term {
        Term::Int(_) => "xsd:integer",
        Term::Float(_) | Term::Decimal(_) => "xsd:decimal",
        Term::Bool(_) => "xsd:boolean",
        Term::DateTime(_) => "xsd:dateTime",
        _ => "xsd:string",
    }
}

fn float_value(f: f64) -> Value {
    Number::from_f64(f)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(f.to_string()))
}

/// Coerces arguments on behalf of one operation so errors can name it.
#[derive(Debug, Clone, Copy)]
pub struct Coercer<'a> {
    vocab: &'a Vocabulary,
    operation: &'static str,
}

impl<'a> Coercer<'a> {
    pub fn new(vocab: &'a Vocabulary, operation: &'static str) -> Self {
        Coercer { vocab, operation }
    }

    pub fn error(&self, field: &'static str, message: impl Into<String>) -> WoqlError {
        WoqlError::parameter(self.operation, field, message)
    }

    /// Coerces `term` for `slot`, applying `target` as the literal type
    /// when one is given.
    pub fn wrap(
        &self,
        slot: SlotKind,
        field: &'static str,
        term: Term,
        target: Option<&str>,
    ) -> Result<ValueWrapper> {
        let datatype = target
            .map(str::to_string)
            .unwrap_or_else(|| default_datatype(&term).to_string());

        match term {
            Term::Null => Err(self.error(field, "a value is required")),
            Term::Var(name) => Ok(ValueWrapper::Variable(name)),
            Term::Str(s) => {
                if let Some(name) = s.strip_prefix("v:") {
                    return Ok(ValueWrapper::Variable(name.to_string()));
                }
                let names_node = match slot {
                    SlotKind::Node => true,
                    SlotKind::Value => s.contains(':') || self.vocab.contains(&s),
                    SlotKind::Data | SlotKind::Arithmetic => false,
                };
                if names_node {
                    Ok(ValueWrapper::NodeReference(self.vocab.expand(&s)))
                } else {
                    Ok(ValueWrapper::literal(&datatype, s))
                }
            }
            Term::Text(s) => Ok(ValueWrapper::literal(&datatype, s)),
            Term::Int(i) => Ok(ValueWrapper::literal(&datatype, i)),
            Term::Float(f) => Ok(ValueWrapper::literal(&datatype, float_value(f))),
            Term::Decimal(d) => Ok(ValueWrapper::literal(&datatype, d.to_string())),
            Term::Bool(b) => Ok(ValueWrapper::literal(&datatype, b)),
            Term::DateTime(s) => Ok(ValueWrapper::literal(&datatype, s)),
            Term::Ast(Value::Object(map)) if map.contains_key("@value") => {
                Ok(ValueWrapper::Literal(typed_literal(map, target)))
            }
            Term::Ast(value) => Ok(ValueWrapper::Raw(value)),
            Term::List(items) => {
                if slot == SlotKind::Node {
                    return Err(self.error(field, "a node reference cannot be a list"));
                }
                items
                    .into_iter()
                    .map(|item| self.wrap(slot, field, item, target))
                    .collect::<Result<Vec<_>>>()
                    .map(ValueWrapper::List)
            }
        }
    }

    pub fn node(&self, field: &'static str, term: impl Into<Term>) -> Result<Value> {
        Ok(self.wrap(SlotKind::Node, field, term.into(), None)?.to_json(SlotKind::Node))
    }

    pub fn value(&self, field: &'static str, term: impl Into<Term>) -> Result<Value> {
        Ok(self.wrap(SlotKind::Value, field, term.into(), None)?.to_json(SlotKind::Value))
    }

    pub fn data(&self, field: &'static str, term: impl Into<Term>) -> Result<Value> {
        Ok(self.wrap(SlotKind::Data, field, term.into(), None)?.to_json(SlotKind::Data))
    }

    /// Data slot with an explicit literal type.
    pub fn typed_data(&self, field: &'static str, term: impl Into<Term>, datatype: &str) -> Result<Value> {
        Ok(self
            .wrap(SlotKind::Data, field, term.into(), Some(datatype))?
            .to_json(SlotKind::Data))
    }

    pub fn arithmetic(&self, field: &'static str, term: impl Into<Term>) -> Result<Value> {
        Ok(self
            .wrap(SlotKind::Arithmetic, field, term.into(), None)?
            .to_json(SlotKind::Arithmetic))
    }

    /// Node slot for subject, predicate and similar positions, which only
    /// accept identifiers, variables or prebuilt nodes.
    pub fn identifier(&self, field: &'static str, label: &str, term: impl Into<Term>) -> Result<Value> {
        let term = term.into();
        match term {
            Term::Str(_) | Term::Var(_) | Term::Ast(Value::Object(_)) => self.node(field, term),
            _ => Err(self.error(field, format!("{} must be a URI string", label))),
        }
    }

    /// A bare variable name, for select lists and group templates.
    pub fn variable_name(&self, field: &'static str, term: impl Into<Term>) -> Result<String> {
        match term.into() {
            Term::Var(name) => Ok(name),
            Term::Str(s) => Ok(s.strip_prefix("v:").unwrap_or(&s).to_string()),
            other => Err(self.error(field, format!("expected a variable name, got {:?}", other))),
        }
    }

    /// A non-empty plain string such as a graph or collection descriptor.
    pub fn descriptor(&self, field: &'static str, value: &str) -> Result<String> {
        if value.trim().is_empty() {
            Err(self.error(field, "a non-empty string is required"))
        } else {
            Ok(value.to_string())
        }
    }
}

fn typed_literal(mut map: Map<String, Value>, target: Option<&str>) -> Value {
    if !map.contains_key("@type") {
        let datatype = target.unwrap_or("xsd:string");
        map.insert("@type".into(), Value::String(datatype.into()));
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_vocab<T>(f: impl FnOnce(Coercer<'_>) -> T) -> T {
        let vocab = Vocabulary::default();
        f(Coercer::new(&vocab, "test"))
    }

    #[test]
    fn test_value_slot_string_rules() {
        with_vocab(|c| {
            assert_eq!(
                c.value("object", "type").unwrap(),
                json!({"@type": "Value", "node": "rdf:type"})
            );
            assert_eq!(
                c.value("object", "doc:Person").unwrap(),
                json!({"@type": "Value", "node": "doc:Person"})
            );
            assert_eq!(
                c.value("object", "hello").unwrap(),
                json!({"@type": "Value", "data": {"@type": "xsd:string", "@value": "hello"}})
            );
        });
    }

    #[test]
    fn test_identifier_rejects_numbers() {
        with_vocab(|c| {
            let err = c.identifier("subject", "Subject", 123).unwrap_err();
            assert!(err.to_string().contains("Subject must be a URI string"));
        });
    }
}

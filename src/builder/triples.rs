use super::{Subquery, WoqlQuery};
use crate::ast::PathPattern;
use crate::error::{Result, WoqlError};
use crate::params::Operation;
use crate::parser::compile_path_pattern;
use crate::value::Term;
use serde_json::Value;

type Fields = Vec<(&'static str, Value)>;

impl WoqlQuery {
    fn triple_fields(&self, op: Operation, s: Term, p: Term, o: Term) -> Result<Fields> {
        let c = self.coercer(op);
        Ok(vec![
            ("subject", c.identifier("subject", "Subject", s)?),
            ("predicate", c.identifier("predicate", "Predicate", p)?),
            ("object", c.value("object", o)?),
        ])
    }

    fn quad_fields(&self, op: Operation, s: Term, p: Term, o: Term, graph: &str) -> Result<Fields> {
        if graph.trim().is_empty() {
            return Err(WoqlError::parameter(
                op.name(),
                "graph",
                "Quad takes four parameters, the last should be a graph filter",
            ));
        }
        let mut fields = self.triple_fields(op, s, p, o)?;
        fields.push(("graph", Value::String(graph.to_string())));
        Ok(fields)
    }

    fn emit_triple(
        mut self,
        op: Operation,
        s: impl Into<Term>,
        p: impl Into<Term>,
        o: impl Into<Term>,
    ) -> Result<Self> {
        let fields = self.triple_fields(op, s.into(), p.into(), o.into())?;
        self.write(op, fields);
        Ok(self)
    }

    fn emit_quad(
        mut self,
        op: Operation,
        s: impl Into<Term>,
        p: impl Into<Term>,
        o: impl Into<Term>,
        graph: &str,
    ) -> Result<Self> {
        let fields = self.quad_fields(op, s.into(), p.into(), o.into(), graph)?;
        self.write(op, fields);
        Ok(self)
    }

    /// Matches `subject predicate object` in the default graph.
    pub fn triple(self, s: impl Into<Term>, p: impl Into<Term>, o: impl Into<Term>) -> Result<Self> {
        self.emit_triple(Operation::Triple, s, p, o)
    }

    /// Matches triples added by the commit being inspected.
    pub fn added_triple(self, s: impl Into<Term>, p: impl Into<Term>, o: impl Into<Term>) -> Result<Self> {
        self.emit_triple(Operation::AddedTriple, s, p, o)
    }

    /// Matches triples removed by the commit being inspected.
    pub fn removed_triple(self, s: impl Into<Term>, p: impl Into<Term>, o: impl Into<Term>) -> Result<Self> {
        self.emit_triple(Operation::RemovedTriple, s, p, o)
    }

    pub fn quad(self, s: impl Into<Term>, p: impl Into<Term>, o: impl Into<Term>, graph: &str) -> Result<Self> {
        self.emit_quad(Operation::Quad, s, p, o, graph)
    }

    pub fn added_quad(self, s: impl Into<Term>, p: impl Into<Term>, o: impl Into<Term>, graph: &str) -> Result<Self> {
        self.emit_quad(Operation::AddedQuad, s, p, o, graph)
    }

    pub fn removed_quad(self, s: impl Into<Term>, p: impl Into<Term>, o: impl Into<Term>, graph: &str) -> Result<Self> {
        self.emit_quad(Operation::RemovedQuad, s, p, o, graph)
    }

    pub fn add_triple(self, s: impl Into<Term>, p: impl Into<Term>, o: impl Into<Term>) -> Result<Self> {
        self.emit_triple(Operation::AddTriple, s, p, o)
    }

    pub fn add_quad(self, s: impl Into<Term>, p: impl Into<Term>, o: impl Into<Term>, graph: &str) -> Result<Self> {
        self.emit_quad(Operation::AddQuad, s, p, o, graph)
    }

    pub fn delete_triple(self, s: impl Into<Term>, p: impl Into<Term>, o: impl Into<Term>) -> Result<Self> {
        self.emit_triple(Operation::DeleteTriple, s, p, o)
    }

    pub fn delete_quad(self, s: impl Into<Term>, p: impl Into<Term>, o: impl Into<Term>, graph: &str) -> Result<Self> {
        self.emit_quad(Operation::DeleteQuad, s, p, o, graph)
    }

    /// Replaces whatever object `subject predicate` currently has with
    /// `new_object`.
    pub fn update_triple(
        self,
        subject: impl Into<Term>,
        predicate: impl Into<Term>,
        new_object: impl Into<Term>,
    ) -> Result<Self> {
        let (s, p, o) = (subject.into(), predicate.into(), new_object.into());
        let replace = self
            .child()
            .triple(s.clone(), p.clone(), "v:AnyObject")?
            .delete_triple(s.clone(), p.clone(), "v:AnyObject")?
            .not(Subquery::Chain)?
            .triple(s.clone(), p.clone(), o.clone())?;
        let optional = self.child().opt(replace)?;
        let add = self.child().add_triple(s, p, o)?;
        self.and([optional, add])
    }

    /// [`update_triple`](Self::update_triple) restricted to `graph`.
    pub fn update_quad(
        self,
        subject: impl Into<Term>,
        predicate: impl Into<Term>,
        new_object: impl Into<Term>,
        graph: &str,
    ) -> Result<Self> {
        let (s, p, o) = (subject.into(), predicate.into(), new_object.into());
        let replace = self
            .child()
            .quad(s.clone(), p.clone(), "v:AnyObject", graph)?
            .delete_quad(s.clone(), p.clone(), "v:AnyObject", graph)?
            .not(Subquery::Chain)?
            .quad(s.clone(), p.clone(), o.clone(), graph)?;
        let optional = self.child().opt(replace)?;
        let add = self.child().add_quad(s, p, o, graph)?;
        self.and([optional, add])
    }

    /// Every triple, bound to `v:Subject`, `v:Predicate` and `v:Object`,
    /// optionally restricted to `graph`.
    pub fn star(self, graph: Option<&str>) -> Result<Self> {
        match graph {
            Some(graph) => self.emit_quad(Operation::Star, "v:Subject", "v:Predicate", "v:Object", graph),
            None => self.emit_triple(Operation::Star, "v:Subject", "v:Predicate", "v:Object"),
        }
    }

    pub fn all(self, graph: Option<&str>) -> Result<Self> {
        self.star(graph)
    }

    /// Follows the path pattern from `subject` to `object`. The `path`
    /// variable, when not null, receives the edges traversed.
    pub fn path(
        self,
        subject: impl Into<Term>,
        pattern: &str,
        object: impl Into<Term>,
        path: impl Into<Term>,
    ) -> Result<Self> {
        let compiled = compile_path_pattern(pattern)?;
        self.path_pattern(subject, compiled, object, path)
    }

    /// [`path`](Self::path) with an already compiled pattern.
    pub fn path_pattern(
        mut self,
        subject: impl Into<Term>,
        pattern: PathPattern,
        object: impl Into<Term>,
        path: impl Into<Term>,
    ) -> Result<Self> {
        let op = Operation::Path;
        let pattern = if self.expand_path_predicates {
            pattern.map_predicates(&|name: String| self.vocab.expand(&name))
        } else {
            pattern
        };

        let c = self.coercer(op);
        let mut fields = vec![
            ("subject", c.identifier("subject", "Subject", subject)?),
            ("pattern", pattern.to_json()),
            ("object", c.value("object", object)?),
        ];
        let path = path.into();
        if !path.is_null() {
            fields.push(("path", c.value("path", path)?));
        }
        self.write(op, fields);
        Ok(self)
    }

    /// Size in bytes of the graph `resource`.
    pub fn size(mut self, resource: &str, size: impl Into<Term>) -> Result<Self> {
        let op = Operation::Size;
        let c = self.coercer(op);
        let fields = vec![
            ("resource", Value::String(c.descriptor("resource", resource)?)),
            ("size", c.data("size", size)?),
        ];
        self.write(op, fields);
        Ok(self)
    }

    pub fn triple_count(mut self, resource: &str, count: impl Into<Term>) -> Result<Self> {
        let op = Operation::TripleCount;
        let c = self.coercer(op);
        let fields = vec![
            ("resource", Value::String(c.descriptor("resource", resource)?)),
            ("triple_count", c.data("triple_count", count)?),
        ];
        self.write(op, fields);
        Ok(self)
    }

    /// `child` is `parent` or one of its subclasses.
    pub fn subsumption(mut self, parent: impl Into<Term>, child: impl Into<Term>) -> Result<Self> {
        let op = Operation::Subsumption;
        let c = self.coercer(op);
        let fields = vec![("parent", c.node("parent", parent)?), ("child", c.node("child", child)?)];
        self.write(op, fields);
        Ok(self)
    }

    pub fn isa(mut self, element: impl Into<Term>, class: impl Into<Term>) -> Result<Self> {
        let op = Operation::IsA;
        let c = self.coercer(op);
        let fields = vec![("element", c.node("element", element)?), ("type", c.node("type", class)?)];
        self.write(op, fields);
        Ok(self)
    }

    pub fn type_of(mut self, value: impl Into<Term>, datatype: impl Into<Term>) -> Result<Self> {
        let op = Operation::TypeOf;
        let c = self.coercer(op);
        let fields = vec![("value", c.value("value", value)?), ("type", c.node("type", datatype)?)];
        self.write(op, fields);
        Ok(self)
    }

    /// Casts `value` to `datatype`, binding the converted value to `result`.
    pub fn typecast(
        mut self,
        value: impl Into<Term>,
        datatype: impl Into<Term>,
        result: impl Into<Term>,
    ) -> Result<Self> {
        let op = Operation::Typecast;
        let c = self.coercer(op);
        let fields = vec![
            ("value", c.value("value", value)?),
            ("type", c.node("type", datatype)?),
            ("result", c.value("result", result)?),
        ];
        self.write(op, fields);
        Ok(self)
    }
}

//! Fluent construction of WOQL query ASTs.
//!
//! A [`WoqlQuery`] owns an arena-backed tree and a cursor into it. Every
//! operation writes at the cursor:
//!
//! - when the cursor already holds a node from an earlier call, that node
//!   is moved into a fresh `And` and the new operation fills the next
//!   child, so `triple(..).triple(..)` builds a two-element conjunction
//! - operations hosting a sub-query take a [`Subquery`]; passing
//!   [`Subquery::Chain`] moves the cursor into the empty nested slot so the
//!   following calls populate it, e.g. `select(["X"], Subquery::Chain)?.triple(..)`
//!
//! Operations are grouped by family in the submodules.

mod control;
mod data;
mod documents;
mod triples;

pub use control::{Order, OrderTemplate};

use crate::ast::{Field, NodeId, QueryArena, QueryNode};
use crate::coerce::Coercer;
use crate::config::WoqlConfig;
use crate::error::{Result, WoqlError};
use crate::params::Operation;
use crate::taint;
use crate::value::{Term, ToAst};
use crate::vocab::Vocabulary;
use serde_json::Value;

/// The nested query handed to an operation that hosts one.
#[derive(Debug, Clone)]
pub enum Subquery {
    /// No sub-query yet: subsequent calls are written inside it.
    Chain,
    Query(WoqlQuery),
    /// The unconditional-success marker `{"@type": "True"}`.
    True,
    /// An already serialized query node.
    Ast(Value),
}

impl From<WoqlQuery> for Subquery {
    fn from(query: WoqlQuery) -> Self {
        Subquery::Query(query)
    }
}

impl From<&WoqlQuery> for Subquery {
    fn from(query: &WoqlQuery) -> Self {
        Subquery::Query(query.clone())
    }
}

impl From<Value> for Subquery {
    fn from(value: Value) -> Self {
        Subquery::Ast(value)
    }
}

impl From<Option<WoqlQuery>> for Subquery {
    fn from(query: Option<WoqlQuery>) -> Self {
        query.map_or(Subquery::Chain, Subquery::Query)
    }
}

/// A query under construction.
#[derive(Debug, Clone)]
pub struct WoqlQuery {
    arena: QueryArena,
    root: NodeId,
    cursor: NodeId,
    vocab: Vocabulary,
    expand_path_predicates: bool,
    /// The `And` whose last conjunct is the cursor, while chaining.
    conjunction: Option<NodeId>,
}

impl Default for WoqlQuery {
    fn default() -> Self {
        Self::with_vocabulary(Vocabulary::default())
    }
}

impl WoqlQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vocabulary(vocab: Vocabulary) -> Self {
        let mut arena = QueryArena::new();
        let root = arena.alloc(QueryNode::default());
        WoqlQuery {
            arena,
            root,
            cursor: root,
            vocab,
            expand_path_predicates: true,
            conjunction: None,
        }
    }

    pub fn with_config(config: &WoqlConfig) -> Self {
        let mut query = Self::with_vocabulary(config.vocabulary());
        query.expand_path_predicates = config.expand_path_predicates;
        query
    }

    /// Continues building on top of an existing serialized query.
    pub fn from_json(ast: &Value) -> Result<Self> {
        let map = ast.as_object().ok_or_else(|| {
            WoqlError::parameter("from_json", "query", "a query must be a JSON object")
        })?;
        let mut query = Self::new();
        let root = query.arena.import(map);
        query.root = root;
        query.move_cursor(root);
        Ok(query)
    }

    /// An empty builder sharing this one's vocabulary and settings.
    pub fn child(&self) -> Self {
        let mut query = Self::with_vocabulary(self.vocab.clone());
        query.expand_path_predicates = self.expand_path_predicates;
        query
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Adds short-name mappings used by later calls on this builder.
    pub fn extend_vocabulary<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vocab.extend(entries);
        self
    }

    /// Ordered field names written by the operation called `name`.
    pub fn describe_parameters(name: &str) -> Option<&'static [&'static str]> {
        Operation::from_name(name).map(Operation::parameters)
    }

    pub fn is_empty(&self) -> bool {
        self.arena.node(self.root).is_empty()
    }

    /// The serialized query with single-child conjunctions and empty
    /// sub-queries rolled up.
    pub fn to_json(&self) -> Value {
        self.arena
            .rollup(self.root)
            .unwrap_or_else(|| Value::Object(Default::default()))
    }

    /// The tree exactly as built, without rollup.
    pub fn to_raw_json(&self) -> Value {
        self.arena.export(self.root)
    }

    /// The node currently under the cursor.
    pub fn cursor_json(&self) -> Value {
        self.arena.export(self.cursor)
    }

    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    pub fn to_json_pretty(&self) -> String {
        format!("{:#}", self.to_json())
    }

    /// Whether any operation in the query writes to the database.
    pub fn contains_update(&self) -> bool {
        taint::contains_update(&self.to_raw_json())
    }

    pub(crate) fn coercer(&self, op: Operation) -> Coercer<'_> {
        Coercer::new(&self.vocab, op.name())
    }

    /// Moves existing cursor content into an `And` and points the cursor
    /// at a new empty child. Repeated chaining keeps extending the same
    /// `And`.
    fn wrap_cursor_with_and(&mut self) {
        let cursor = self.cursor;
        let next = self.arena.alloc(QueryNode::default());
        let extended = match self.conjunction {
            Some(and) if self.arena.node(and).children("and").last() == Some(&cursor) => and,
            _ if self.arena.node(cursor).is_kind("And") => cursor,
            _ => {
                let captured = self.arena.take(cursor);
                tracing::debug!(kind = ?captured.kind, "implicit conjunction");
                let first = self.arena.alloc(captured);
                let mut and = QueryNode::new("And");
                and.set("and", Field::Queries(Vec::new()));
                *self.arena.node_mut(cursor) = and;
                self.push_conjunct(cursor, first);
                cursor
            }
        };
        self.push_conjunct(extended, next);
        self.conjunction = Some(extended);
        self.cursor = next;
    }

    fn push_conjunct(&mut self, and: NodeId, child: NodeId) {
        let node = self.arena.node_mut(and);
        if let Some(Field::Queries(children)) = node.fields.get_mut("and") {
            children.push(child);
        } else {
            node.set("and", Field::Queries(vec![child]));
        }
    }

    /// Points the cursor somewhere other than a conjunct.
    fn move_cursor(&mut self, to: NodeId) {
        self.cursor = to;
        self.conjunction = None;
    }

    /// Writes `op` with `fields` at the cursor.
    pub(crate) fn write(&mut self, op: Operation, fields: Vec<(&'static str, Value)>) {
        if self.arena.node(self.cursor).kind.is_some() {
            self.wrap_cursor_with_and();
        }
        let node = self.arena.node_mut(self.cursor);
        node.kind = Some(op.discriminator().to_string());
        for (key, value) in fields {
            node.set(key, Field::Value(value));
        }
    }

    /// Stores `sub` as a node in this arena. `Chain` yields a new empty node.
    fn attach(&mut self, op: Operation, field: &'static str, sub: Subquery) -> Result<NodeId> {
        let id = match sub {
            Subquery::Chain => self.arena.alloc(QueryNode::default()),
            Subquery::Query(query) => self.arena.graft(&query.arena, query.root),
            Subquery::True => self.arena.alloc(QueryNode::new("True")),
            Subquery::Ast(Value::Object(map)) => self.arena.import(&map),
            Subquery::Ast(other) => {
                return Err(WoqlError::parameter(
                    op.name(),
                    field,
                    format!("expected a query object, got {}", other),
                ));
            }
        };
        Ok(id)
    }

    /// Places `sub` under `field` of the node at the cursor. A chained
    /// sub-query moves the cursor into it.
    pub(crate) fn embed(&mut self, op: Operation, field: &'static str, sub: Subquery) -> Result<()> {
        let chained = matches!(sub, Subquery::Chain);
        let host = self.cursor;
        let child = self.attach(op, field, sub)?;
        self.arena.node_mut(host).set(field, Field::Query(child));
        if chained {
            tracing::debug!(operation = op.name(), field, "cursor moved into sub-query");
            self.move_cursor(child);
        }
        Ok(())
    }

    /// Writes `op` and embeds its `query` field in one step.
    pub(crate) fn host(
        mut self,
        op: Operation,
        fields: Vec<(&'static str, Value)>,
        sub: Subquery,
    ) -> Result<Self> {
        self.write(op, fields);
        self.embed(op, "query", sub)?;
        Ok(self)
    }
}

impl ToAst for WoqlQuery {
    fn to_ast(&self) -> Value {
        self.to_json()
    }
}

impl From<WoqlQuery> for Term {
    fn from(query: WoqlQuery) -> Self {
        Term::Ast(query.to_json())
    }
}

impl From<&WoqlQuery> for Term {
    fn from(query: &WoqlQuery) -> Self {
        Term::Ast(query.to_json())
    }
}

impl std::fmt::Display for WoqlQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

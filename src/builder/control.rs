use super::{Subquery, WoqlQuery};
use crate::ast::{Field, NodeId, QueryNode};
use crate::error::{Result, WoqlError};
use crate::params::Operation;
use crate::value::Term;
use serde_json::{Value, json};
use std::ops::{BitAnd, BitOr};

/// Sort direction of an [`OrderTemplate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

/// One sort key of an `order_by`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTemplate {
    pub variable: String,
    pub order: Order,
}

impl OrderTemplate {
    pub fn asc(variable: impl AsRef<str>) -> Self {
        Self::new(variable, Order::Asc)
    }

    pub fn desc(variable: impl AsRef<str>) -> Self {
        Self::new(variable, Order::Desc)
    }

    pub fn new(variable: impl AsRef<str>, order: Order) -> Self {
        let variable = variable.as_ref();
        OrderTemplate {
            variable: variable.strip_prefix("v:").unwrap_or(variable).to_string(),
            order,
        }
    }

    fn to_json(&self) -> Value {
        json!({"@type": "OrderTemplate", "order": self.order.as_str(), "variable": self.variable})
    }
}

impl WoqlQuery {
    /// Appends `id` to the `key` list of `host`, splicing in the children
    /// of a nested node of the same combinator kind.
    fn push_child(&mut self, host: NodeId, op: Operation, id: NodeId) {
        let key = if op == Operation::And { "and" } else { "or" };
        let spliced = if self.arena.node(id).is_kind(op.discriminator()) {
            tracing::debug!(combinator = op.discriminator(), "flattening nested combinator");
            self.arena.node(id).children(key).to_vec()
        } else {
            vec![id]
        };
        let node = self.arena.node_mut(host);
        if let Some(Field::Queries(children)) = node.fields.get_mut(key) {
            children.extend(spliced);
        } else {
            node.set(key, Field::Queries(spliced));
        }
    }

    fn append_children<I>(&mut self, op: Operation, queries: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Subquery>,
    {
        let host = self.cursor;
        let key = if op == Operation::And { "and" } else { "or" };
        let mut chained = None;
        for sub in queries {
            let sub = sub.into();
            let is_chain = matches!(sub, Subquery::Chain);
            let id = self.attach(op, key, sub)?;
            self.push_child(host, op, id);
            if is_chain {
                chained = Some(id);
            }
        }
        if let Some(id) = chained {
            self.move_cursor(id);
        }
        Ok(())
    }

    /// Conjunction of `queries`. Existing cursor content becomes the first
    /// conjunct; with no arguments, later chained calls add conjuncts.
    pub fn and<I>(mut self, queries: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Subquery>,
    {
        let cursor = self.cursor;
        if !self.arena.node(cursor).is_kind("And") {
            let children = if self.arena.node(cursor).kind.is_some() {
                let captured = self.arena.take(cursor);
                vec![self.arena.alloc(captured)]
            } else {
                Vec::new()
            };
            let mut and = QueryNode::new("And");
            and.set("and", Field::Queries(children));
            *self.arena.node_mut(cursor) = and;
        }
        self.conjunction = None;
        self.append_children(Operation::And, queries)?;
        Ok(self)
    }

    /// Disjunction of `queries`, conjoined with any existing cursor content.
    pub fn or<I>(mut self, queries: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Subquery>,
    {
        self.write(Operation::Or, Vec::new());
        self.arena
            .node_mut(self.cursor)
            .set("or", Field::Queries(Vec::new()));
        self.append_children(Operation::Or, queries)?;
        Ok(self)
    }

    /// Joins whole builders under one combinator without any coercion.
    fn combine(mut self, op: Operation, parts: Vec<WoqlQuery>) -> Self {
        let host = self.root;
        let key = if op == Operation::And { "and" } else { "or" };
        let mut node = QueryNode::new(op.discriminator());
        node.set(key, Field::Queries(Vec::new()));
        *self.arena.node_mut(host) = node;
        for part in parts {
            let id = self.arena.graft(&part.arena, part.root);
            self.push_child(host, op, id);
        }
        self.move_cursor(host);
        self
    }

    pub fn not(self, query: impl Into<Subquery>) -> Result<Self> {
        self.host(Operation::Not, Vec::new(), query.into())
    }

    /// Succeeds whether or not `query` matches.
    pub fn opt(self, query: impl Into<Subquery>) -> Result<Self> {
        self.host(Operation::Optional, Vec::new(), query.into())
    }

    /// Only the first solution of `query`.
    pub fn once(self, query: impl Into<Subquery>) -> Result<Self> {
        self.host(Operation::Once, Vec::new(), query.into())
    }

    /// Runs the side effects of `query` outside of the transaction.
    pub fn immediately(self, query: impl Into<Subquery>) -> Result<Self> {
        self.host(Operation::Immediately, Vec::new(), query.into())
    }

    /// For each solution of `condition`, run `consequent`.
    ///
    /// A chained consequent receives the cursor; otherwise a chained
    /// condition does. At most one of the two may be chained.
    pub fn when(mut self, condition: impl Into<Subquery>, consequent: impl Into<Subquery>) -> Result<Self> {
        let op = Operation::When;
        let (condition, consequent) = (condition.into(), consequent.into());
        let condition_chained = matches!(condition, Subquery::Chain);
        let consequent_chained = matches!(consequent, Subquery::Chain);
        if condition_chained && consequent_chained {
            return Err(WoqlError::parameter(
                op.name(),
                "query",
                "the condition must be given when the consequent is chained",
            ));
        }

        self.write(op, Vec::new());
        let host = self.cursor;
        let query = self.attach(op, "query", condition)?;
        let then = self.attach(op, "consequent", consequent)?;
        let node = self.arena.node_mut(host);
        node.set("query", Field::Query(query));
        node.set("consequent", Field::Query(then));

        if consequent_chained {
            self.move_cursor(then);
        } else if condition_chained {
            self.move_cursor(query);
        }
        Ok(self)
    }

    fn variable_list<I>(&self, op: Operation, field: &'static str, vars: I) -> Result<Value>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        let c = self.coercer(op);
        let names = vars
            .into_iter()
            .map(|v| c.variable_name(field, v).map(Value::String))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Array(names))
    }

    /// Restricts the solutions of `query` to `vars`.
    pub fn select<I>(mut self, vars: I, query: impl Into<Subquery>) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        let variables = self.variable_list(Operation::Select, "variables", vars)?;
        self.write(Operation::Select, vec![("variables", variables)]);
        self.embed(Operation::Select, "query", query.into())?;
        Ok(self)
    }

    /// Drops solutions of `query` that repeat the bindings of `vars`.
    pub fn distinct<I>(mut self, vars: I, query: impl Into<Subquery>) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        let variables = self.variable_list(Operation::Distinct, "variables", vars)?;
        self.write(Operation::Distinct, vec![("variables", variables)]);
        self.embed(Operation::Distinct, "query", query.into())?;
        Ok(self)
    }

    pub fn limit(self, limit: u64, query: impl Into<Subquery>) -> Result<Self> {
        self.host(Operation::Limit, vec![("limit", Value::from(limit))], query.into())
    }

    pub fn start(self, start: u64, query: impl Into<Subquery>) -> Result<Self> {
        self.host(Operation::Start, vec![("start", Value::from(start))], query.into())
    }

    pub fn order_by<I>(self, ordering: I, query: impl Into<Subquery>) -> Result<Self>
    where
        I: IntoIterator<Item = OrderTemplate>,
    {
        let ordering: Vec<Value> = ordering.into_iter().map(|o| o.to_json()).collect();
        if ordering.is_empty() {
            return Err(WoqlError::parameter(
                Operation::OrderBy.name(),
                "ordering",
                "Order by must be passed at least one variable to order the query",
            ));
        }
        self.host(Operation::OrderBy, vec![("ordering", Value::Array(ordering))], query.into())
    }

    /// Groups the solutions of `query` by `group_by`, collecting the
    /// `template` variables of each group into `grouped`.
    pub fn group_by<I>(
        self,
        group_by: I,
        template: impl Into<Term>,
        grouped: impl Into<Term>,
        query: impl Into<Subquery>,
    ) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        let op = Operation::GroupBy;
        let group_by = self.variable_list(op, "group_by", group_by)?;
        let template = match template.into() {
            Term::List(items) => self.variable_list(op, "template", items)?,
            single => self.variable_list(op, "template", [single])?,
        };
        let grouped = self.coercer(op).value("grouped", grouped)?;
        self.host(
            op,
            vec![("group_by", group_by), ("template", template), ("grouped", grouped)],
            query.into(),
        )
    }

    /// Binds the number of solutions of `query` to `count`.
    pub fn count(self, count: impl Into<Term>, query: impl Into<Subquery>) -> Result<Self> {
        let count = self.coercer(Operation::Count).data("count", count)?;
        self.host(Operation::Count, vec![("count", count)], query.into())
    }

    /// Runs `query` against the graph `graph` (e.g. `"schema"`).
    pub fn from_graph(self, graph: &str, query: impl Into<Subquery>) -> Result<Self> {
        let graph = self.coercer(Operation::From).descriptor("graph", graph)?;
        self.host(Operation::From, vec![("graph", Value::String(graph))], query.into())
    }

    /// Writes the updates of `query` into `graph`.
    pub fn into_graph(self, graph: &str, query: impl Into<Subquery>) -> Result<Self> {
        let graph = self.coercer(Operation::Into).descriptor("graph", graph)?;
        self.host(Operation::Into, vec![("graph", Value::String(graph))], query.into())
    }

    /// Runs `query` against another collection such as `admin/people`.
    pub fn using(self, collection: &str, query: impl Into<Subquery>) -> Result<Self> {
        let collection = self.coercer(Operation::Using).descriptor("collection", collection)?;
        self.host(
            Operation::Using,
            vec![("collection", Value::String(collection))],
            query.into(),
        )
    }

    pub fn comment(self, text: &str, query: impl Into<Subquery>) -> Result<Self> {
        let comment = json!({"@type": "xsd:string", "@value": text});
        self.host(Operation::Comment, vec![("comment", comment)], query.into())
    }

    /// The query that always succeeds.
    pub fn truth(mut self) -> Self {
        self.write(Operation::True, Vec::new());
        self
    }
}

impl BitAnd for WoqlQuery {
    type Output = WoqlQuery;

    fn bitand(self, rhs: WoqlQuery) -> WoqlQuery {
        self.child().combine(Operation::And, vec![self, rhs])
    }
}

impl BitOr for WoqlQuery {
    type Output = WoqlQuery;

    fn bitor(self, rhs: WoqlQuery) -> WoqlQuery {
        self.child().combine(Operation::Or, vec![self, rhs])
    }
}

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Handle to a node inside a [`QueryArena`].
///
/// Handles are only minted by the arena, so indexing with one is always in
/// bounds for the arena that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A field value on a query node.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Value wrappers, literals, path patterns and other finished JSON.
    Value(Value),
    /// A nested sub-query (`query`, `consequent`).
    Query(NodeId),
    /// An ordered list of sub-queries (`and`, `or`).
    Queries(Vec<NodeId>),
}

/// One query node: an optional discriminator plus its fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryNode {
    pub kind: Option<String>,
    pub fields: BTreeMap<String, Field>,
}

impl QueryNode {
    pub fn new(kind: impl Into<String>) -> Self {
        QueryNode {
            kind: Some(kind.into()),
            fields: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.fields.is_empty()
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind.as_deref() == Some(kind)
    }

    pub fn set(&mut self, key: &str, field: Field) {
        self.fields.insert(key.to_string(), field);
    }

    /// Children stored under `key` when it holds a sub-query list.
    pub fn children(&self, key: &str) -> &[NodeId] {
        match self.fields.get(key) {
            Some(Field::Queries(ids)) => ids,
            _ => &[],
        }
    }
}

fn is_structural(kind: Option<&str>, key: &str) -> bool {
    match key {
        "query" | "consequent" => true,
        "and" => kind == Some("And"),
        "or" => kind == Some("Or"),
        _ => false,
    }
}

/// Index-addressed storage for a query tree under construction.
///
/// Nodes are never freed; a node detached by a rewrite simply stays
/// unreachable until the arena is dropped.
#[derive(Debug, Clone, Default)]
pub struct QueryArena {
    nodes: Vec<QueryNode>,
}

impl QueryArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, node: QueryNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> &QueryNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut QueryNode {
        &mut self.nodes[id.0]
    }

    /// Moves the node's content out, leaving an empty node in its slot.
    pub fn take(&mut self, id: NodeId) -> QueryNode {
        std::mem::take(&mut self.nodes[id.0])
    }

    /// Deep-copies the subtree rooted at `id` in `other` into this arena.
    pub fn graft(&mut self, other: &QueryArena, id: NodeId) -> NodeId {
        let source = other.node(id);
        let mut node = QueryNode {
            kind: source.kind.clone(),
            fields: BTreeMap::new(),
        };
        for (key, field) in &source.fields {
            let copied = match field {
                Field::Value(v) => Field::Value(v.clone()),
                Field::Query(child) => Field::Query(self.graft(other, *child)),
                Field::Queries(children) => {
                    Field::Queries(children.iter().map(|c| self.graft(other, *c)).collect())
                }
            };
            node.fields.insert(key.clone(), copied);
        }
        self.alloc(node)
    }

    /// Loads an already serialized query node, splitting out the
    /// sub-query fields so chaining can continue inside them.
    pub fn import(&mut self, map: &Map<String, Value>) -> NodeId {
        let kind = map.get("@type").and_then(Value::as_str).map(str::to_string);
        let mut node = QueryNode {
            kind,
            fields: BTreeMap::new(),
        };
        for (key, value) in map {
            if key == "@type" {
                continue;
            }
            let field = match value {
                Value::Object(child) if is_structural(node.kind.as_deref(), key) => {
                    Field::Query(self.import(child))
                }
                Value::Array(items)
                    if is_structural(node.kind.as_deref(), key)
                        && items.iter().all(Value::is_object) =>
                {
                    Field::Queries(
                        items
                            .iter()
                            .filter_map(Value::as_object)
                            .map(|child| self.import(child))
                            .collect(),
                    )
                }
                other => Field::Value(other.clone()),
            };
            node.fields.insert(key.clone(), field);
        }
        self.alloc(node)
    }

    /// Serializes the subtree exactly as stored.
    pub fn export(&self, id: NodeId) -> Value {
        let node = self.node(id);
        let mut map = Map::new();
        if let Some(kind) = &node.kind {
            map.insert("@type".to_string(), Value::String(kind.clone()));
        }
        for (key, field) in &node.fields {
            let value = match field {
                Field::Value(v) => v.clone(),
                Field::Query(child) => self.export(*child),
                Field::Queries(children) => {
                    Value::Array(children.iter().map(|c| self.export(*c)).collect())
                }
            };
            map.insert(key.clone(), value);
        }
        Value::Object(map)
    }

    /// Serializes the subtree with rollup applied.
    ///
    /// Empty sub-queries are dropped, an `And`/`Or` with a single child is
    /// replaced by that child, and a node whose `query` or `consequent` ends
    /// up empty is dropped along with it. `None` means nothing remains.
    pub fn rollup(&self, id: NodeId) -> Option<Value> {
        let node = self.node(id);

        for combinator in [("And", "and"), ("Or", "or")] {
            if node.is_kind(combinator.0) {
                let mut children: Vec<Value> = node
                    .children(combinator.1)
                    .iter()
                    .filter_map(|c| self.rollup(*c))
                    .collect();
                return match children.len() {
                    0 => None,
                    1 => children.pop(),
                    _ => {
                        let mut map = Map::new();
                        map.insert("@type".into(), Value::String(combinator.0.into()));
                        map.insert(combinator.1.into(), Value::Array(children));
                        Some(Value::Object(map))
                    }
                };
            }
        }

        let mut map = Map::new();
        if let Some(kind) = &node.kind {
            map.insert("@type".to_string(), Value::String(kind.clone()));
        }
        for (key, field) in &node.fields {
            match field {
                Field::Value(v) => {
                    map.insert(key.clone(), v.clone());
                }
                Field::Query(child) => match self.rollup(*child) {
                    Some(v) => {
                        map.insert(key.clone(), v);
                    }
                    // A comment stays as an annotation even with nothing under it.
                    None if node.is_kind("Comment") => {}
                    None if key == "query" || key == "consequent" => return None,
                    None => {}
                },
                Field::Queries(children) => {
                    let items = children.iter().filter_map(|c| self.rollup(*c)).collect();
                    map.insert(key.clone(), Value::Array(items));
                }
            }
        }

        if map.is_empty() { None } else { Some(Value::Object(map)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn imported(value: Value) -> (QueryArena, NodeId) {
        let mut arena = QueryArena::new();
        let id = arena.import(value.as_object().expect("object"));
        (arena, id)
    }

    #[test]
    fn test_import_export_preserves_shape() {
        let ast = json!({
            "@type": "Select",
            "variables": ["X"],
            "query": {"@type": "And", "and": [{"@type": "True"}, {"@type": "True"}]}
        });
        let (arena, id) = imported(ast.clone());
        assert_eq!(arena.export(id), ast);
        assert!(matches!(arena.node(id).fields.get("query"), Some(Field::Query(_))));
    }

    #[test]
    fn test_rollup_collapses_single_child() {
        let (arena, id) = imported(json!({"@type": "And", "and": [{"@type": "True"}]}));
        assert_eq!(arena.rollup(id), Some(json!({"@type": "True"})));
    }

    #[test]
    fn test_rollup_drops_node_with_empty_query() {
        let (arena, id) = imported(json!({"@type": "Limit", "limit": 10, "query": {}}));
        assert_eq!(arena.rollup(id), None);
    }

    #[test]
    fn test_rollup_keeps_comment_with_empty_query() {
        let (arena, id) = imported(json!({"@type": "Comment", "comment": "off", "query": {}}));
        assert_eq!(
            arena.rollup(id),
            Some(json!({"@type": "Comment", "comment": "off"}))
        );
    }

    #[test]
    fn test_graft_copies_subtree() {
        let (source, id) = imported(json!({"@type": "Not", "query": {"@type": "True"}}));
        let mut target = QueryArena::new();
        let copied = target.graft(&source, id);
        assert_eq!(target.export(copied), source.export(id));
    }
}

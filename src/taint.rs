//! Detection of mutating operations inside a query AST.

use serde_json::Value;

/// Discriminators of operations that write to the database.
pub const UPDATE_OPERATIONS: [&str; 9] = [
    "AddTriple",
    "DeleteTriple",
    "AddQuad",
    "DeleteQuad",
    "InsertDocument",
    "DeleteDocument",
    "UpdateDocument",
    "DeleteObject",
    "UpdateObject",
];

pub fn is_update_operation(discriminator: &str) -> bool {
    UPDATE_OPERATIONS.contains(&discriminator)
}

/// True when `ast` or any sub-query it contains mutates the database.
///
/// Descends through `query`, `consequent`, and the children of `and`/`or`.
pub fn contains_update(ast: &Value) -> bool {
    let Some(node) = ast.as_object() else {
        return false;
    };
    if node
        .get("@type")
        .and_then(Value::as_str)
        .is_some_and(is_update_operation)
    {
        return true;
    }
    for key in ["query", "consequent"] {
        if node.get(key).is_some_and(contains_update) {
            return true;
        }
    }
    ["and", "or"].iter().any(|key| {
        node.get(*key)
            .and_then(Value::as_array)
            .is_some_and(|children| children.iter().any(contains_update))
    })
}

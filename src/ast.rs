//! # WOQL Abstract Syntax Tree
//!
//! Queries are JSON-LD documents. Every node carries an `@type`
//! discriminator (`Triple`, `And`, `Select`, ...) plus operation specific
//! fields. Field values are one of:
//!
//! - a **value wrapper** tagged `NodeValue`, `Value`, `DataValue` or
//!   `ArithmeticValue` holding exactly one of `variable`, `node`, `data`
//!   or `list`
//! - a nested query node (the `query` and `consequent` fields)
//! - a list of query nodes (the `and` and `or` fields)
//!
//! ## Submodules
//!
//! - **[path]** - compiled path expressions embedded in `Path` nodes
//! - **[arena]** - the index-addressed tree the builder writes into
//!
//! ## Example
//!
//! ```text
//! {"@type": "Triple",
//!  "subject":   {"@type": "NodeValue", "variable": "Person"},
//!  "predicate": {"@type": "NodeValue", "node": "rdf:type"},
//!  "object":    {"@type": "Value", "node": "@schema:Person"}}
//! ```
//!
//! ## Path Expressions
//!
//! ```text
//! {"@type": "PathTimes", "from": 1, "to": 2,
//!  "times": {"@type": "PathOr", "or": [
//!     {"@type": "PathPredicate", "predicate": "capability_userstory"},
//!     {"@type": "PathPredicate", "predicate": "userstory_gap"}]}}
//! ```

pub mod arena;
pub mod path;

pub use arena::{Field, NodeId, QueryArena, QueryNode};
pub use path::PathPattern;

//! Inspect serialized WOQL queries

use super::CliError;
use crate::{WoqlQuery, taint};
use serde_json::Value;

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The serialized query AST
    pub input: Option<String>,
}

/// Result of a check operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// `@type` of the top-level node, if it has one
    pub root: Option<String>,
    /// Whether any operation writes to the database
    pub contains_update: bool,
    /// Update operations found, in document order
    pub updates: Vec<String>,
}

fn collect_updates(node: &Value, found: &mut Vec<String>) {
    match node {
        Value::Object(map) => {
            if let Some(kind) = map.get("@type").and_then(Value::as_str) {
                if taint::is_update_operation(kind) {
                    found.push(kind.to_string());
                }
            }
            map.values().for_each(|v| collect_updates(v, found));
        }
        Value::Array(items) => items.iter().for_each(|v| collect_updates(v, found)),
        _ => {}
    }
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let text = options.input.as_ref().ok_or(CliError::NoInput)?;
    if text.trim().is_empty() {
        return Err(CliError::NoInput);
    }
    let ast: Value = serde_json::from_str(text)?;

    // Round-trip through the builder so malformed roots are rejected.
    let query = WoqlQuery::from_json(&ast)?;
    let json = query.to_json();

    let mut updates = Vec::new();
    collect_updates(&json, &mut updates);

    Ok(CheckResult {
        root: json.get("@type").and_then(Value::as_str).map(str::to_string),
        contains_update: query.contains_update(),
        updates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_reports_updates() {
        let options = CheckOptions {
            input: Some(
                r#"{"@type":"And","and":[
                    {"@type":"Triple","subject":{"@type":"NodeValue","variable":"S"}},
                    {"@type":"AddTriple","subject":{"@type":"NodeValue","node":"a"}}
                ]}"#
                .to_string(),
            ),
        };
        let result = execute_check(&options).unwrap();
        assert_eq!(result.root.as_deref(), Some("And"));
        assert!(result.contains_update);
        assert_eq!(result.updates, vec!["AddTriple".to_string()]);
    }

    #[test]
    fn test_check_requires_input() {
        assert!(matches!(
            execute_check(&CheckOptions::default()),
            Err(CliError::NoInput)
        ));
    }

    #[test]
    fn test_check_rejects_non_object() {
        let options = CheckOptions {
            input: Some("[1, 2]".to_string()),
        };
        assert!(matches!(execute_check(&options), Err(CliError::Woql(_))));
    }
}

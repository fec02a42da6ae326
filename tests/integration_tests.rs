// tests/integration_tests.rs

use serde_json::json;
use std::io::Write;
use woql_query::cli::{self, CheckOptions, CliError, PathOptions, PathOutput};
use woql_query::{
    Operation, Subquery, Vocabulary, WoqlConfig, WoqlError, WoqlQuery, contains_update, vars,
};

// ============================================================================
// End-to-End Queries
// ============================================================================

#[test]
fn test_people_by_age_query() {
    let v = vars(&["Person", "Name", "Age"]);
    let (person, name, age) = (&v[0], &v[1], &v[2]);
    let query = WoqlQuery::new()
        .select([name, age], Subquery::Chain)
        .unwrap()
        .triple(person, "type", "@schema:Person")
        .unwrap()
        .triple(person, "@schema:name", name)
        .unwrap()
        .opt(Subquery::Chain)
        .unwrap()
        .triple(person, "@schema:age", age)
        .unwrap();

    assert_eq!(
        query.to_json(),
        json!({
            "@type": "Select",
            "variables": ["Name", "Age"],
            "query": {
                "@type": "And",
                "and": [
                    {
                        "@type": "Triple",
                        "subject": {"@type": "NodeValue", "variable": "Person"},
                        "predicate": {"@type": "NodeValue", "node": "rdf:type"},
                        "object": {"@type": "Value", "node": "@schema:Person"}
                    },
                    {
                        "@type": "Triple",
                        "subject": {"@type": "NodeValue", "variable": "Person"},
                        "predicate": {"@type": "NodeValue", "node": "@schema:name"},
                        "object": {"@type": "Value", "variable": "Name"}
                    },
                    {
                        "@type": "Optional",
                        "query": {
                            "@type": "Triple",
                            "subject": {"@type": "NodeValue", "variable": "Person"},
                            "predicate": {"@type": "NodeValue", "node": "@schema:age"},
                            "object": {"@type": "Value", "variable": "Age"}
                        }
                    }
                ]
            }
        })
    );
    assert!(!query.contains_update());
}

#[test]
fn test_insert_when_missing() {
    let missing = WoqlQuery::new()
        .not(Subquery::Chain)
        .unwrap()
        .triple("doc:Alice", "type", "@schema:Person")
        .unwrap();
    let insert = WoqlQuery::new()
        .add_triple("doc:Alice", "type", "@schema:Person")
        .unwrap()
        .add_triple("doc:Alice", "@schema:name", "Alice")
        .unwrap();
    let query = WoqlQuery::new().when(missing, insert).unwrap();

    let json = query.to_json();
    assert_eq!(json["query"]["@type"], "Not");
    assert_eq!(json["consequent"]["and"].as_array().unwrap().len(), 2);
    assert!(query.contains_update());
    assert!(contains_update(&json));
}

#[test]
fn test_paged_sorted_listing() {
    let query = WoqlQuery::new()
        .limit(10, Subquery::Chain)
        .unwrap()
        .start(20, Subquery::Chain)
        .unwrap()
        .order_by([woql_query::OrderTemplate::asc("v:Name")], Subquery::Chain)
        .unwrap()
        .triple("v:X", "label", "v:Name")
        .unwrap();
    let json = query.to_json();
    assert_eq!(json["@type"], "Limit");
    assert_eq!(json["query"]["@type"], "Start");
    assert_eq!(json["query"]["query"]["@type"], "OrderBy");
    assert_eq!(json["query"]["query"]["query"]["@type"], "Triple");
}

// ============================================================================
// Update Detection
// ============================================================================

#[test]
fn test_contains_update_descends_combinators() {
    let ast = json!({
        "@type": "Select",
        "variables": [],
        "query": {
            "@type": "Or",
            "or": [
                {"@type": "Triple"},
                {"@type": "And", "and": [{"@type": "True"}, {"@type": "DeleteDocument"}]}
            ]
        }
    });
    assert!(contains_update(&ast));
    assert!(!contains_update(&json!({"@type": "Triple"})));
    assert!(!contains_update(&json!([{"@type": "AddTriple"}])));
}

#[test]
fn test_read_only_conjunction_is_not_an_update() {
    let ast = json!({"@type": "And", "and": [{"@type": "Triple"}, {"@type": "Triple"}]});
    assert!(!contains_update(&ast));
}

#[test]
fn test_update_nested_in_or_inside_and() {
    let ast = json!({
        "@type": "And",
        "and": [
            {"@type": "Triple"},
            {"@type": "Or", "or": [{"@type": "Triple"}, {"@type": "AddTriple"}]}
        ]
    });
    assert!(contains_update(&ast));
}

#[test]
fn test_operation_metadata_matches_update_detection() {
    for op in Operation::ALL {
        if matches!(op, Operation::UpdateTriple | Operation::UpdateQuad) {
            assert!(op.is_update());
            continue;
        }
        assert_eq!(
            op.is_update(),
            contains_update(&json!({"@type": op.discriminator()})),
            "mismatch for {}",
            op
        );
    }
}

#[test]
fn test_operation_lookup() {
    assert_eq!(Operation::from_name("opt"), Some(Operation::Optional));
    assert_eq!(Operation::from_name("Optional"), Some(Operation::Optional));
    assert_eq!(Operation::from_name("And"), Some(Operation::And));
    assert_eq!(Operation::from_name("Triple"), Some(Operation::Triple));
    assert_eq!(Operation::from_name("missing"), None);
    assert_eq!(Operation::Concatenate.to_string(), "concat");
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_extends_defaults() {
    let config = WoqlConfig::from_json_str(r#"{"vocabulary": {"Person": "@schema:Person"}}"#).unwrap();
    assert!(config.inherit_defaults);
    let vocab = config.vocabulary();
    assert_eq!(vocab.get("Person"), Some("@schema:Person"));
    assert_eq!(vocab.get("type"), Some("rdf:type"));
    assert_eq!(vocab.len(), Vocabulary::default().len() + 1);
}

#[test]
fn test_config_without_defaults() {
    let config = WoqlConfig::from_json_str(
        r#"{"vocabulary": {"Person": "@schema:Person"}, "inherit_defaults": false, "expand_path_predicates": false}"#,
    )
    .unwrap();
    let query = WoqlQuery::with_config(&config)
        .triple("v:X", "type", "Person")
        .unwrap()
        .path("v:X", "Person+", "v:Y", None::<&str>)
        .unwrap();
    let json = query.to_json();
    assert_eq!(json["and"][0]["predicate"]["node"], "type");
    assert_eq!(json["and"][0]["object"]["node"], "@schema:Person");
    assert_eq!(json["and"][1]["pattern"]["plus"]["predicate"], "Person");
}

#[test]
fn test_child_builder_shares_vocabulary() {
    let parent = WoqlQuery::new().extend_vocabulary([("Person", "@schema:Person")]);
    let child = parent.child().triple("v:X", "type", "Person").unwrap();
    assert_eq!(child.to_json()["object"]["node"], "@schema:Person");
}

#[test]
fn test_invalid_config() {
    let err = WoqlConfig::from_json_str(r#"{"vocabulary": []}"#).unwrap_err();
    assert!(matches!(err, WoqlError::Config(_)));
}

#[test]
fn test_load_config_file() {
    let path = std::env::temp_dir().join(format!("woql-config-{}.json", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, r#"{{"vocabulary": {{"knows": "@schema:knows"}}}}"#).unwrap();
    drop(file);

    let config = WoqlConfig::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(config.vocabulary().expand("knows"), "@schema:knows");

    assert!(matches!(
        WoqlConfig::load(path.with_extension("missing")),
        Err(WoqlError::Config(_))
    ));
}

// ============================================================================
// CLI
// ============================================================================

#[test]
fn test_cli_path_tokens() {
    let options = PathOptions {
        pattern: "<a,b*".to_string(),
        tokens: true,
        ..Default::default()
    };
    match cli::execute_path(&options).unwrap() {
        PathOutput::Tokens(tokens) => assert_eq!(tokens, vec!["<", "a", ",", "b", "*"]),
        other => panic!("expected tokens, got {:?}", other),
    }
}

#[test]
fn test_cli_path_pattern() {
    let options = PathOptions {
        pattern: "a|b".to_string(),
        ..Default::default()
    };
    let output = cli::execute_path(&options).unwrap();
    assert!(matches!(output, PathOutput::Pattern(_)));
    assert_eq!(output.to_json()["@type"], "PathOr");
}

#[test]
fn test_cli_path_query() {
    let options = PathOptions {
        pattern: "type".to_string(),
        subject: Some("doc:a".to_string()),
        path_variable: Some("v:P".to_string()),
        ..Default::default()
    };
    let json = cli::execute_path(&options).unwrap().to_json();
    assert_eq!(json["@type"], "Path");
    assert_eq!(json["subject"]["node"], "doc:a");
    assert_eq!(json["object"]["variable"], "Object");
    assert_eq!(json["pattern"]["predicate"], "rdf:type");
    assert_eq!(json["path"]["variable"], "P");
}

#[test]
fn test_cli_path_error() {
    let options = PathOptions {
        pattern: "(a".to_string(),
        ..Default::default()
    };
    let err = cli::execute_path(&options).unwrap_err();
    assert!(matches!(err, CliError::Woql(WoqlError::Syntax { .. })));
    assert!(err.to_string().contains("no matching parenthesis"));
}

#[test]
fn test_cli_check() {
    let ast = WoqlQuery::new()
        .triple("v:X", "p", "v:Y")
        .unwrap()
        .delete_triple("v:X", "p", "v:Y")
        .unwrap()
        .to_json_string();
    let result = cli::execute_check(&CheckOptions { input: Some(ast) }).unwrap();
    assert_eq!(result.root.as_deref(), Some("And"));
    assert!(result.contains_update);
    assert_eq!(result.updates, vec!["DeleteTriple"]);
}

#[test]
fn test_cli_check_invalid_json() {
    let err = cli::execute_check(&CheckOptions {
        input: Some("{not json".to_string()),
    })
    .unwrap_err();
    assert!(matches!(err, CliError::Json(_)));
}

#[test]
fn test_cli_docs() {
    let text = cli::describe_operation("update_triple").unwrap();
    assert!(text.contains("update:     yes"));
    assert!(cli::get_operations_overview().contains("ARITHMETIC"));
}

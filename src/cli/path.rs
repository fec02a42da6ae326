//! Compile path patterns from the command line

use super::CliError;
use crate::{WoqlConfig, WoqlQuery, compile_path_pattern, tokenize};
use serde_json::Value;

/// Options for the path command
#[derive(Debug, Clone, Default)]
pub struct PathOptions {
    /// The path pattern text
    pub pattern: String,
    /// Print the token stream instead of the compiled pattern
    pub tokens: bool,
    /// Subject of a full `Path` query
    pub subject: Option<String>,
    /// Object of a full `Path` query
    pub object: Option<String>,
    /// Variable receiving the traversed edges
    pub path_variable: Option<String>,
    /// Builder configuration
    pub config: WoqlConfig,
}

/// Result of a path operation
#[derive(Debug)]
pub enum PathOutput {
    Tokens(Vec<String>),
    Pattern(Value),
    Query(Value),
}

impl PathOutput {
    pub fn to_json(&self) -> Value {
        match self {
            PathOutput::Tokens(tokens) => Value::from(tokens.clone()),
            PathOutput::Pattern(v) | PathOutput::Query(v) => v.clone(),
        }
    }
}

/// Execute a path operation
pub fn execute_path(options: &PathOptions) -> Result<PathOutput, CliError> {
    if options.tokens {
        return Ok(PathOutput::Tokens(tokenize(&options.pattern)));
    }

    if options.subject.is_none() && options.object.is_none() {
        let compiled = compile_path_pattern(&options.pattern)?;
        return Ok(PathOutput::Pattern(compiled.to_json()));
    }

    let subject = options.subject.as_deref().unwrap_or("v:Subject");
    let object = options.object.as_deref().unwrap_or("v:Object");
    let query = WoqlQuery::with_config(&options.config).path(
        subject,
        &options.pattern,
        object,
        options.path_variable.as_deref(),
    )?;
    Ok(PathOutput::Query(query.to_json()))
}

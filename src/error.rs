//! Error types shared by the path compiler and the query builder.

use thiserror::Error;

/// Errors raised while compiling path patterns or assembling a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WoqlError {
    /// The path pattern could not be tokenized or parsed.
    #[error("syntax error in path pattern '{pattern}': {message}")]
    Syntax { pattern: String, message: String },

    /// A builder operation received a missing or incompatible argument.
    #[error("{operation}: invalid '{field}': {message}")]
    Parameter {
        operation: &'static str,
        field: &'static str,
        message: String,
    },

    /// A configuration document could not be read.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WoqlError>;

impl WoqlError {
    pub(crate) fn syntax(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        WoqlError::Syntax {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    pub(crate) fn parameter(
        operation: &'static str,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        WoqlError::Parameter {
            operation,
            field,
            message: message.into(),
        }
    }

    /// Replaces the pattern text carried by a syntax error.
    pub(crate) fn with_pattern(self, text: &str) -> Self {
        match self {
            WoqlError::Syntax { message, .. } => WoqlError::Syntax {
                pattern: text.to_string(),
                message,
            },
            other => other,
        }
    }

    /// The rule or parameter message without the surrounding context.
    pub fn message(&self) -> &str {
        match self {
            WoqlError::Syntax { message, .. } => message,
            WoqlError::Parameter { message, .. } => message,
            WoqlError::Config(message) => message,
        }
    }
}

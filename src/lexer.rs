//! Tokenizer for the path-pattern mini language.
//!
//! A pattern is split into identifiers (letters, digits, `_` and the
//! namespace/quoting characters `@ : ' %`) and single-character operators
//! `. | + * { } , ( ) < >`. Everything else is skipped, so the tokenizer
//! never fails.

use regex::Regex;
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\w'@:%]+|[.|+*{},()<>]").expect("token pattern is a valid regex")
});

/// Operator characters recognised as standalone tokens.
pub const OPERATORS: [&str; 11] = [".", "|", "+", "*", "{", "}", ",", "(", ")", "<", ">"];

/// Splits `pattern` into its token stream.
pub fn tokenize(pattern: &str) -> Vec<String> {
    let tokens: Vec<String> = TOKEN
        .find_iter(pattern)
        .map(|m| m.as_str().to_string())
        .collect();
    tracing::trace!(pattern, ?tokens, "tokenized path pattern");
    tokens
}

/// True when `token` is one of the single-character operators.
pub fn is_operator(token: &str) -> bool {
    OPERATORS.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators_are_single_tokens() {
        assert_eq!(tokenize("a|b"), vec!["a", "|", "b"]);
        assert_eq!(tokenize("<a>"), vec!["<", "a", ">"]);
        assert_eq!(tokenize("a.b"), vec!["a", ".", "b"]);
    }

    #[test]
    fn test_identifier_characters() {
        assert_eq!(tokenize("friend_of:@test"), vec!["friend_of:@test"]);
        assert_eq!(tokenize("scm:100%"), vec!["scm:100%"]);
    }

    #[test]
    fn test_unmatched_characters_are_skipped() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  ~~ ##").is_empty());
        assert_eq!(tokenize("a ; b"), vec!["a", "b"]);
    }

    #[test]
    fn test_is_operator() {
        assert!(is_operator("{"));
        assert!(!is_operator("ab"));
    }
}

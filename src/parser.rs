//! Recursive-descent parser for path patterns.
//!
//! The grammar has three levels:
//!
//! ```text
//! sequence    := alternation ("," alternation)*
//! alternation := phrase ("|" phrase)*
//! phrase      := step ( "*" | "+" | "{" int "," int "}" )*
//! step        := name | "<" name ">" | "." | "(" sequence ")"
//! ```
//!
//! A phrase keeps a single accumulator. A bare name or `.` replaces it
//! rather than extending it, so `a.b` compiles to the predicate `b`;
//! steps are chained with `,`.

use crate::ast::PathPattern;
use crate::error::{Result, WoqlError};
use crate::lexer::tokenize;

fn joined(tokens: &[String]) -> String {
    tokens.join(" ")
}

/// Splits `tokens` at every `separator` that sits outside `(...)` and `{...}`.
///
/// An empty input yields a single empty part. A closer without a matching
/// opener is a syntax error.
pub fn split_at(separator: &str, tokens: &[String]) -> Result<Vec<Vec<String>>> {
    let mut parens: i64 = 0;
    let mut braces: i64 = 0;
    let mut parts = Vec::new();
    let mut current = Vec::new();

    for token in tokens {
        if parens == 0 && braces == 0 && token == separator {
            parts.push(std::mem::take(&mut current));
            continue;
        }
        match token.as_str() {
            "(" => parens += 1,
            ")" => parens -= 1,
            "{" => braces += 1,
            "}" => braces -= 1,
            _ => {}
        }
        if parens < 0 || braces < 0 {
            return Err(WoqlError::syntax(joined(tokens), "Unbalanced parenthesis"));
        }
        current.push(token.clone());
    }
    parts.push(current);

    tracing::trace!(separator, ?parts, "split tokens");
    Ok(parts)
}

/// Parses a comma separated sequence of alternations.
pub fn parse_sequence(tokens: &[String]) -> Result<PathPattern> {
    let steps = split_at(",", tokens)?
        .iter()
        .map(|part| parse_alternation(part))
        .collect::<Result<Vec<_>>>()?;
    Ok(PathPattern::sequence(steps))
}

/// Parses a `|` separated alternation of phrases.
pub fn parse_alternation(tokens: &[String]) -> Result<PathPattern> {
    let branches = split_at("|", tokens)?
        .iter()
        .map(|part| parse_phrase(part))
        .collect::<Result<Vec<_>>>()?;
    Ok(PathPattern::or(branches))
}

/// Parses a single phrase: a step followed by any number of quantifiers.
pub fn parse_phrase(tokens: &[String]) -> Result<PathPattern> {
    let mut result: Option<PathPattern> = None;
    let mut pos = 0;

    while pos < tokens.len() {
        let token = tokens[pos].as_str();
        pos += 1;
        match token {
            "(" => {
                let end = closing_paren(tokens, pos)?;
                result = Some(parse_sequence(&tokens[pos..end])?);
                pos = end + 1;
            }
            ")" => break,
            "<" => {
                let name = tokens
                    .get(pos)
                    .filter(|t| !crate::lexer::is_operator(t))
                    .ok_or_else(|| {
                        WoqlError::syntax(joined(tokens), "expected predicate after '<'")
                    })?;
                result = Some(PathPattern::inverse(name.clone()));
                pos += 1;
            }
            ">" => {}
            "." => result = Some(PathPattern::wildcard()),
            "*" => result = Some(PathPattern::star(quantified(tokens, result, "*")?)),
            "+" => result = Some(PathPattern::plus(quantified(tokens, result, "+")?)),
            "{" => {
                let inner = quantified(tokens, result, "{")?;
                let (from, to) = repetition_bounds(tokens, &mut pos)?;
                result = Some(PathPattern::times(inner, from, to));
            }
            name => result = Some(PathPattern::predicate(name)),
        }
    }

    result.ok_or_else(|| WoqlError::syntax(joined(tokens), "empty path expression"))
}

fn quantified(tokens: &[String], result: Option<PathPattern>, op: &str) -> Result<PathPattern> {
    result.ok_or_else(|| {
        WoqlError::syntax(
            joined(tokens),
            format!("'{}' must follow a path expression", op),
        )
    })
}

/// Index of the `)` closing the group that starts at `start`.
fn closing_paren(tokens: &[String], start: usize) -> Result<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(start) {
        match token.as_str() {
            "(" => depth += 1,
            ")" if depth == 0 => return Ok(i),
            ")" => depth -= 1,
            _ => {}
        }
    }
    Err(WoqlError::syntax(
        joined(tokens),
        "no matching parenthesis in path pattern",
    ))
}

/// Reads `int , int }` after an opening brace.
fn repetition_bounds(tokens: &[String], pos: &mut usize) -> Result<(u64, u64)> {
    let mut next = || {
        let token = tokens.get(*pos).map(String::as_str);
        *pos += 1;
        token
    };

    let from = count(tokens, next())?;
    if next() != Some(",") {
        return Err(WoqlError::syntax(
            joined(tokens),
            "incorrect separation in braced path pattern",
        ));
    }
    let to = count(tokens, next())?;
    if next() != Some("}") {
        return Err(WoqlError::syntax(
            joined(tokens),
            "no matching brace in path pattern",
        ));
    }
    Ok((from, to))
}

fn count(tokens: &[String], token: Option<&str>) -> Result<u64> {
    token.and_then(|t| t.parse().ok()).ok_or_else(|| {
        WoqlError::syntax(
            joined(tokens),
            format!(
                "expected a repetition count, found '{}'",
                token.unwrap_or("end of pattern")
            ),
        )
    })
}

/// Tokenizes and parses a complete path pattern.
pub fn compile_path_pattern(pattern: &str) -> Result<PathPattern> {
    let tokens = tokenize(pattern);
    if tokens.is_empty() {
        return Err(WoqlError::syntax(
            pattern,
            "Pattern error - could not be parsed",
        ));
    }
    let compiled = parse_sequence(&tokens).map_err(|e| e.with_pattern(pattern))?;
    tracing::debug!(pattern, %compiled, "compiled path pattern");
    Ok(compiled)
}

//! Operation reference for the woql CLI

use super::CliError;
use crate::Operation;
use std::fmt::Write as _;

const PATH_GRAMMAR: &str = r#"PATH PATTERNS

  p              follow predicate p forward
  <p             follow predicate p backward
  .              any predicate
  a,b            a then b
  a|b            a or b
  (a)            grouping
  a*  a+         zero-or-more / one-or-more repetitions
  a{n,m}         between n and m repetitions

Run 'woql path <PATTERN>' to compile a pattern.
"#;

fn family(op: Operation) -> &'static str {
    use Operation::*;
    match op {
        Triple | AddedTriple | RemovedTriple | Quad | AddedQuad | RemovedQuad | AddTriple
        | AddQuad | DeleteTriple | DeleteQuad | UpdateTriple | UpdateQuad | Star | Path
        | Size | TripleCount | Subsumption | IsA | TypeOf | Typecast => "triples",
        And | Or | Not | Optional | Once | Immediately | When | Select | Distinct | Limit
        | Start | OrderBy | GroupBy | Count | From | Into | Using | Comment | True => "control",
        Equals | Less | Greater | Like => "comparison",
        Trim | Concatenate | Join | Split | Substring | Upper | Lower | Pad | Regexp
        | Length => "strings",
        Member | Sum | Slice | Dot | SetDifference | SetIntersection | SetUnion | SetMember
        | ListToSet => "lists",
        Eval | Plus | Minus | Times | Divide | Div | Exp | Floor => "arithmetic",
        LexicalKey | HashKey | RandomKey => "keys",
        InsertDocument | UpdateDocument | DeleteDocument | ReadDocument => "documents",
    }
}

/// Listing of every builder operation, grouped by family.
pub fn get_operations_overview() -> String {
    let mut out = String::from("WOQL OPERATIONS\n");
    let mut current = "";
    for op in Operation::ALL {
        let group = family(op);
        if group != current {
            let _ = write!(out, "\n{}\n", group.to_uppercase());
            current = group;
        }
        let marker = if op.is_update() { "  [update]" } else { "" };
        let _ = writeln!(out, "  {:<18}{}{}", op.name(), op.discriminator(), marker);
    }
    out.push('\n');
    out.push_str(PATH_GRAMMAR);
    out
}

/// Details of one operation, looked up by method name or discriminator.
pub fn describe_operation(name: &str) -> Result<String, CliError> {
    let op = Operation::from_name(name).ok_or_else(|| CliError::UnknownOperation(name.to_string()))?;
    let mut out = String::new();
    let _ = writeln!(out, "{}", op.name());
    let _ = writeln!(out, "  type:       {}", op.discriminator());
    let _ = writeln!(out, "  family:     {}", family(op));
    let _ = writeln!(out, "  parameters: {}", op.parameters().join(", "));
    let _ = writeln!(out, "  update:     {}", if op.is_update() { "yes" } else { "no" });
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_lists_every_operation() {
        let overview = get_operations_overview();
        for op in Operation::ALL {
            assert!(overview.contains(op.name()), "missing {}", op);
        }
        assert!(overview.contains("PATH PATTERNS"));
    }

    #[test]
    fn test_describe_by_discriminator() {
        let text = describe_operation("Concatenate").unwrap();
        assert!(text.starts_with("concat\n"));
        assert!(text.contains("parameters: list, result"));
    }

    #[test]
    fn test_describe_unknown() {
        assert!(matches!(
            describe_operation("frobnicate"),
            Err(CliError::UnknownOperation(_))
        ));
    }
}

use super::WoqlQuery;
use crate::error::Result;
use crate::params::Operation;
use crate::value::{SlotKind, Term};
use regex::Regex;
use std::sync::LazyLock;

static CONCAT_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v:(\w+)").expect("variable pattern is a valid regex"));

/// Splits `"v:First v:Last"` into variable and literal parts.
fn concat_parts(text: &str) -> Vec<Term> {
    let mut parts = Vec::new();
    let mut last = 0;
    for caps in CONCAT_VARIABLE.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            parts.push(Term::Text(text[last..whole.start()].to_string()));
        }
        parts.push(Term::Var(name.as_str().to_string()));
        last = whole.end();
    }
    if last < text.len() {
        parts.push(Term::Text(text[last..].to_string()));
    }
    parts
}

impl WoqlQuery {
    /// Writes `op` with each argument coerced for its slot.
    fn slots(mut self, op: Operation, args: Vec<(&'static str, SlotKind, Term)>) -> Result<Self> {
        let c = self.coercer(op);
        let mut fields = Vec::with_capacity(args.len());
        for (field, slot, term) in args {
            fields.push((field, c.wrap(slot, field, term, None)?.to_json(slot)));
        }
        self.write(op, fields);
        Ok(self)
    }

    // Comparison

    pub fn eq(self, left: impl Into<Term>, right: impl Into<Term>) -> Result<Self> {
        self.slots(
            Operation::Equals,
            vec![
                ("left", SlotKind::Value, left.into()),
                ("right", SlotKind::Value, right.into()),
            ],
        )
    }

    pub fn less(self, left: impl Into<Term>, right: impl Into<Term>) -> Result<Self> {
        self.slots(
            Operation::Less,
            vec![
                ("left", SlotKind::Data, left.into()),
                ("right", SlotKind::Data, right.into()),
            ],
        )
    }

    pub fn greater(self, left: impl Into<Term>, right: impl Into<Term>) -> Result<Self> {
        self.slots(
            Operation::Greater,
            vec![
                ("left", SlotKind::Data, left.into()),
                ("right", SlotKind::Data, right.into()),
            ],
        )
    }

    /// String similarity between `left` and `right`, bound to `similarity`.
    pub fn like(
        self,
        left: impl Into<Term>,
        right: impl Into<Term>,
        similarity: impl Into<Term>,
    ) -> Result<Self> {
        self.slots(
            Operation::Like,
            vec![
                ("left", SlotKind::Data, left.into()),
                ("right", SlotKind::Data, right.into()),
                ("similarity", SlotKind::Data, similarity.into()),
            ],
        )
    }

    // Strings

    pub fn trim(self, untrimmed: impl Into<Term>, trimmed: impl Into<Term>) -> Result<Self> {
        self.slots(
            Operation::Trim,
            vec![
                ("untrimmed", SlotKind::Data, untrimmed.into()),
                ("trimmed", SlotKind::Data, trimmed.into()),
            ],
        )
    }

    /// Concatenates `list` into `result`. A plain string is split into its
    /// literal text and `v:` variables first.
    pub fn concat(self, list: impl Into<Term>, result: impl Into<Term>) -> Result<Self> {
        let list = match list.into() {
            Term::Str(text) => Term::List(concat_parts(&text)),
            other => other,
        };
        self.slots(
            Operation::Concatenate,
            vec![
                ("list", SlotKind::Data, list),
                ("result", SlotKind::Data, result.into()),
            ],
        )
    }

    pub fn join(
        self,
        list: impl Into<Term>,
        separator: impl Into<Term>,
        result: impl Into<Term>,
    ) -> Result<Self> {
        self.slots(
            Operation::Join,
            vec![
                ("list", SlotKind::Data, list.into()),
                ("separator", SlotKind::Data, separator.into()),
                ("result", SlotKind::Data, result.into()),
            ],
        )
    }

    pub fn split(
        self,
        string: impl Into<Term>,
        pattern: impl Into<Term>,
        list: impl Into<Term>,
    ) -> Result<Self> {
        self.slots(
            Operation::Split,
            vec![
                ("string", SlotKind::Data, string.into()),
                ("pattern", SlotKind::Data, pattern.into()),
                ("list", SlotKind::Data, list.into()),
            ],
        )
    }

    pub fn substr(
        self,
        string: impl Into<Term>,
        before: impl Into<Term>,
        length: impl Into<Term>,
        after: impl Into<Term>,
        substring: impl Into<Term>,
    ) -> Result<Self> {
        self.slots(
            Operation::Substring,
            vec![
                ("string", SlotKind::Data, string.into()),
                ("before", SlotKind::Data, before.into()),
                ("length", SlotKind::Data, length.into()),
                ("after", SlotKind::Data, after.into()),
                ("substring", SlotKind::Data, substring.into()),
            ],
        )
    }

    pub fn upper(self, mixed: impl Into<Term>, upper: impl Into<Term>) -> Result<Self> {
        self.slots(
            Operation::Upper,
            vec![
                ("mixed", SlotKind::Data, mixed.into()),
                ("upper", SlotKind::Data, upper.into()),
            ],
        )
    }

    pub fn lower(self, mixed: impl Into<Term>, lower: impl Into<Term>) -> Result<Self> {
        self.slots(
            Operation::Lower,
            vec![
                ("mixed", SlotKind::Data, mixed.into()),
                ("lower", SlotKind::Data, lower.into()),
            ],
        )
    }

    /// Pads `string` with `times` copies of `char`.
    pub fn pad(
        self,
        string: impl Into<Term>,
        char: impl Into<Term>,
        times: impl Into<Term>,
        result: impl Into<Term>,
    ) -> Result<Self> {
        self.slots(
            Operation::Pad,
            vec![
                ("string", SlotKind::Data, string.into()),
                ("char", SlotKind::Data, char.into()),
                ("times", SlotKind::Data, times.into()),
                ("result", SlotKind::Data, result.into()),
            ],
        )
    }

    /// Matches `string` against the regular expression `pattern`; the
    /// capture groups are bound to `result`.
    pub fn regexp(
        self,
        pattern: impl Into<Term>,
        string: impl Into<Term>,
        result: impl Into<Term>,
    ) -> Result<Self> {
        self.slots(
            Operation::Regexp,
            vec![
                ("pattern", SlotKind::Data, pattern.into()),
                ("string", SlotKind::Data, string.into()),
                ("result", SlotKind::Data, result.into()),
            ],
        )
    }

    pub fn length(self, list: impl Into<Term>, length: impl Into<Term>) -> Result<Self> {
        self.slots(
            Operation::Length,
            vec![
                ("list", SlotKind::Data, list.into()),
                ("length", SlotKind::Data, length.into()),
            ],
        )
    }

    // Lists and sets

    pub fn member(self, member: impl Into<Term>, list: impl Into<Term>) -> Result<Self> {
        self.slots(
            Operation::Member,
            vec![
                ("member", SlotKind::Value, member.into()),
                ("list", SlotKind::Value, list.into()),
            ],
        )
    }

    pub fn sum(self, list: impl Into<Term>, result: impl Into<Term>) -> Result<Self> {
        self.slots(
            Operation::Sum,
            vec![
                ("list", SlotKind::Data, list.into()),
                ("result", SlotKind::Data, result.into()),
            ],
        )
    }

    /// Elements `start..end` of `list`. A null `end` slices to the end.
    pub fn slice(
        self,
        list: impl Into<Term>,
        result: impl Into<Term>,
        start: impl Into<Term>,
        end: impl Into<Term>,
    ) -> Result<Self> {
        let mut args = vec![
            ("list", SlotKind::Data, list.into()),
            ("result", SlotKind::Data, result.into()),
            ("start", SlotKind::Data, start.into()),
        ];
        let end = end.into();
        if !end.is_null() {
            args.push(("end", SlotKind::Data, end));
        }
        self.slots(Operation::Slice, args)
    }

    /// Reads `field` of a dictionary `document` into `value`.
    pub fn dot(
        self,
        document: impl Into<Term>,
        field: impl Into<Term>,
        value: impl Into<Term>,
    ) -> Result<Self> {
        self.slots(
            Operation::Dot,
            vec![
                ("document", SlotKind::Data, document.into()),
                ("field", SlotKind::Data, field.into()),
                ("value", SlotKind::Data, value.into()),
            ],
        )
    }

    fn set_operation(
        self,
        op: Operation,
        list_a: Term,
        list_b: Term,
        result: Term,
    ) -> Result<Self> {
        self.slots(
            op,
            vec![
                ("list_a", SlotKind::Value, list_a),
                ("list_b", SlotKind::Value, list_b),
                ("result", SlotKind::Value, result),
            ],
        )
    }

    pub fn set_difference(
        self,
        list_a: impl Into<Term>,
        list_b: impl Into<Term>,
        result: impl Into<Term>,
    ) -> Result<Self> {
        self.set_operation(Operation::SetDifference, list_a.into(), list_b.into(), result.into())
    }

    pub fn set_intersection(
        self,
        list_a: impl Into<Term>,
        list_b: impl Into<Term>,
        result: impl Into<Term>,
    ) -> Result<Self> {
        self.set_operation(Operation::SetIntersection, list_a.into(), list_b.into(), result.into())
    }

    pub fn set_union(
        self,
        list_a: impl Into<Term>,
        list_b: impl Into<Term>,
        result: impl Into<Term>,
    ) -> Result<Self> {
        self.set_operation(Operation::SetUnion, list_a.into(), list_b.into(), result.into())
    }

    pub fn set_member(self, element: impl Into<Term>, set: impl Into<Term>) -> Result<Self> {
        self.slots(
            Operation::SetMember,
            vec![
                ("element", SlotKind::Value, element.into()),
                ("set", SlotKind::Value, set.into()),
            ],
        )
    }

    pub fn list_to_set(self, list: impl Into<Term>, set: impl Into<Term>) -> Result<Self> {
        self.slots(
            Operation::ListToSet,
            vec![
                ("list", SlotKind::Value, list.into()),
                ("set", SlotKind::Value, set.into()),
            ],
        )
    }

    // Arithmetic

    /// Evaluates an arithmetic `expression` built with [`plus`](Self::plus)
    /// and friends, binding the outcome to `result`.
    pub fn eval(self, expression: impl Into<Term>, result: impl Into<Term>) -> Result<Self> {
        self.slots(
            Operation::Eval,
            vec![
                ("expression", SlotKind::Arithmetic, expression.into()),
                ("result", SlotKind::Arithmetic, result.into()),
            ],
        )
    }

    fn arithmetic(self, op: Operation, left: Term, right: Term) -> Result<Self> {
        self.slots(
            op,
            vec![
                ("left", SlotKind::Arithmetic, left),
                ("right", SlotKind::Arithmetic, right),
            ],
        )
    }

    pub fn plus(self, left: impl Into<Term>, right: impl Into<Term>) -> Result<Self> {
        self.arithmetic(Operation::Plus, left.into(), right.into())
    }

    pub fn minus(self, left: impl Into<Term>, right: impl Into<Term>) -> Result<Self> {
        self.arithmetic(Operation::Minus, left.into(), right.into())
    }

    pub fn times(self, left: impl Into<Term>, right: impl Into<Term>) -> Result<Self> {
        self.arithmetic(Operation::Times, left.into(), right.into())
    }

    pub fn divide(self, left: impl Into<Term>, right: impl Into<Term>) -> Result<Self> {
        self.arithmetic(Operation::Divide, left.into(), right.into())
    }

    /// Integer division.
    pub fn div(self, left: impl Into<Term>, right: impl Into<Term>) -> Result<Self> {
        self.arithmetic(Operation::Div, left.into(), right.into())
    }

    pub fn exp(self, left: impl Into<Term>, right: impl Into<Term>) -> Result<Self> {
        self.arithmetic(Operation::Exp, left.into(), right.into())
    }

    pub fn floor(self, argument: impl Into<Term>) -> Result<Self> {
        self.slots(
            Operation::Floor,
            vec![("argument", SlotKind::Arithmetic, argument.into())],
        )
    }

    // Keys

    fn key(self, op: Operation, base: Term, key_list: Term, uri: Term) -> Result<Self> {
        self.slots(
            op,
            vec![
                ("base", SlotKind::Data, base),
                ("key_list", SlotKind::Data, key_list),
                ("uri", SlotKind::Node, uri),
            ],
        )
    }

    /// Mints a readable identifier from `base` and the values in `key_list`.
    pub fn idgen(
        self,
        base: impl Into<Term>,
        key_list: impl Into<Term>,
        uri: impl Into<Term>,
    ) -> Result<Self> {
        self.key(Operation::LexicalKey, base.into(), key_list.into(), uri.into())
    }

    /// Mints a hashed identifier from `base` and the values in `key_list`.
    pub fn hash(
        self,
        base: impl Into<Term>,
        key_list: impl Into<Term>,
        uri: impl Into<Term>,
    ) -> Result<Self> {
        self.key(Operation::HashKey, base.into(), key_list.into(), uri.into())
    }

    /// Mints a random identifier under `base`.
    pub fn random_idgen(self, base: impl Into<Term>, uri: impl Into<Term>) -> Result<Self> {
        self.slots(
            Operation::RandomKey,
            vec![
                ("base", SlotKind::Data, base.into()),
                ("uri", SlotKind::Node, uri.into()),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_parts() {
        assert_eq!(
            concat_parts("v:First v:Last"),
            vec![
                Term::Var("First".into()),
                Term::Text(" ".into()),
                Term::Var("Last".into()),
            ]
        );
        assert_eq!(concat_parts("plain"), vec![Term::Text("plain".into())]);
    }
}

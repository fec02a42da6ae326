use serde_json::{Value, json};

/// A compiled path expression.
///
/// `Sequence` and `Or` produced by the parser always hold two or more
/// children; a single operand is returned unwrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// One step along a predicate. `None` is the `.` wildcard.
    Predicate(Option<String>),
    /// One step backwards along a predicate (`<name>`).
    InversePredicate(String),
    Sequence(Vec<PathPattern>),
    Or(Vec<PathPattern>),
    Star(Box<PathPattern>),
    Plus(Box<PathPattern>),
    Times {
        pattern: Box<PathPattern>,
        from: u64,
        to: u64,
    },
}

impl PathPattern {
    pub fn predicate(name: impl Into<String>) -> Self {
        PathPattern::Predicate(Some(name.into()))
    }

    pub fn wildcard() -> Self {
        PathPattern::Predicate(None)
    }

    pub fn inverse(name: impl Into<String>) -> Self {
        PathPattern::InversePredicate(name.into())
    }

    pub fn star(inner: PathPattern) -> Self {
        PathPattern::Star(Box::new(inner))
    }

    pub fn plus(inner: PathPattern) -> Self {
        PathPattern::Plus(Box::new(inner))
    }

    pub fn times(inner: PathPattern, from: u64, to: u64) -> Self {
        PathPattern::Times {
            pattern: Box::new(inner),
            from,
            to,
        }
    }

    /// Builds a sequence, collapsing a single step to itself.
    pub fn sequence(mut steps: Vec<PathPattern>) -> Self {
        if steps.len() == 1 {
            steps.remove(0)
        } else {
            PathPattern::Sequence(steps)
        }
    }

    /// Builds an alternation, collapsing a single branch to itself.
    pub fn or(mut branches: Vec<PathPattern>) -> Self {
        if branches.len() == 1 {
            branches.remove(0)
        } else {
            PathPattern::Or(branches)
        }
    }

    /// Rewrites every predicate name with `f`, e.g. for vocabulary expansion.
    pub fn map_predicates(self, f: &impl Fn(String) -> String) -> Self {
        match self {
            PathPattern::Predicate(name) => PathPattern::Predicate(name.map(f)),
            PathPattern::InversePredicate(name) => PathPattern::InversePredicate(f(name)),
            PathPattern::Sequence(steps) => {
                PathPattern::Sequence(steps.into_iter().map(|p| p.map_predicates(f)).collect())
            }
            PathPattern::Or(branches) => {
                PathPattern::Or(branches.into_iter().map(|p| p.map_predicates(f)).collect())
            }
            PathPattern::Star(inner) => PathPattern::star(inner.map_predicates(f)),
            PathPattern::Plus(inner) => PathPattern::plus(inner.map_predicates(f)),
            PathPattern::Times { pattern, from, to } => {
                PathPattern::times(pattern.map_predicates(f), from, to)
            }
        }
    }

    /// Serializes into the wire shape embedded under a `Path` node's `pattern`.
    pub fn to_json(&self) -> Value {
        match self {
            PathPattern::Predicate(Some(name)) => {
                json!({"@type": "PathPredicate", "predicate": name})
            }
            PathPattern::Predicate(None) => json!({"@type": "PathPredicate"}),
            PathPattern::InversePredicate(name) => {
                json!({"@type": "InversePathPredicate", "predicate": name})
            }
            PathPattern::Sequence(steps) => json!({
                "@type": "PathSequence",
                "sequence": steps.iter().map(PathPattern::to_json).collect::<Vec<_>>(),
            }),
            PathPattern::Or(branches) => json!({
                "@type": "PathOr",
                "or": branches.iter().map(PathPattern::to_json).collect::<Vec<_>>(),
            }),
            PathPattern::Star(inner) => json!({"@type": "PathStar", "star": inner.to_json()}),
            PathPattern::Plus(inner) => json!({"@type": "PathPlus", "plus": inner.to_json()}),
            PathPattern::Times { pattern, from, to } => json!({
                "@type": "PathTimes",
                "from": from,
                "to": to,
                "times": pattern.to_json(),
            }),
        }
    }
}

impl std::fmt::Display for PathPattern {
    /// Renders the pattern back into the textual grammar.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn grouped(f: &mut std::fmt::Formatter<'_>, p: &PathPattern) -> std::fmt::Result {
            match p {
                PathPattern::Sequence(_) | PathPattern::Or(_) => write!(f, "({})", p),
                _ => write!(f, "{}", p),
            }
        }

        match self {
            PathPattern::Predicate(Some(name)) => write!(f, "{}", name),
            PathPattern::Predicate(None) => write!(f, "."),
            PathPattern::InversePredicate(name) => write!(f, "<{}", name),
            PathPattern::Sequence(steps) => {
                for (i, step) in steps.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", step)?;
                }
                Ok(())
            }
            PathPattern::Or(branches) => {
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    grouped(f, branch)?;
                }
                Ok(())
            }
            PathPattern::Star(inner) => {
                grouped(f, inner)?;
                write!(f, "*")
            }
            PathPattern::Plus(inner) => {
                grouped(f, inner)?;
                write!(f, "+")
            }
            PathPattern::Times { pattern, from, to } => {
                grouped(f, pattern)?;
                write!(f, "{{{},{}}}", from, to)
            }
        }
    }
}

//! Static metadata for every builder operation.
//!
//! Tooling can enumerate the field names an operation writes without
//! building anything:
//!
//! ```text
//! Operation::from_name("join").map(Operation::parameters)
//!     == Some(&["list", "separator", "result"])
//! ```

use crate::taint::is_update_operation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // Triples and graphs
    Triple,
    AddedTriple,
    RemovedTriple,
    Quad,
    AddedQuad,
    RemovedQuad,
    AddTriple,
    AddQuad,
    DeleteTriple,
    DeleteQuad,
    UpdateTriple,
    UpdateQuad,
    Star,
    Path,
    Size,
    TripleCount,
    Subsumption,
    IsA,
    TypeOf,
    Typecast,

    // Combinators and sub-query hosts
    And,
    Or,
    Not,
    Optional,
    Once,
    Immediately,
    When,
    Select,
    Distinct,
    Limit,
    Start,
    OrderBy,
    GroupBy,
    Count,
    From,
    Into,
    Using,
    Comment,
    True,

    // Comparison
    Equals,
    Less,
    Greater,
    Like,

    // Strings
    Trim,
    Concatenate,
    Join,
    Split,
    Substring,
    Upper,
    Lower,
    Pad,
    Regexp,
    Length,

    // Lists and sets
    Member,
    Sum,
    Slice,
    Dot,
    SetDifference,
    SetIntersection,
    SetUnion,
    SetMember,
    ListToSet,

    // Arithmetic
    Eval,
    Plus,
    Minus,
    Times,
    Divide,
    Div,
    Exp,
    Floor,

    // Keys
    LexicalKey,
    HashKey,
    RandomKey,

    // Documents
    InsertDocument,
    UpdateDocument,
    DeleteDocument,
    ReadDocument,
}

const TRIPLE: &[&str] = &["subject", "predicate", "object"];
const QUAD: &[&str] = &["subject", "predicate", "object", "graph"];
const QUERY: &[&str] = &["query"];
const BINARY: &[&str] = &["left", "right"];
const SET_OP: &[&str] = &["list_a", "list_b", "result"];
const KEY: &[&str] = &["base", "key_list", "uri"];
const WRITE_DOC: &[&str] = &["document", "identifier"];

impl Operation {
    pub const ALL: [Operation; 77] = [
        Operation::Triple,
        Operation::AddedTriple,
        Operation::RemovedTriple,
        Operation::Quad,
        Operation::AddedQuad,
        Operation::RemovedQuad,
        Operation::AddTriple,
        Operation::AddQuad,
        Operation::DeleteTriple,
        Operation::DeleteQuad,
        Operation::UpdateTriple,
        Operation::UpdateQuad,
        Operation::Star,
        Operation::Path,
        Operation::Size,
        Operation::TripleCount,
        Operation::Subsumption,
        Operation::IsA,
        Operation::TypeOf,
        Operation::Typecast,
        Operation::And,
        Operation::Or,
        Operation::Not,
        Operation::Optional,
        Operation::Once,
        Operation::Immediately,
        Operation::When,
        Operation::Select,
        Operation::Distinct,
        Operation::Limit,
        Operation::Start,
        Operation::OrderBy,
        Operation::GroupBy,
        Operation::Count,
        Operation::From,
        Operation::Into,
        Operation::Using,
        Operation::Comment,
        Operation::True,
        Operation::Equals,
        Operation::Less,
        Operation::Greater,
        Operation::Like,
        Operation::Trim,
        Operation::Concatenate,
        Operation::Join,
        Operation::Split,
        Operation::Substring,
        Operation::Upper,
        Operation::Lower,
        Operation::Pad,
        Operation::Regexp,
        Operation::Length,
        Operation::Member,
        Operation::Sum,
        Operation::Slice,
        Operation::Dot,
        Operation::SetDifference,
        Operation::SetIntersection,
        Operation::SetUnion,
        Operation::SetMember,
        Operation::ListToSet,
        Operation::Eval,
        Operation::Plus,
        Operation::Minus,
        Operation::Times,
        Operation::Divide,
        Operation::Div,
        Operation::Exp,
        Operation::Floor,
        Operation::LexicalKey,
        Operation::HashKey,
        Operation::RandomKey,
        Operation::InsertDocument,
        Operation::UpdateDocument,
        Operation::DeleteDocument,
        Operation::ReadDocument,
    ];

    /// Builder method name, AST discriminator and ordered field names.
    fn entry(self) -> (&'static str, &'static str, &'static [&'static str]) {
        use Operation::*;
        match self {
            Triple => ("triple", "Triple", TRIPLE),
            AddedTriple => ("added_triple", "AddedTriple", TRIPLE),
            RemovedTriple => ("removed_triple", "DeletedTriple", TRIPLE),
            Quad => ("quad", "Triple", QUAD),
            AddedQuad => ("added_quad", "AddedTriple", QUAD),
            RemovedQuad => ("removed_quad", "DeletedTriple", QUAD),
            AddTriple => ("add_triple", "AddTriple", TRIPLE),
            AddQuad => ("add_quad", "AddTriple", QUAD),
            DeleteTriple => ("delete_triple", "DeleteTriple", TRIPLE),
            DeleteQuad => ("delete_quad", "DeleteTriple", QUAD),
            UpdateTriple => ("update_triple", "And", TRIPLE),
            UpdateQuad => ("update_quad", "And", QUAD),
            Star => ("star", "Triple", &["graph", "subject", "predicate", "object"]),
            Path => ("path", "Path", &["subject", "pattern", "object", "path"]),
            Size => ("size", "Size", &["resource", "size"]),
            TripleCount => ("triple_count", "TripleCount", &["resource", "triple_count"]),
            Subsumption => ("subsumption", "Subsumption", &["parent", "child"]),
            IsA => ("isa", "IsA", &["element", "type"]),
            TypeOf => ("type_of", "TypeOf", &["value", "type"]),
            Typecast => ("typecast", "Typecast", &["value", "type", "result"]),
            And => ("and", "And", &["and"]),
            Or => ("or", "Or", &["or"]),
            Not => ("not", "Not", QUERY),
            Optional => ("opt", "Optional", QUERY),
            Once => ("once", "Once", QUERY),
            Immediately => ("immediately", "Immediately", QUERY),
            When => ("when", "When", &["query", "consequent"]),
            Select => ("select", "Select", &["variables", "query"]),
            Distinct => ("distinct", "Distinct", &["variables", "query"]),
            Limit => ("limit", "Limit", &["limit", "query"]),
            Start => ("start", "Start", &["start", "query"]),
            OrderBy => ("order_by", "OrderBy", &["ordering", "query"]),
            GroupBy => ("group_by", "GroupBy", &["group_by", "template", "grouped", "query"]),
            Count => ("count", "Count", &["count", "query"]),
            From => ("from_graph", "From", &["graph", "query"]),
            Into => ("into_graph", "Into", &["graph", "query"]),
            Using => ("using", "Using", &["collection", "query"]),
            Comment => ("comment", "Comment", &["comment", "query"]),
            True => ("truth", "True", &[]),
            Equals => ("eq", "Equals", BINARY),
            Less => ("less", "Less", BINARY),
            Greater => ("greater", "Greater", BINARY),
            Like => ("like", "Like", &["left", "right", "similarity"]),
            Trim => ("trim", "Trim", &["untrimmed", "trimmed"]),
            Concatenate => ("concat", "Concatenate", &["list", "result"]),
            Join => ("join", "Join", &["list", "separator", "result"]),
            Split => ("split", "Split", &["string", "pattern", "list"]),
            Substring => (
                "substr",
                "Substring",
                &["string", "before", "length", "after", "substring"],
            ),
            Upper => ("upper", "Upper", &["mixed", "upper"]),
            Lower => ("lower", "Lower", &["mixed", "lower"]),
            Pad => ("pad", "Pad", &["string", "char", "times", "result"]),
            Regexp => ("regexp", "Regexp", &["pattern", "string", "result"]),
            Length => ("length", "Length", &["list", "length"]),
            Member => ("member", "Member", &["member", "list"]),
            Sum => ("sum", "Sum", &["list", "result"]),
            Slice => ("slice", "Slice", &["list", "result", "start", "end"]),
            Dot => ("dot", "Dot", &["document", "field", "value"]),
            SetDifference => ("set_difference", "SetDifference", SET_OP),
            SetIntersection => ("set_intersection", "SetIntersection", SET_OP),
            SetUnion => ("set_union", "SetUnion", SET_OP),
            SetMember => ("set_member", "SetMember", &["element", "set"]),
            ListToSet => ("list_to_set", "ListToSet", &["list", "set"]),
            Eval => ("eval", "Eval", &["expression", "result"]),
            Plus => ("plus", "Plus", BINARY),
            Minus => ("minus", "Minus", BINARY),
            Times => ("times", "Times", BINARY),
            Divide => ("divide", "Divide", BINARY),
            Div => ("div", "Div", BINARY),
            Exp => ("exp", "Exp", BINARY),
            Floor => ("floor", "Floor", &["argument"]),
            LexicalKey => ("idgen", "LexicalKey", KEY),
            HashKey => ("hash", "HashKey", KEY),
            RandomKey => ("random_idgen", "RandomKey", &["base", "uri"]),
            InsertDocument => ("insert_document", "InsertDocument", WRITE_DOC),
            UpdateDocument => ("update_document", "UpdateDocument", WRITE_DOC),
            DeleteDocument => ("delete_document", "DeleteDocument", &["identifier"]),
            ReadDocument => ("read_document", "ReadDocument", &["identifier", "document"]),
        }
    }

    pub fn name(self) -> &'static str {
        self.entry().0
    }

    pub fn discriminator(self) -> &'static str {
        self.entry().1
    }

    pub fn parameters(self) -> &'static [&'static str] {
        self.entry().2
    }

    /// Whether the node this operation writes mutates the database.
    ///
    /// The composite update operations expand into an `And` that contains
    /// writes, so they count as well.
    pub fn is_update(self) -> bool {
        matches!(self, Operation::UpdateTriple | Operation::UpdateQuad)
            || is_update_operation(self.discriminator())
    }

    /// Looks up an operation by builder method name or discriminator.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.name() == name)
            .or_else(|| {
                Self::ALL.iter().copied().find(|op| {
                    op.discriminator() == name
                        && !matches!(op, Operation::UpdateTriple | Operation::UpdateQuad)
                })
            })
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

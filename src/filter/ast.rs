use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

/// Logical connective joining the members of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "and" => Some(Connective::And),
            "or" => Some(Connective::Or),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOp {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "eq" => Some(ComparisonOp::Eq),
            "ne" => Some(ComparisonOp::Ne),
            "lt" => Some(ComparisonOp::Lt),
            "le" => Some(ComparisonOp::Le),
            "gt" => Some(ComparisonOp::Gt),
            "ge" => Some(ComparisonOp::Ge),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodName {
    Contains,
    StartsWith,
    EndsWith,
    In,
    NotIn,
}

impl MethodName {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "contains" => Some(MethodName::Contains),
            "startswith" => Some(MethodName::StartsWith),
            "endswith" => Some(MethodName::EndsWith),
            "in" => Some(MethodName::In),
            "notin" => Some(MethodName::NotIn),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MethodName::Contains => "contains",
            MethodName::StartsWith => "startswith",
            MethodName::EndsWith => "endswith",
            MethodName::In => "in",
            MethodName::NotIn => "notin",
        }
    }

    /// Exact argument count, property included. `None` means variadic.
    pub fn arity(&self) -> Option<usize> {
        match self {
            MethodName::Contains | MethodName::StartsWith | MethodName::EndsWith => Some(2),
            MethodName::In | MethodName::NotIn => None,
        }
    }
}

/// Tag used by the compiler to pick the emitted condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Group,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Contains,
    StartsWith,
    EndsWith,
    In,
    NotIn,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Group => "group",
            NodeKind::Eq => "eq",
            NodeKind::Ne => "ne",
            NodeKind::Lt => "lt",
            NodeKind::Le => "le",
            NodeKind::Gt => "gt",
            NodeKind::Ge => "ge",
            NodeKind::Contains => "contains",
            NodeKind::StartsWith => "startswith",
            NodeKind::EndsWith => "endswith",
            NodeKind::In => "in",
            NodeKind::NotIn => "notin",
        };
        f.write_str(name)
    }
}

/// A scalar value written in the filter.
///
/// The bare word `null` yields `String(None)`: a string literal with no value
/// rather than a dedicated null type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    String(Option<String>),
    Number(i64),
    Boolean(bool),
    Date(DateTime<Utc>),
}

impl Literal {
    /// Textual form used when a literal is embedded in a regular expression
    pub fn to_text(&self) -> String {
        match self {
            Literal::String(value) => value.clone().unwrap_or_default(),
            Literal::Number(n) => n.to_string(),
            Literal::Boolean(b) => b.to_string(),
            Literal::Date(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// A path into the target document, e.g. `author/name` or `meta.tags`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Property(PropertyRef),
    Literal(Literal),
}

impl Operand {
    pub fn property(name: impl Into<String>) -> Self {
        Operand::Property(PropertyRef { name: name.into() })
    }

    pub fn as_property(&self) -> Option<&PropertyRef> {
        match self {
            Operand::Property(prop) => Some(prop),
            Operand::Literal(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub left: Operand,
    pub right: Operand,
    pub op: ComparisonOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub name: MethodName,
    pub args: Vec<Operand>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Group(BooleanGroup),
    Comparison(Comparison),
    Method(MethodCall),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Group(_) => NodeKind::Group,
            Node::Comparison(cmp) => match cmp.op {
                ComparisonOp::Eq => NodeKind::Eq,
                ComparisonOp::Ne => NodeKind::Ne,
                ComparisonOp::Lt => NodeKind::Lt,
                ComparisonOp::Le => NodeKind::Le,
                ComparisonOp::Gt => NodeKind::Gt,
                ComparisonOp::Ge => NodeKind::Ge,
            },
            Node::Method(call) => match call.name {
                MethodName::Contains => NodeKind::Contains,
                MethodName::StartsWith => NodeKind::StartsWith,
                MethodName::EndsWith => NodeKind::EndsWith,
                MethodName::In => NodeKind::In,
                MethodName::NotIn => NodeKind::NotIn,
            },
        }
    }
}

/// Sibling clauses joined by at most one connective.
///
/// `connective` is `None` only when there is at most one member; the single
/// member is then compiled as if it stood alone.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BooleanGroup {
    pub connective: Option<Connective>,
    pub members: Vec<Node>,
}

impl BooleanGroup {
    pub fn single(node: Node) -> Self {
        Self {
            connective: None,
            members: vec![node],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Nesting depth of groups below and including this one
    pub fn depth(&self) -> usize {
        1 + self
            .members
            .iter()
            .map(|member| match member {
                Node::Group(group) => group.depth(),
                _ => 0,
            })
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_dispatch_tags() {
        let cmp = Node::Comparison(Comparison {
            left: Operand::property("stars"),
            right: Operand::Literal(Literal::Number(2)),
            op: ComparisonOp::Ge,
        });
        assert_eq!(cmp.kind(), NodeKind::Ge);

        let call = Node::Method(MethodCall {
            name: MethodName::NotIn,
            args: vec![Operand::property("pages")],
        });
        assert_eq!(call.kind(), NodeKind::NotIn);
        assert_eq!(call.kind().to_string(), "notin");
    }

    #[test]
    fn test_group_depth() {
        let leaf = Node::Comparison(Comparison {
            left: Operand::property("a"),
            right: Operand::Literal(Literal::Boolean(true)),
            op: ComparisonOp::Eq,
        });
        let inner = BooleanGroup::single(leaf.clone());
        let outer = BooleanGroup {
            connective: Some(Connective::And),
            members: vec![Node::Group(inner), leaf],
        };
        assert_eq!(outer.depth(), 2);
        assert_eq!(BooleanGroup::default().depth(), 1);
    }

    #[test]
    fn test_literal_text() {
        assert_eq!(Literal::String(None).to_text(), "");
        assert_eq!(Literal::Number(-3).to_text(), "-3");
        let dt = "2024-01-31T10:20:30.123Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(Literal::Date(dt).to_text(), "2024-01-31T10:20:30.123Z");
    }
}

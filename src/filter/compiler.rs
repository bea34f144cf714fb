use super::ast::{
    BooleanGroup, Comparison, ComparisonOp, Connective, Literal, MethodCall, MethodName, Node,
    Operand,
};
use chrono::{DateTime, SecondsFormat, Utc};
use log::trace;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Operators of the document-store query vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Nin,
    Regex,
}

impl QueryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryOperator::Eq => "$eq",
            QueryOperator::Ne => "$ne",
            QueryOperator::Gt => "$gt",
            QueryOperator::Gte => "$gte",
            QueryOperator::Lt => "$lt",
            QueryOperator::Lte => "$lte",
            QueryOperator::In => "$in",
            QueryOperator::Nin => "$nin",
            QueryOperator::Regex => "$regex",
        }
    }
}

/// Value side of a compiled condition.
///
/// Dates serialize as extended JSON (`{"$date": "..."}`) so they stay
/// distinguishable from plain strings.
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateValue {
    Null,
    String(String),
    Int(i64),
    Bool(bool),
    Date(DateTime<Utc>),
    Array(Vec<PredicateValue>),
}

impl Serialize for PredicateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PredicateValue::Null => serializer.serialize_unit(),
            PredicateValue::String(s) => serializer.serialize_str(s),
            PredicateValue::Int(n) => serializer.serialize_i64(*n),
            PredicateValue::Bool(b) => serializer.serialize_bool(*b),
            PredicateValue::Date(dt) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$date", &dt.to_rfc3339_opts(SecondsFormat::Millis, true))?;
                map.end()
            }
            PredicateValue::Array(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `{ "<op>": <value> }` under a field key
    Operator {
        op: QueryOperator,
        value: PredicateValue,
    },
    /// `[ {...}, ... ]` under `$and` / `$or`
    Logical(Vec<Predicate>),
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Condition::Operator { op, value } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(op.as_str(), value)?;
                map.end()
            }
            Condition::Logical(predicates) => predicates.serialize(serializer),
        }
    }
}

/// A compiled filter: keys are field paths or `$and` / `$or`.
///
/// Inserting a key that is already present replaces its condition in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Predicate {
    entries: Vec<(String, Condition)>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, condition: Condition) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = condition,
            None => self.entries.push((key, condition)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Condition> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, condition)| condition)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, condition) in &self.entries {
            map.serialize_entry(key, condition)?;
        }
        map.end()
    }
}

/// Where compiled conditions are written during traversal
enum Sink<'a> {
    Object(&'a mut Predicate),
    List(&'a mut Vec<Predicate>),
}

impl Sink<'_> {
    fn emit(&mut self, key: String, condition: Condition) {
        match self {
            Sink::Object(predicate) => predicate.insert(key, condition),
            Sink::List(list) => {
                let mut predicate = Predicate::new();
                predicate.insert(key, condition);
                list.push(predicate);
            }
        }
    }
}

/// Compile a parsed filter into a predicate. Never fails on a parsed tree.
pub fn compile(root: BooleanGroup) -> Predicate {
    let mut predicate = Predicate::new();
    visit_group(root, &mut Sink::Object(&mut predicate));
    predicate
}

fn visit_group(group: BooleanGroup, sink: &mut Sink<'_>) {
    match group.connective {
        None => {
            for member in group.members {
                visit_node(member, sink);
            }
        }
        Some(connective) => {
            let mut list = Vec::with_capacity(group.members.len());
            {
                let mut inner = Sink::List(&mut list);
                for member in group.members {
                    visit_node(member, &mut inner);
                }
            }
            let key = match connective {
                Connective::And => "$and",
                Connective::Or => "$or",
            };
            sink.emit(key.to_string(), Condition::Logical(list));
        }
    }
}

fn visit_node(node: Node, sink: &mut Sink<'_>) {
    trace!("Compiling {} node", node.kind());
    match node {
        Node::Group(group) => visit_group(group, sink),
        Node::Comparison(comparison) => {
            let (field, condition) = compile_comparison(comparison);
            sink.emit(field, condition);
        }
        Node::Method(call) => {
            let (field, condition) = compile_method(call);
            sink.emit(field, condition);
        }
    }
}

fn compile_comparison(comparison: Comparison) -> (String, Condition) {
    let op = match comparison.op {
        ComparisonOp::Eq => QueryOperator::Eq,
        ComparisonOp::Ne => QueryOperator::Ne,
        ComparisonOp::Lt => QueryOperator::Lt,
        ComparisonOp::Le => QueryOperator::Lte,
        ComparisonOp::Gt => QueryOperator::Gt,
        ComparisonOp::Ge => QueryOperator::Gte,
    };
    (
        field_path(comparison.left),
        Condition::Operator {
            op,
            value: to_value(comparison.right),
        },
    )
}

fn compile_method(call: MethodCall) -> (String, Condition) {
    let mut args = call.args.into_iter();
    let field = args.next().map(field_path).unwrap_or_default();

    let (op, value) = match call.name {
        MethodName::In => (
            QueryOperator::In,
            PredicateValue::Array(args.map(to_value).collect()),
        ),
        MethodName::NotIn => (
            QueryOperator::Nin,
            PredicateValue::Array(args.map(to_value).collect()),
        ),
        MethodName::Contains => (
            QueryOperator::Regex,
            PredicateValue::String(escape_regex(&regex_text(args.next()))),
        ),
        MethodName::StartsWith => (
            QueryOperator::Regex,
            PredicateValue::String(format!("^{}", escape_regex(&regex_text(args.next())))),
        ),
        MethodName::EndsWith => (
            QueryOperator::Regex,
            PredicateValue::String(format!("{}$", escape_regex(&regex_text(args.next())))),
        ),
    };

    (field, Condition::Operator { op, value })
}

fn field_path(operand: Operand) -> String {
    match operand {
        Operand::Property(prop) => prop.name,
        Operand::Literal(lit) => lit.to_text(),
    }
}

fn to_value(operand: Operand) -> PredicateValue {
    match operand {
        Operand::Property(prop) => PredicateValue::String(prop.name),
        Operand::Literal(Literal::String(Some(s))) => PredicateValue::String(s),
        Operand::Literal(Literal::String(None)) => PredicateValue::Null,
        Operand::Literal(Literal::Number(n)) => PredicateValue::Int(n),
        Operand::Literal(Literal::Boolean(b)) => PredicateValue::Bool(b),
        Operand::Literal(Literal::Date(dt)) => PredicateValue::Date(dt),
    }
}

// The parser only admits a non-null string as the second argument.
fn regex_text(operand: Option<Operand>) -> String {
    match operand {
        Some(Operand::Literal(Literal::String(Some(text)))) => text,
        _ => String::new(),
    }
}

/// Backslash-escape regex metacharacters so user text matches literally
pub fn escape_regex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_whitespace()
            || matches!(
                c,
                '-' | '[' | ']' | '{' | '}' | '(' | ')' | '*' | '+' | '?' | '.' | ',' | '\\'
                    | '^' | '$' | '|' | '#'
            )
        {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

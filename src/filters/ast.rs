use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Typed literal produced by the value coercer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Number(f64),
    Boolean(bool),
    /// Always UTC; date-only literals are midnight of that day
    Date(DateTime<Utc>),
}

/// Timestamp layout used when a date is written back out
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

impl Value {
    /// The value without literal quoting, e.g. for substring matching
    pub fn to_plain_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Date(d) => d.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Renders the value as a filter literal that coerces back to the same value
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(_) | Value::Boolean(_) => write!(f, "{}", self.to_plain_string()),
            Value::String(s) if s.contains('\'') => write!(f, "\"{}\"", s),
            Value::String(_) | Value::Date(_) => write!(f, "'{}'", self.to_plain_string()),
        }
    }
}

/// Logical operators for combining comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    /// Keyword as it appears in filter text
    pub fn keyword(self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        }
    }
}

/// Comparison operators recognised inside a single clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    /// `~`, resolved to substring or array membership at compile time
    Contains,
}

impl ComparisonOp {
    /// Operator tokens in match priority order
    pub const PRIORITY: [(&'static str, ComparisonOp); 7] = [
        ("!=", ComparisonOp::Ne),
        (">=", ComparisonOp::Gte),
        ("<=", ComparisonOp::Lte),
        ("=", ComparisonOp::Eq),
        (">", ComparisonOp::Gt),
        ("<", ComparisonOp::Lt),
        ("~", ComparisonOp::Contains),
    ];

    pub fn token(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Gte => ">=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Lte => "<=",
            ComparisonOp::Contains => "~",
        }
    }
}

/// Parse tree for a filter expression
///
/// Transient: only produced and consumed inside the compiler. Storage code
/// works with [`Condition`](super::condition::Condition) instead.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    Logical { op: LogicalOp, left: Box<AstNode>, right: Box<AstNode> },
    Comparison { field: String, op: ComparisonOp, value: Value },
}

impl AstNode {
    pub fn logical(op: LogicalOp, left: AstNode, right: AstNode) -> Self {
        AstNode::Logical { op, left: Box::new(left), right: Box::new(right) }
    }

    pub fn comparison(field: impl Into<String>, op: ComparisonOp, value: Value) -> Self {
        AstNode::Comparison { field: field.into(), op, value }
    }
}

//! Canonical, parser-independent predicate tree handed to storage backends.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ast::Value;

/// Leaf comparison a backend has to implement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LeafOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Case-insensitive substring match
    Contains,
    /// Membership in a multi-valued field
    ArrayContains,
}

impl LeafOp {
    pub fn token(self) -> &'static str {
        match self {
            LeafOp::Eq => "=",
            LeafOp::Ne => "!=",
            LeafOp::Gt => ">",
            LeafOp::Gte => ">=",
            LeafOp::Lt => "<",
            LeafOp::Lte => "<=",
            LeafOp::Contains | LeafOp::ArrayContains => "~",
        }
    }
}

/// Compiled filter
///
/// `And(vec![])` is the "no filter" condition and matches everything.
/// Compilation flattens nested groups of the same kind, so `a AND b AND c`
/// becomes one `And` with three children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Condition {
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Leaf { field: String, op: LeafOp, value: Value },
}

impl Condition {
    /// Condition that places no restriction on results
    pub fn always() -> Self {
        Condition::And(Vec::new())
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Condition::And(children) if children.is_empty())
    }

    pub fn leaf(field: impl Into<String>, op: LeafOp, value: Value) -> Self {
        Condition::Leaf { field: field.into(), op, value }
    }

    /// All field names referenced anywhere in the tree
    pub fn fields(&self) -> BTreeSet<&str> {
        let mut fields = BTreeSet::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, fields: &mut BTreeSet<&'a str>) {
        match self {
            Condition::And(children) | Condition::Or(children) => {
                for child in children {
                    child.collect_fields(fields);
                }
            }
            Condition::Leaf { field, .. } => {
                fields.insert(field.as_str());
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Condition::And(children) | Condition::Or(children) => {
                children.iter().map(Condition::leaf_count).sum()
            }
            Condition::Leaf { .. } => 1,
        }
    }

    fn is_group(&self) -> bool {
        !matches!(self, Condition::Leaf { .. })
    }
}

/// Renders canonical filter syntax
///
/// Grouped children are always parenthesized, so the output parses back to
/// the same tree regardless of how `AND`/`OR` precedence is resolved.
/// The "no filter" condition renders as an empty string.
impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (children, keyword) = match self {
            Condition::Leaf { field, op, value } => {
                return write!(f, "{}{}{}", field, op.token(), value);
            }
            Condition::And(children) => (children, " AND "),
            Condition::Or(children) => (children, " OR "),
        };

        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                f.write_str(keyword)?;
            }
            if child.is_group() {
                write!(f, "({})", child)?;
            } else {
                write!(f, "{}", child)?;
            }
        }
        Ok(())
    }
}

//! Allow-list validation and AST → [`Condition`] compilation.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::ast::{AstNode, ComparisonOp, LogicalOp};
use super::condition::{Condition, LeafOp};
use super::error::ParseError;
use super::parser::{DEFAULT_MAX_DEPTH, parse_expression_with_limit};
use crate::config::LimitsConfig;

/// Longest filter string accepted by default, in bytes
pub const DEFAULT_MAX_LENGTH: usize = 4096;

/// Field names a filter may reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldAllowList {
    fields: BTreeSet<String>,
}

impl FieldAllowList {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { fields: fields.into_iter().map(Into::into).collect() }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sorted copy of the field names
    pub fn to_vec(&self) -> Vec<String> {
        self.fields.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for FieldAllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Declared storage type of a filterable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    /// Multi-valued field; `~` tests membership instead of substring
    Array,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Array => "array",
        }
    }
}

/// Per-field type hints keyed by field name
pub type FieldTypes = BTreeMap<String, FieldType>;

/// Validate fields and convert a parsed expression into a [`Condition`]
///
/// The tree is walked left subtree first. The first comparison whose field
/// is missing from `allowed` aborts compilation with
/// [`ParseError::Security`]. `~` becomes [`LeafOp::ArrayContains`] for fields
/// hinted as [`FieldType::Array`] and [`LeafOp::Contains`] otherwise.
pub fn compile(
    ast: AstNode,
    allowed: Option<&FieldAllowList>,
    field_types: Option<&FieldTypes>,
) -> Result<Condition, ParseError> {
    match ast {
        AstNode::Logical { op, left, right } => {
            let left = compile(*left, allowed, field_types)?;
            let right = compile(*right, allowed, field_types)?;
            Ok(combine(op, left, right))
        }
        AstNode::Comparison { field, op, value } => {
            if let Some(allowed) = allowed {
                if !allowed.contains(&field) {
                    warn!(field = %field, "Rejected filter on field outside allow-list");
                    return Err(ParseError::Security { field, allowed: allowed.to_vec() });
                }
            }

            let is_array = field_types
                .and_then(|types| types.get(&field))
                .is_some_and(|ty| *ty == FieldType::Array);

            let op = match op {
                ComparisonOp::Eq => LeafOp::Eq,
                ComparisonOp::Ne => LeafOp::Ne,
                ComparisonOp::Gt => LeafOp::Gt,
                ComparisonOp::Gte => LeafOp::Gte,
                ComparisonOp::Lt => LeafOp::Lt,
                ComparisonOp::Lte => LeafOp::Lte,
                ComparisonOp::Contains if is_array => LeafOp::ArrayContains,
                ComparisonOp::Contains => LeafOp::Contains,
            };

            Ok(Condition::Leaf { field, op, value })
        }
    }
}

/// Join two compiled sides, absorbing children of the same group kind
fn combine(op: LogicalOp, left: Condition, right: Condition) -> Condition {
    let mut children = Vec::with_capacity(2);
    for side in [left, right] {
        match (op, side) {
            (LogicalOp::And, Condition::And(nested)) | (LogicalOp::Or, Condition::Or(nested)) => {
                children.extend(nested)
            }
            (_, other) => children.push(other),
        }
    }

    match op {
        LogicalOp::And => Condition::And(children),
        LogicalOp::Or => Condition::Or(children),
    }
}

/// Reusable filter compiler carrying an entity's allow-list, type hints and limits
///
/// # Examples
///
/// ```
/// use oneroster_filter::filters::{FieldAllowList, FilterCompiler};
///
/// let compiler = FilterCompiler::new()
///     .with_allowed_fields(FieldAllowList::new(["status", "role"]));
///
/// assert!(compiler.compile("status='active' AND role='student'").is_ok());
/// assert!(compiler.compile("password='hunter2'").unwrap_err().is_security());
/// ```
#[derive(Debug, Clone)]
pub struct FilterCompiler {
    allowed: Option<FieldAllowList>,
    field_types: FieldTypes,
    max_depth: usize,
    max_length: usize,
}

impl FilterCompiler {
    /// Unrestricted compiler with default limits
    pub fn new() -> Self {
        Self {
            allowed: None,
            field_types: FieldTypes::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    pub fn with_allowed_fields(mut self, allowed: FieldAllowList) -> Self {
        self.allowed = Some(allowed);
        self
    }

    pub fn with_field_types(mut self, field_types: FieldTypes) -> Self {
        self.field_types = field_types;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_limits(self, limits: &LimitsConfig) -> Self {
        self.with_max_depth(limits.max_depth).with_max_length(limits.max_length)
    }

    pub fn allowed_fields(&self) -> Option<&FieldAllowList> {
        self.allowed.as_ref()
    }

    pub fn field_types(&self) -> &FieldTypes {
        &self.field_types
    }

    /// Compile a raw filter string
    ///
    /// Empty or whitespace-only input yields [`Condition::always`].
    pub fn compile(&self, filter: &str) -> Result<Condition, ParseError> {
        if filter.trim().is_empty() {
            return Ok(Condition::always());
        }

        if filter.len() > self.max_length {
            return Err(ParseError::syntax(format!(
                "filter exceeds maximum length of {} bytes",
                self.max_length
            )));
        }

        let ast = parse_expression_with_limit(filter, self.max_depth)?;
        let condition = compile(ast, self.allowed.as_ref(), Some(&self.field_types))?;

        debug!(leaves = condition.leaf_count(), "Compiled filter");
        Ok(condition)
    }
}

impl Default for FilterCompiler {
    fn default() -> Self {
        Self::new()
    }
}

//! OneRoster `filter` query parameter support.
//!
//! Raw filter text flows through [`parser`] (built on [`scanner`] and
//! [`coerce`]) into a transient [`AstNode`], then [`compiler`] checks it
//! against a field allow-list and produces the [`Condition`] storage code
//! consumes. [`apply`] evaluates a `Condition` against JSON records in memory.

pub mod apply;
pub mod ast;
pub mod coerce;
pub mod compiler;
pub mod condition;
pub mod error;
pub mod parser;
pub mod scanner;

pub use apply::{apply_condition, evaluate};
pub use ast::{AstNode, ComparisonOp, LogicalOp, Value};
pub use coerce::coerce;
pub use compiler::{FieldAllowList, FieldType, FieldTypes, FilterCompiler, compile};
pub use condition::{Condition, LeafOp};
pub use error::{ParseError, StatusInfo};
pub use parser::{parse_comparison, parse_expression};

/// Compile a filter string, optionally restricted to an allow-list of fields
///
/// Empty or whitespace-only filters compile to [`Condition::always`].
///
/// # Examples
///
/// ```
/// use oneroster_filter::filters::{Condition, FieldAllowList, LeafOp, Value, compile_filter};
///
/// let condition = compile_filter("score>=90", None).unwrap();
/// assert_eq!(condition, Condition::leaf("score", LeafOp::Gte, Value::Number(90.0)));
///
/// let allowed = FieldAllowList::new(["status"]);
/// let err = compile_filter("secret='x'", Some(&allowed)).unwrap_err();
/// assert_eq!(err.field(), Some("secret"));
/// ```
pub fn compile_filter(
    filter: &str,
    allowed: Option<&FieldAllowList>,
) -> Result<Condition, ParseError> {
    match allowed {
        Some(allowed) => FilterCompiler::new().with_allowed_fields(allowed.clone()).compile(filter),
        None => FilterCompiler::new().compile(filter),
    }
}

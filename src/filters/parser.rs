//! OneRoster filter expression parser.
//!
//! Parses a client-supplied `filter` query parameter into an [`AstNode`] tree.
//!
//! # Syntax
//!
//! ```text
//! expression := expression AND expression
//!             | expression OR expression
//!             | '(' expression ')'
//!             | comparison
//! comparison := field op value
//! op         := != | >= | <= | = | > | < | ~
//! value      := 'quoted' | "quoted" | bare
//! ```
//!
//! `AND`/`OR` are case-insensitive and must be surrounded by whitespace.
//!
//! # Operator Precedence
//!
//! The whole expression is split at its first top-level `AND` before `OR` is
//! considered at all. So whenever both appear unparenthesized at the same
//! level, `AND` forms the outermost node:
//!
//! ```text
//! a OR b AND c   →   (a OR b) AND c
//! ```
//!
//! Existing clients rely on this, so it is kept as is. Use parentheses to
//! state grouping explicitly.
//!
//! # Examples
//!
//! ```rust
//! # use oneroster_filter::filters::parser::parse_expression;
//! let ast = parse_expression("status='active' AND role='student'").unwrap();
//! let ast = parse_expression("(role='teacher' OR role='aide') AND enabledUser=true").unwrap();
//! let ast = parse_expression("termSourcedIds~'term-123'").unwrap();
//! ```

use super::ast::{AstNode, ComparisonOp, LogicalOp};
use super::coerce::coerce;
use super::error::ParseError;
use super::scanner::{find_top_level_operator, is_fully_wrapped};

/// Maximum number of nested splits and parenthesis unwraps in one filter
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Parse a filter expression with the default nesting limit
pub fn parse_expression(input: &str) -> Result<AstNode, ParseError> {
    parse_expression_with_limit(input, DEFAULT_MAX_DEPTH)
}

/// Parse a filter expression, rejecting input nested deeper than `max_depth`
///
/// Every logical split and every stripped pair of parentheses counts as one
/// level, so a chain of `N` `AND`s needs a limit of at least `N`.
pub fn parse_expression_with_limit(input: &str, max_depth: usize) -> Result<AstNode, ParseError> {
    parse_at_depth(input, 0, max_depth)
}

fn parse_at_depth(input: &str, depth: usize, max_depth: usize) -> Result<AstNode, ParseError> {
    if depth > max_depth {
        return Err(ParseError::syntax(format!(
            "filter nesting exceeds maximum depth of {}",
            max_depth
        )));
    }

    let expr = input.trim();
    if expr.is_empty() {
        return Err(ParseError::syntax("empty expression"));
    }

    // AND is tried across the whole string before OR
    for op in [LogicalOp::And, LogicalOp::Or] {
        if let Some((start, end)) = find_top_level_operator(expr, op) {
            let left = parse_at_depth(&expr[..start], depth + 1, max_depth)?;
            let right = parse_at_depth(&expr[end..], depth + 1, max_depth)?;
            return Ok(AstNode::logical(op, left, right));
        }
    }

    if is_fully_wrapped(expr) {
        return parse_at_depth(&expr[1..expr.len() - 1], depth + 1, max_depth);
    }

    parse_comparison(expr)
}

/// Parse a single `field<op>value` clause
///
/// The clause is split at the first operator occurrence only, so values may
/// themselves contain operator characters (`note='a=b'`). One layer of
/// matching single or double quotes is removed from the value before it is
/// coerced; no other unescaping happens.
pub fn parse_comparison(input: &str) -> Result<AstNode, ParseError> {
    let clause = input.trim();

    let (position, op) = find_comparison_operator(clause).ok_or_else(|| {
        ParseError::syntax_at(format!("no comparison operator found in '{}'", clause), clause)
    })?;

    let field = clause[..position].trim();
    let raw_value = clause[position + op.token().len()..].trim();

    if field.is_empty() {
        return Err(ParseError::syntax_at("missing field name", clause));
    }
    if raw_value.is_empty() {
        return Err(ParseError::syntax_at(format!("missing value for field '{}'", field), clause));
    }

    Ok(AstNode::comparison(field, op, coerce(strip_quotes(raw_value))))
}

/// Locate the leftmost comparison operator
///
/// At each position the operators are tried in [`ComparisonOp::PRIORITY`]
/// order, so `!=` wins over the `=` it contains.
fn find_comparison_operator(clause: &str) -> Option<(usize, ComparisonOp)> {
    clause.char_indices().find_map(|(i, _)| {
        let rest = &clause[i..];
        ComparisonOp::PRIORITY
            .iter()
            .find(|(token, _)| rest.starts_with(token))
            .map(|(_, op)| (i, *op))
    })
}

/// Remove one layer of matching quotes
fn strip_quotes(raw: &str) -> &str {
    for quote in ['\'', '"'] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::ast::Value;

    fn cmp(field: &str, op: ComparisonOp, value: Value) -> AstNode {
        AstNode::comparison(field, op, value)
    }

    fn text(s: &str) -> Value {
        Value::String(s.to_string())
    }

    #[test]
    fn test_find_operator_priority() {
        assert_eq!(find_comparison_operator("a!=b"), Some((1, ComparisonOp::Ne)));
        assert_eq!(find_comparison_operator("a>=b"), Some((1, ComparisonOp::Gte)));
        assert_eq!(find_comparison_operator("a<=b"), Some((1, ComparisonOp::Lte)));
        assert_eq!(find_comparison_operator("a=b"), Some((1, ComparisonOp::Eq)));
        assert_eq!(find_comparison_operator("a>b"), Some((1, ComparisonOp::Gt)));
        assert_eq!(find_comparison_operator("a<b"), Some((1, ComparisonOp::Lt)));
        assert_eq!(find_comparison_operator("a~b"), Some((1, ComparisonOp::Contains)));
        assert_eq!(find_comparison_operator("ab"), None);
    }

    #[test]
    fn test_find_operator_leftmost_position_wins() {
        // '=' at 1 comes before '>=' at 3
        assert_eq!(find_comparison_operator("a=b>=c"), Some((1, ComparisonOp::Eq)));
        assert_eq!(find_comparison_operator("a~b=c"), Some((1, ComparisonOp::Contains)));
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("'active'"), "active");
        assert_eq!(strip_quotes("\"active\""), "active");
        assert_eq!(strip_quotes("''"), "");
        assert_eq!(strip_quotes("'a'b'"), "a'b");
        assert_eq!(strip_quotes("'mixed\""), "'mixed\"");
        assert_eq!(strip_quotes("'"), "'");
        assert_eq!(strip_quotes("bare"), "bare");
    }

    #[test]
    fn test_parse_comparison_basic() {
        assert_eq!(
            parse_comparison("status='active'").unwrap(),
            cmp("status", ComparisonOp::Eq, text("active"))
        );
        assert_eq!(
            parse_comparison("  score >= 90 ").unwrap(),
            cmp("score", ComparisonOp::Gte, Value::Number(90.0))
        );
    }

    #[test]
    fn test_parse_comparison_splits_on_first_operator() {
        assert_eq!(
            parse_comparison("note='a=b'").unwrap(),
            cmp("note", ComparisonOp::Eq, text("a=b"))
        );
        assert_eq!(
            parse_comparison("formula!='x>=y'").unwrap(),
            cmp("formula", ComparisonOp::Ne, text("x>=y"))
        );
    }

    #[test]
    fn test_parse_comparison_quoted_values_are_still_coerced() {
        assert_eq!(
            parse_comparison("enabledUser='TRUE'").unwrap(),
            cmp("enabledUser", ComparisonOp::Eq, Value::Boolean(true))
        );
        assert_eq!(
            parse_comparison("grade=\"10\"").unwrap(),
            cmp("grade", ComparisonOp::Eq, Value::Number(10.0))
        );
    }

    #[test]
    fn test_parse_comparison_no_operator() {
        let err = parse_comparison("status$active").unwrap_err();
        assert!(err.is_syntax());
        assert!(err.to_string().contains("no comparison operator"));
    }

    #[test]
    fn test_parse_comparison_missing_parts() {
        let err = parse_comparison("='active'").unwrap_err();
        assert!(err.to_string().contains("missing field name"));

        let err = parse_comparison("status=").unwrap_err();
        assert!(err.to_string().contains("missing value for field 'status'"));

        let err = parse_comparison("status =   ").unwrap_err();
        assert!(err.to_string().contains("missing value for field 'status'"));
    }

    #[test]
    fn test_parse_expression_and() {
        let ast = parse_expression("status='active' AND role='student'").unwrap();
        assert_eq!(
            ast,
            AstNode::logical(
                LogicalOp::And,
                cmp("status", ComparisonOp::Eq, text("active")),
                cmp("role", ComparisonOp::Eq, text("student")),
            )
        );
    }

    #[test]
    fn test_parse_expression_or() {
        let ast = parse_expression("role='teacher' or role='administrator'").unwrap();
        assert_eq!(
            ast,
            AstNode::logical(
                LogicalOp::Or,
                cmp("role", ComparisonOp::Eq, text("teacher")),
                cmp("role", ComparisonOp::Eq, text("administrator")),
            )
        );
    }

    #[test]
    fn test_parse_expression_and_splits_before_or() {
        let ast = parse_expression("status='active' OR role='student' AND enabledUser='true'").unwrap();
        assert_eq!(
            ast,
            AstNode::logical(
                LogicalOp::And,
                AstNode::logical(
                    LogicalOp::Or,
                    cmp("status", ComparisonOp::Eq, text("active")),
                    cmp("role", ComparisonOp::Eq, text("student")),
                ),
                cmp("enabledUser", ComparisonOp::Eq, Value::Boolean(true)),
            )
        );
    }

    #[test]
    fn test_parse_expression_chain_is_right_nested() {
        let ast = parse_expression("a=1 AND b=2 AND c=3").unwrap();
        assert_eq!(
            ast,
            AstNode::logical(
                LogicalOp::And,
                cmp("a", ComparisonOp::Eq, Value::Number(1.0)),
                AstNode::logical(
                    LogicalOp::And,
                    cmp("b", ComparisonOp::Eq, Value::Number(2.0)),
                    cmp("c", ComparisonOp::Eq, Value::Number(3.0)),
                ),
            )
        );
    }

    #[test]
    fn test_parse_expression_parentheses() {
        let ast = parse_expression("((status='active'))").unwrap();
        assert_eq!(ast, cmp("status", ComparisonOp::Eq, text("active")));

        let ast = parse_expression("(status='active' OR status='tobedeleted') AND role='teacher'").unwrap();
        match ast {
            AstNode::Logical { op: LogicalOp::And, left, .. } => {
                assert!(matches!(*left, AstNode::Logical { op: LogicalOp::Or, .. }));
            }
            other => panic!("Expected AND at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_expression_quoted_keyword_is_literal() {
        let ast = parse_expression("name='Smith AND Sons'").unwrap();
        assert_eq!(ast, cmp("name", ComparisonOp::Eq, text("Smith AND Sons")));
    }

    #[test]
    fn test_parse_expression_empty_group() {
        let err = parse_expression("()").unwrap_err();
        assert!(err.to_string().contains("empty expression"));
    }

    #[test]
    fn test_parse_expression_bad_operand() {
        assert!(parse_expression("a=1 AND b").is_err());
        assert!(parse_expression("a=1 OR ()").is_err());
    }

    #[test]
    fn test_parse_expression_adjacent_groups_not_unwrapped() {
        // Not a single group, so the clause is split at its first '='
        let ast = parse_expression("(a=1)(b=2)").unwrap();
        assert_eq!(ast, cmp("(a", ComparisonOp::Eq, text("1)(b=2)")));
    }

    #[test]
    fn test_parse_expression_depth_limit() {
        let clauses: Vec<String> = (0..=10).map(|i| format!("f{}={}", i, i)).collect();
        let chain = clauses.join(" AND ");

        assert!(parse_expression_with_limit(&chain, 10).is_ok());
        let err = parse_expression_with_limit(&chain, 9).unwrap_err();
        assert!(err.to_string().contains("maximum depth of 9"));
    }

    #[test]
    fn test_parse_expression_paren_depth_limit() {
        let nested = format!("{}a=1{}", "(".repeat(5), ")".repeat(5));
        assert!(parse_expression_with_limit(&nested, 5).is_ok());
        assert!(parse_expression_with_limit(&nested, 4).is_err());
    }
}

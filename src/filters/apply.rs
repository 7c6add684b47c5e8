use std::cmp::Ordering;

use anyhow::{Result, bail};
use chrono::{DateTime, NaiveTime, Utc};
use serde_json::Value as JsonValue;

use super::ast::Value;
use super::coerce::coerce;
use super::condition::{Condition, LeafOp};

/// Apply a condition to JSON records, returning the matching ones
///
/// Every record must be a JSON object. This is the in-memory reference
/// backend; database-backed services translate the [`Condition`] into their
/// own query language instead.
pub fn apply_condition(records: Vec<JsonValue>, condition: &Condition) -> Result<Vec<JsonValue>> {
    if let Some(index) = records.iter().position(|record| !record.is_object()) {
        bail!("Record {} is not a JSON object", index);
    }

    if condition.is_always() {
        return Ok(records);
    }

    Ok(records.into_iter().filter(|record| evaluate(record, condition)).collect())
}

/// Evaluate a condition against a single record
///
/// - Missing or null fields satisfy only `!=`
/// - Numbers compare numerically, accepting numeric strings
/// - Dates compare as instants, accepting RFC 3339 or `YYYY-MM-DD` strings
/// - Strings compare exactly and order lexicographically
/// - Values of incompatible types satisfy only `!=`
pub fn evaluate(record: &JsonValue, condition: &Condition) -> bool {
    match condition {
        Condition::And(children) => children.iter().all(|child| evaluate(record, child)),
        Condition::Or(children) => children.iter().any(|child| evaluate(record, child)),
        Condition::Leaf { field, op, value } => evaluate_leaf(record.get(field), *op, value),
    }
}

fn evaluate_leaf(actual: Option<&JsonValue>, op: LeafOp, expected: &Value) -> bool {
    let actual = match actual {
        None | Some(JsonValue::Null) => return op == LeafOp::Ne,
        Some(actual) => actual,
    };

    match op {
        LeafOp::Contains => contains_text(actual, expected),
        LeafOp::ArrayContains => match actual {
            JsonValue::Array(items) => items.iter().any(|item| element_matches(item, expected)),
            scalar => element_matches(scalar, expected),
        },
        LeafOp::Eq | LeafOp::Ne | LeafOp::Gt | LeafOp::Gte | LeafOp::Lt | LeafOp::Lte => {
            match compare(actual, expected) {
                Some(ordering) => ordering_satisfies(op, ordering),
                None => op == LeafOp::Ne,
            }
        }
    }
}

fn ordering_satisfies(op: LeafOp, ordering: Ordering) -> bool {
    match op {
        LeafOp::Eq => ordering == Ordering::Equal,
        LeafOp::Ne => ordering != Ordering::Equal,
        LeafOp::Gt => ordering == Ordering::Greater,
        LeafOp::Gte => ordering != Ordering::Less,
        LeafOp::Lt => ordering == Ordering::Less,
        LeafOp::Lte => ordering != Ordering::Greater,
        LeafOp::Contains | LeafOp::ArrayContains => false,
    }
}

/// Order `actual` relative to `expected`, if the types are comparable
fn compare(actual: &JsonValue, expected: &Value) -> Option<Ordering> {
    match expected {
        Value::Number(n) => json_number(actual)?.partial_cmp(n),
        Value::Boolean(b) => json_bool(actual).map(|a| a.cmp(b)),
        Value::Date(d) => json_date(actual).map(|a| a.cmp(d)),
        Value::String(s) => actual.as_str().map(|a| a.cmp(s.as_str())),
    }
}

/// Match one array element; GUID references match on their `sourcedId`
fn element_matches(item: &JsonValue, expected: &Value) -> bool {
    match item {
        JsonValue::Object(map) => {
            map.get("sourcedId").is_some_and(|id| element_matches(id, expected))
        }
        other => compare(other, expected) == Some(Ordering::Equal),
    }
}

/// Case-insensitive substring test; arrays match when any element does
///
/// Date literals search for their shortest written form, and also match a
/// record date naming the same instant in another layout.
fn contains_text(actual: &JsonValue, expected: &Value) -> bool {
    let needle = match expected {
        Value::Date(date) => date_needle(date),
        other => other.to_plain_string(),
    }
    .to_lowercase();

    let hit = |value: &JsonValue| {
        json_text(value).is_some_and(|text| text.to_lowercase().contains(&needle))
            || matches!(expected, Value::Date(date) if json_date(value) == Some(*date))
    };

    match actual {
        JsonValue::Array(items) => items.iter().any(hit),
        other => hit(other),
    }
}

/// `YYYY-MM-DD` at midnight, seconds precision when there are no millis
fn date_needle(date: &DateTime<Utc>) -> String {
    if date.time() == NaiveTime::MIN {
        date.format("%Y-%m-%d").to_string()
    } else if date.timestamp_subsec_millis() == 0 {
        date.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        date.format("%Y-%m-%dT%H:%M:%S%.3f").to_string()
    }
}

fn json_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn json_number(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_bool(value: &JsonValue) -> Option<bool> {
    match value {
        JsonValue::Bool(b) => Some(*b),
        JsonValue::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        JsonValue::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

fn json_date(value: &JsonValue) -> Option<DateTime<Utc>> {
    let s = value.as_str()?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
        return Some(parsed.with_timezone(&Utc));
    }
    match coerce(s) {
        Value::Date(date) => Some(date),
        _ => None,
    }
}

//! Literal type inference for comparison values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use super::ast::Value;

static NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("valid number regex"));

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}(T[0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]{3})?Z?)?$")
        .expect("valid date regex")
});

/// Classify a raw literal into a typed [`Value`]
///
/// Rules, first match wins:
/// 1. `true` / `false` (any case) → [`Value::Boolean`]
/// 2. optionally negative integer or decimal → [`Value::Number`]
/// 3. `YYYY-MM-DD` with optional `THH:MM:SS[.mmm][Z]` → [`Value::Date`]
/// 4. anything else → [`Value::String`], unchanged
///
/// Never fails. Times without a `Z` suffix are read as UTC, the same as
/// `Z`-suffixed ones. Strings shaped like dates that do not exist on the
/// calendar (`2024-02-31`) stay strings.
///
/// # Examples
///
/// ```
/// use oneroster_filter::filters::{coerce, Value};
///
/// assert_eq!(coerce("TRUE"), Value::Boolean(true));
/// assert_eq!(coerce("-2.5"), Value::Number(-2.5));
/// assert_eq!(coerce("active"), Value::String("active".to_string()));
/// ```
pub fn coerce(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }

    if NUMBER_PATTERN.is_match(raw) {
        if let Ok(number) = raw.parse::<f64>() {
            return Value::Number(number);
        }
    }

    if DATE_PATTERN.is_match(raw) {
        if let Some(date) = parse_date(raw) {
            return Value::Date(date);
        }
    }

    Value::String(raw.to_string())
}

/// Parse a string already known to match [`DATE_PATTERN`]
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if !raw.contains('T') {
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    let naive = raw.strip_suffix('Z').unwrap_or(raw);
    NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S%.f").ok().map(|dt| dt.and_utc())
}

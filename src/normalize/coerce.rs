//! Defensive coercion primitives shared by every normalizer.
//!
//! The upstream API has shipped the same data under several field names and
//! container shapes over time. Rather than scattering fallback chains
//! through the normalizers, each rule lives here once: alias tables are
//! resolved by [`pick`], containers by [`as_array`], and money by the two
//! amount coercions (zero-defaulting for dashboard metrics,
//! unknown-preserving for group detail).

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

/// Keys under which a decimal wrapper object carries its numeric payload.
const DECIMAL_WRAPPER_KEYS: &[&str] = &["value", "decimal"];

/// Resolve the first present, non-null alias on `source`. Precedence is the
/// order of `aliases`.
pub fn pick<'a>(source: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    let object = source.as_object()?;
    aliases
        .iter()
        .find_map(|alias| object.get(*alias).filter(|value| !value.is_null()))
}

/// String-valued alias lookup.
pub fn pick_str(source: &Value, aliases: &[&str]) -> Option<String> {
    pick(source, aliases).and_then(to_string_value)
}

/// Integer-valued alias lookup (accepts numeric strings).
pub fn pick_i64(source: &Value, aliases: &[&str]) -> Option<i64> {
    pick(source, aliases).and_then(to_i64)
}

/// Zero-defaulting money lookup (the dashboard-metrics discipline).
pub fn pick_amount(source: &Value, aliases: &[&str]) -> f64 {
    to_amount(pick(source, aliases))
}

/// Unknown-preserving money lookup (the group-detail discipline).
pub fn pick_amount_opt(source: &Value, aliases: &[&str]) -> Option<f64> {
    to_amount_opt(pick(source, aliases))
}

/// Coerce a money field, conflating unknown and zero: null/absent -> 0,
/// numbers as-is, parseable strings parsed, decimal wrappers unwrapped,
/// anything else -> 0.
pub fn to_amount(value: Option<&Value>) -> f64 {
    to_amount_opt(value).unwrap_or(0.0)
}

/// Coerce a money field, preserving unknown: null/absent/garbage -> `None`.
pub fn to_amount_opt(value: Option<&Value>) -> Option<f64> {
    let value = value?;
    match value {
        Value::Null => None,
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        Value::Object(fields) => DECIMAL_WRAPPER_KEYS
            .iter()
            .find_map(|key| fields.get(*key))
            .and_then(|inner| to_amount_opt(Some(inner))),
        _ => None,
    }
}

/// Resolve an array that may arrive bare, as `{data: [...]}`, or as
/// `{items: [...]}`, in that precedence order. Anything else is empty.
pub fn as_array(value: Option<&Value>) -> &[Value] {
    let Some(value) = value else { return &[] };
    if let Some(list) = value.as_array() {
        return list;
    }
    for key in ["data", "items"] {
        if let Some(list) = value.get(key).and_then(Value::as_array) {
            return list;
        }
    }
    &[]
}

/// Opaque identifiers arrive as strings or numbers.
pub fn to_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(raw) => Some(raw.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Loose string coercion for display fields.
pub fn to_string_value(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) => Some(raw.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Integer coercion, accepting numeric strings.
pub fn to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(raw) => raw.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Member counts arrive as a number, a member array, or `{count: n}`.
pub fn to_count(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(number) => number.as_i64(),
        Value::Array(list) => Some(list.len() as i64),
        Value::Object(fields) => fields.get("count").and_then(to_i64),
        _ => None,
    }
}

/// Parse a timestamp that may be RFC 3339 or a bare `YYYY-MM-DD` date.
/// Unparseable input is unknown, never an error.
pub fn to_datetime(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let raw = value?.as_str()?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pick_respects_alias_precedence() {
        let source = json!({"totalContribution": 5, "totalContributed": 9});
        let aliases = ["totalContributions", "totalContribution", "totalContributed"];
        assert_eq!(pick(&source, &aliases).unwrap(), &json!(5));

        let source = json!({"totalContributions": null, "totalContributed": 9});
        assert_eq!(pick(&source, &aliases).unwrap(), &json!(9));

        assert!(pick(&json!({}), &aliases).is_none());
        assert!(pick(&json!("not an object"), &aliases).is_none());
    }

    #[test]
    fn amount_coercion_defaults_to_zero() {
        assert_eq!(to_amount(None), 0.0);
        assert_eq!(to_amount(Some(&Value::Null)), 0.0);
        assert_eq!(to_amount(Some(&json!(12.5))), 12.5);
        assert_eq!(to_amount(Some(&json!("42.75"))), 42.75);
        assert_eq!(to_amount(Some(&json!("not a number"))), 0.0);
        assert_eq!(to_amount(Some(&json!(true))), 0.0);
        assert_eq!(to_amount(Some(&json!([1, 2]))), 0.0);
    }

    #[test]
    fn amount_coercion_unwraps_decimal_wrappers() {
        assert_eq!(to_amount(Some(&json!({"value": "19.99"}))), 19.99);
        assert_eq!(to_amount(Some(&json!({"decimal": 7}))), 7.0);
        assert_eq!(to_amount(Some(&json!({"unrelated": 7}))), 0.0);
    }

    #[test]
    fn optional_amount_preserves_unknown() {
        assert_eq!(to_amount_opt(None), None);
        assert_eq!(to_amount_opt(Some(&Value::Null)), None);
        assert_eq!(to_amount_opt(Some(&json!("garbage"))), None);
        assert_eq!(to_amount_opt(Some(&json!(0))), Some(0.0));
        assert_eq!(to_amount_opt(Some(&json!("0"))), Some(0.0));
    }

    #[test]
    fn arrays_resolve_bare_then_data_then_items() {
        assert_eq!(as_array(Some(&json!([1, 2]))).len(), 2);
        assert_eq!(as_array(Some(&json!({"data": [1]}))).len(), 1);
        assert_eq!(as_array(Some(&json!({"items": [1, 2, 3]}))).len(), 3);
        // Bare array wins over wrapped keys; `data` wins over `items`.
        assert_eq!(
            as_array(Some(&json!({"data": [1], "items": [1, 2]}))).len(),
            1
        );
        assert!(as_array(Some(&json!({"rows": [1]}))).is_empty());
        assert!(as_array(Some(&json!(42))).is_empty());
        assert!(as_array(None).is_empty());
    }

    #[test]
    fn counts_accept_numbers_arrays_and_count_objects() {
        assert_eq!(to_count(Some(&json!(4))), Some(4));
        assert_eq!(to_count(Some(&json!([{}, {}, {}]))), Some(3));
        assert_eq!(to_count(Some(&json!({"count": 7}))), Some(7));
        assert_eq!(to_count(Some(&json!("four"))), None);
    }

    #[test]
    fn datetimes_accept_rfc3339_and_bare_dates() {
        let parsed = to_datetime(Some(&json!("2026-03-15T10:30:00Z"))).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-03-15T10:30:00+00:00");

        let parsed = to_datetime(Some(&json!("2026-03-15"))).unwrap();
        assert_eq!(parsed.format("%Y-%m-%d").to_string(), "2026-03-15");

        assert!(to_datetime(Some(&json!("soon"))).is_none());
        assert!(to_datetime(Some(&json!(17))).is_none());
    }
}

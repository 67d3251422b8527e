// Value comparison rules shared by the WHERE evaluator, search and ordering

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use std::cmp::Ordering;

/// Resolve a dotted field path (`location.city`) inside a record
pub fn lookup<'a>(item: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = item;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Equality with numbers compared by value (`1` equals `1.0`)
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

/// Ordering used by range operators. Only numbers and timestamps are comparable.
pub fn compare_ordered(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => {
            let (x, y) = (parse_instant(x)?, parse_instant(y)?);
            Some(x.cmp(&y))
        }
        _ => None,
    }
}

/// Total ordering for sorting; null/missing sorts first.
/// Timestamps form their own class ahead of plain strings so the order stays transitive.
pub fn compare_for_sort(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.unwrap_or(&Value::Null);
    let b = b.unwrap_or(&Value::Null);
    let (a_instant, b_instant) = (as_instant(a), as_instant(b));

    match rank(a, a_instant.is_some()).cmp(&rank(b, b_instant.is_some())) {
        Ordering::Equal => {}
        other => return other,
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(_), Value::Number(_)) => compare_ordered(a, b).unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => match (a_instant, b_instant) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x.cmp(y),
        },
        _ => Ordering::Equal,
    }
}

/// Text form of a scalar; null, arrays and objects have none
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn rank(value: &Value, is_instant: bool) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) if is_instant => 3,
        Value::String(_) => 4,
        Value::Array(_) => 5,
        Value::Object(_) => 6,
    }
}

fn as_instant(value: &Value) -> Option<DateTime<Utc>> {
    value.as_str().and_then(parse_instant)
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_compare_by_value() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert_eq!(compare_ordered(&json!(2), &json!(10.5)), Some(Ordering::Less));
    }

    #[test]
    fn timestamps_compare_chronologically() {
        let a = json!("2024-03-01T10:00:00+02:00");
        let b = json!("2024-03-01T09:00:00Z");
        assert_eq!(compare_ordered(&a, &b), Some(Ordering::Less));
        assert_eq!(compare_ordered(&json!("2024-01-01"), &b), Some(Ordering::Less));
    }

    #[test]
    fn plain_strings_are_not_range_comparable() {
        assert_eq!(compare_ordered(&json!("apple"), &json!("banana")), None);
        assert_eq!(compare_ordered(&json!("5"), &json!(4)), None);
    }

    #[test]
    fn sort_places_missing_first() {
        let v = json!("x");
        assert_eq!(compare_for_sort(None, Some(&v)), Ordering::Less);
        assert_eq!(compare_for_sort(Some(&json!("b")), Some(&json!("a"))), Ordering::Greater);
    }

    #[test]
    fn mixed_timestamps_and_text_sort_transitively() {
        let x = json!("2024-01-01T10:00:00+09:00");
        let y = json!("2024-01-01T05:00:00Z");
        let z = json!("2024-01-01T07");
        assert_eq!(compare_for_sort(Some(&x), Some(&y)), Ordering::Less);
        assert_eq!(compare_for_sort(Some(&y), Some(&z)), Ordering::Less);
        assert_eq!(compare_for_sort(Some(&x), Some(&z)), Ordering::Less);

        let mut values = vec![z.clone(), y.clone(), json!("apple"), x.clone(), json!("2023-12-31")];
        values.sort_by(|a, b| compare_for_sort(Some(a), Some(b)));
        assert_eq!(values, vec![json!("2023-12-31"), x, y, json!("2024-01-01T07"), json!("apple")]);
    }

    #[test]
    fn lookup_walks_nested_objects() {
        let item = json!({"location": {"city": "Lisbon"}});
        assert_eq!(lookup(&item, "location.city"), Some(&json!("Lisbon")));
        assert_eq!(lookup(&item, "location.country"), None);
    }
}

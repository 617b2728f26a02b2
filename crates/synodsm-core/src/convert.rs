// ── Lenient JSON readers ──
//
// DSM is inconsistent about scalar encoding: sizes arrive as numeric
// strings on some models and numbers on others, booleans occasionally as
// "true"/"yes". Every accessor reads fields through these helpers so a
// type drift degrades to `None` instead of an error.

use serde_json::Value;

/// A non-null field of an object.
pub(crate) fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| !v.is_null())
}

pub(crate) fn as_str(value: &Value) -> Option<&str> {
    value.as_str()
}

/// Unsigned integer from a number or a numeric string.
pub(crate) fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(truncate_f64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Signed integer from a number or a numeric string.
pub(crate) fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Float from a number or a numeric string.
pub(crate) fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        _ => None,
    }
}

pub(crate) fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    field(value, key).and_then(as_str)
}

pub(crate) fn u64_field(value: &Value, key: &str) -> Option<u64> {
    field(value, key).and_then(as_u64)
}

pub(crate) fn i64_field(value: &Value, key: &str) -> Option<i64> {
    field(value, key).and_then(as_i64)
}

pub(crate) fn f64_field(value: &Value, key: &str) -> Option<f64> {
    field(value, key).and_then(as_f64)
}

pub(crate) fn bool_field(value: &Value, key: &str) -> Option<bool> {
    field(value, key).and_then(as_bool)
}

/// Elements of an array field; empty when absent or not an array.
pub(crate) fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    field(value, key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Whether a record's `id` equals `id`, comparing numbers by their text.
pub(crate) fn id_matches(record: &Value, key: &str, id: &str) -> bool {
    match record.get(key) {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

/// First record in `items` whose `key` equals `id`.
pub(crate) fn find_by<'a>(items: &'a [Value], key: &str, id: &str) -> Option<&'a Value> {
    items.iter().find(|item| id_matches(item, key, id))
}

/// The `data` member of a response, unless the response or its `data` is empty.
pub(crate) fn response_data(response: Value) -> Option<Value> {
    match response {
        Value::Object(mut map) => map.remove("data").filter(is_truthy),
        _ => None,
    }
}

/// JSON falsiness: null, false, zero, empty string, empty array or object.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn truncate_f64(f: f64) -> u64 {
    f as u64
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn numbers_parse_from_strings() {
        assert_eq!(as_u64(&json!("7672030584832")), Some(7_672_030_584_832));
        assert_eq!(as_u64(&json!(42)), Some(42));
        assert_eq!(as_u64(&json!("n/a")), None);
        assert_eq!(as_i64(&json!("-1")), Some(-1));
        assert_eq!(as_f64(&json!("12.5")), Some(12.5));
    }

    #[test]
    fn booleans_accept_common_spellings() {
        assert_eq!(as_bool(&json!("yes")), Some(true));
        assert_eq!(as_bool(&json!("False")), Some(false));
        assert_eq!(as_bool(&json!(0)), Some(false));
        assert_eq!(as_bool(&json!(null)), None);
    }

    #[test]
    fn ids_compare_numbers_by_text() {
        let items = vec![json!({ "id": 3 }), json!({ "id": "volume_1" })];
        assert_eq!(find_by(&items, "id", "3"), Some(&items[0]));
        assert_eq!(find_by(&items, "id", "volume_1"), Some(&items[1]));
        assert_eq!(find_by(&items, "id", "volume_2"), None);
    }

    #[test]
    fn empty_data_is_ignored() {
        assert_eq!(response_data(json!({ "success": true, "data": {} })), None);
        assert_eq!(response_data(json!({})), None);
        assert_eq!(
            response_data(json!({ "data": { "model": "DS918+" } })),
            Some(json!({ "model": "DS918+" }))
        );
    }
}

//! Partial-match predicates used by `filter` and `find`.

use serde_json::{Number, Value};

/// Returns `true` if `record` matches `criteria`.
///
/// For an object `criteria`, every listed field must be present in the
/// record and [`deep_equal`] to the given value; fields not listed are
/// ignored, so `{}` matches every record. Any other `criteria` must equal the
/// whole record.
///
/// ```rust
/// use recstore_core::matcher::matches;
/// use serde_json::json;
///
/// let user = json!({"id": "1", "name": "John", "roles": [{"name": "admin"}]});
/// assert!(matches(&user, &json!({"name": "John"})));
/// assert!(matches(&user, &json!({"roles": [{"name": "admin"}]})));
/// assert!(!matches(&user, &json!({"name": "John", "surname": "Doe"})));
/// ```
#[must_use]
pub fn matches(record: &Value, criteria: &Value) -> bool {
    match criteria {
        Value::Object(fields) => fields
            .iter()
            .all(|(field, expected)| {
                record
                    .get(field)
                    .is_some_and(|actual| deep_equal(actual, expected))
            }),
        other => deep_equal(record, other),
    }
}

/// Structural equality of two JSON values.
///
/// Numbers compare by value, so `1`, `1.0` and `1u64` are all equal. Object
/// key order is irrelevant.
#[must_use]
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| deep_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, a)| b.get(key).is_some_and(|b| deep_equal(a, b)))
        }
        (a, b) => a == b,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a == b;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

/// Returns `true` if `record`'s `id_field` equals `id`.
///
/// A record without the field never matches, and neither does a `None` id.
#[must_use]
pub fn has_id(record: &Value, id_field: &str, id: Option<&Value>) -> bool {
    match (record.get(id_field), id) {
        (Some(actual), Some(id)) => deep_equal(actual, id),
        _ => false,
    }
}

/// Position of the first record whose `id_field` equals `id`.
///
/// A record without the field never matches, so `None` as `id` finds
/// nothing. This is a linear scan; with duplicate identifiers the earliest
/// record wins.
#[must_use]
pub fn position_by_id(records: &[Value], id_field: &str, id: Option<&Value>) -> Option<usize> {
    records
        .iter()
        .position(|record| has_id(record, id_field, id))
}

//! Dotted-path access into nested JSON values.
//!
//! A path such as `roles.0.name` is split on `.` into segments. Segments
//! that are canonical array indexes (`0`, `7`, `12`, but not `07`) index
//! arrays; every other segment is an object key. Bracket segments are
//! accepted as well, so `roles[0].name` is the same path. A single trailing
//! `.` is ignored.
//!
//! Reads never fail: anything that does not resolve is absent. Writes build
//! whatever intermediate objects or arrays are missing.
//!
//! Numbers above [`MAX_INDEX`] are keys, not indexes. A write that would pad
//! an array with more than [`MAX_ARRAY_PADDING`] nulls is ignored.
//!
//! ```rust
//! use recstore_core::path;
//! use serde_json::json;
//!
//! let mut user = json!({"name": "John"});
//! path::set(&mut user, "roles.0.name", json!("admin"));
//!
//! assert_eq!(user, json!({"name": "John", "roles": [{"name": "admin"}]}));
//! assert_eq!(path::get(&user, "roles[0].name"), Some(&json!("admin")));
//! assert_eq!(path::get_or(&user, "roles.1.name", &json!("none")), &json!("none"));
//! ```

use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;

/// Largest number parsed as an array index (`2^53 - 1`).
pub const MAX_INDEX: u64 = 9_007_199_254_740_991;

/// Most `null` slots a single write may add to an array.
pub const MAX_ARRAY_PADDING: usize = 1 << 20;

/// One step of a parsed path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// An object key.
    Key(String),
    /// An array index. Also looked up as a key on objects.
    Index(usize),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if is_index(raw) {
            let index = raw
                .parse::<u64>()
                .ok()
                .filter(|index| *index <= MAX_INDEX)
                .and_then(|index| usize::try_from(index).ok());
            if let Some(index) = index {
                return Self::Index(index);
            }
        }
        Self::Key(raw.to_string())
    }

    /// The segment as an object key.
    #[must_use]
    pub fn as_key(&self) -> Cow<'_, str> {
        match self {
            Self::Key(key) => Cow::Borrowed(key),
            Self::Index(index) => Cow::Owned(index.to_string()),
        }
    }

    fn empty_container(&self) -> Value {
        match self {
            Self::Index(_) => Value::Array(Vec::new()),
            Self::Key(_) => Value::Object(Map::new()),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_key())
    }
}

fn is_index(raw: &str) -> bool {
    match raw.as_bytes() {
        [b'0'] => true,
        [first, rest @ ..] => {
            (b'1'..=b'9').contains(first) && rest.iter().all(u8::is_ascii_digit)
        }
        [] => false,
    }
}

/// Parses `path` into segments.
///
/// Always yields at least one segment; the empty path is the single key `""`.
#[must_use]
pub fn segments(path: &str) -> Vec<Segment> {
    let path = path.strip_suffix('.').unwrap_or(path);
    let mut out = Vec::new();
    for piece in path.split('.') {
        push_piece(piece, &mut out);
    }
    out
}

// `name[0][1]` becomes `name`, `0`, `1`. Anything malformed is one key.
fn push_piece(piece: &str, out: &mut Vec<Segment>) {
    let Some(open) = piece.find('[') else {
        out.push(Segment::parse(piece));
        return;
    };

    let head = &piece[..open];
    let mut rest = &piece[open..];
    let mut brackets = Vec::new();

    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            out.push(Segment::parse(piece));
            return;
        };
        brackets.push(Segment::parse(&inner[..close]));
        rest = &inner[close + 1..];
    }

    if !rest.is_empty() {
        out.push(Segment::parse(piece));
        return;
    }

    if !head.is_empty() {
        out.push(Segment::parse(head));
    }
    out.extend(brackets);
}

/// Returns the value at `path`, or `None` if any segment is absent.
#[must_use]
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    segments(path)
        .iter()
        .try_fold(root, |current, segment| child(current, segment))
}

/// Returns the value at `path`, or `default` if any segment is absent.
///
/// A JSON `null` stored at the path is returned as is.
#[must_use]
pub fn get_or<'a>(root: &'a Value, path: &str, default: &'a Value) -> &'a Value {
    get(root, path).unwrap_or(default)
}

fn child<'a>(current: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match (current, segment) {
        (Value::Object(map), segment) => map.get(segment.as_key().as_ref()),
        (Value::Array(items), Segment::Index(index)) => items.get(*index),
        _ => None,
    }
}

/// Assigns `value` at `path`, creating missing intermediate containers.
///
/// Missing or scalar intermediates are replaced by an array when the next
/// segment is an index and by an object otherwise. Array writes past the end
/// pad with `null`. A non-container `root` is itself replaced by a new
/// container. Returns `root`.
///
/// A key segment that lands on an existing array cannot be represented in
/// JSON; such writes leave the value unchanged. So do writes that would pad
/// an array with more than [`MAX_ARRAY_PADDING`] nulls.
pub fn set<'a>(root: &'a mut Value, path: &str, value: Value) -> &'a mut Value {
    let segments = segments(path);
    if !padding_fits(root, &segments) {
        tracing::debug!(path, "ignoring write past the array padding limit");
        return root;
    }
    if let Some(first) = segments.first() {
        if !is_container(root) {
            *root = first.empty_container();
        }
    }
    set_in(root, &segments, value);
    root
}

// Walks the existing value the way `set_in` will, without changing it.
// Missing or scalar values become empty containers, so their length is 0.
fn padding_fits(root: &Value, segments: &[Segment]) -> bool {
    let mut current = Some(root);
    for segment in segments {
        if let Segment::Index(index) = segment {
            let len = match current {
                Some(Value::Array(items)) => Some(items.len()),
                Some(Value::Object(_)) => None,
                _ => Some(0),
            };
            if len.is_some_and(|len| !within_padding(len, *index)) {
                return false;
            }
        }
        current = current.and_then(|value| child(value, segment));
    }
    true
}

fn within_padding(len: usize, index: usize) -> bool {
    index.saturating_sub(len) <= MAX_ARRAY_PADDING
}

fn set_in(root: &mut Value, segments: &[Segment], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = root;
    for (position, segment) in parents.iter().enumerate() {
        let next = &segments[position + 1];
        match child_mut(current, segment, next) {
            Some(slot) => current = slot,
            None => return,
        }
    }

    match (current, last) {
        (Value::Object(map), segment) => {
            map.insert(segment.as_key().into_owned(), value);
        }
        (Value::Array(items), Segment::Index(index)) => {
            if let Some(slot) = array_slot(items, *index) {
                *slot = value;
            }
        }
        _ => {}
    }
}

fn child_mut<'a>(
    container: &'a mut Value,
    segment: &Segment,
    next: &Segment,
) -> Option<&'a mut Value> {
    let slot = match (container, segment) {
        (Value::Object(map), segment) => map
            .entry(segment.as_key().into_owned())
            .or_insert(Value::Null),
        (Value::Array(items), Segment::Index(index)) => array_slot(items, *index)?,
        _ => return None,
    };

    if !is_container(slot) {
        *slot = next.empty_container();
    }
    Some(slot)
}

fn array_slot(items: &mut Vec<Value>, index: usize) -> Option<&mut Value> {
    if items.len() <= index {
        if !within_padding(items.len(), index) {
            return None;
        }
        items.resize(index.checked_add(1)?, Value::Null);
    }
    items.get_mut(index)
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn user() -> Value {
        json!({
            "id": "1",
            "name": "John",
            "roles": [{"name": "admin"}],
            "address": {"city": "Oslo"}
        })
    }

    #[test]
    fn segments_split_on_dots() {
        assert_eq!(
            segments("roles.0.name"),
            vec![
                Segment::Key("roles".into()),
                Segment::Index(0),
                Segment::Key("name".into())
            ]
        );
    }

    #[test]
    fn segments_strip_one_trailing_dot() {
        assert_eq!(segments("name."), vec![Segment::Key("name".into())]);
        assert_eq!(
            segments("name.."),
            vec![Segment::Key("name".into()), Segment::Key(String::new())]
        );
    }

    #[test]
    fn segments_brackets() {
        assert_eq!(
            segments("matrix[1][2]"),
            vec![
                Segment::Key("matrix".into()),
                Segment::Index(1),
                Segment::Index(2)
            ]
        );
        assert_eq!(segments("[3]"), vec![Segment::Index(3)]);
    }

    #[test]
    fn segments_malformed_brackets_are_keys() {
        assert_eq!(segments("a[0"), vec![Segment::Key("a[0".into())]);
        assert_eq!(segments("a[0]b"), vec![Segment::Key("a[0]b".into())]);
    }

    #[test]
    fn segments_non_canonical_numbers_are_keys() {
        assert_eq!(segments("07"), vec![Segment::Key("07".into())]);
        assert_eq!(segments("-1"), vec![Segment::Key("-1".into())]);
        assert_eq!(segments("0"), vec![Segment::Index(0)]);
    }

    #[test]
    fn segments_above_max_index_are_keys() {
        assert_eq!(
            segments("tags.9007199254740991"),
            vec![Segment::Key("tags".into()), Segment::Index(9_007_199_254_740_991)]
        );
        assert_eq!(
            segments("tags.9007199254740992"),
            vec![Segment::Key("tags".into()), Segment::Key("9007199254740992".into())]
        );
        assert_eq!(
            segments("tags.18446744073709551615"),
            vec![Segment::Key("tags".into()), Segment::Key("18446744073709551615".into())]
        );
    }

    #[test]
    fn empty_path_is_empty_key() {
        assert_eq!(segments(""), vec![Segment::Key(String::new())]);
    }

    #[test]
    fn get_top_level() {
        assert_eq!(get(&user(), "name"), Some(&json!("John")));
    }

    #[test]
    fn get_nested() {
        let user = user();
        assert_eq!(get(&user, "roles.0.name"), Some(&json!("admin")));
        assert_eq!(get(&user, "address.city"), Some(&json!("Oslo")));
        assert_eq!(get(&user, "address.city."), Some(&json!("Oslo")));
    }

    #[test]
    fn get_missing_is_none() {
        let user = user();
        assert_eq!(get(&user, "surname"), None);
        assert_eq!(get(&user, "roles.5.name"), None);
        assert_eq!(get(&user, "address.zip.code"), None);
    }

    #[test]
    fn get_through_scalar_is_none() {
        assert_eq!(get(&user(), "name.first"), None);
        assert_eq!(get(&json!(42), "anything"), None);
    }

    #[test]
    fn get_key_on_array_is_none() {
        assert_eq!(get(&user(), "roles.name"), None);
    }

    #[test]
    fn get_numeric_key_on_object() {
        let value = json!({"0": "zero"});
        assert_eq!(get(&value, "0"), Some(&json!("zero")));
    }

    #[test]
    fn get_or_falls_back() {
        let user = user();
        let fallback = json!("Doe");
        assert_eq!(get_or(&user, "surname", &fallback), &fallback);
        assert_eq!(get_or(&user, "name", &fallback), &json!("John"));
    }

    #[test]
    fn get_or_keeps_stored_null() {
        let value = json!({"nickname": null});
        assert_eq!(get_or(&value, "nickname", &json!("x")), &Value::Null);
    }

    #[test]
    fn set_top_level() {
        let mut user = user();
        set(&mut user, "surname", json!("Smith"));
        assert_eq!(user["surname"], json!("Smith"));
    }

    #[test]
    fn set_overwrites_nested() {
        let mut user = user();
        set(&mut user, "roles.0.name", json!("owner"));
        assert_eq!(user["roles"], json!([{"name": "owner"}]));
    }

    #[test]
    fn set_creates_objects() {
        let mut value = json!({});
        set(&mut value, "a.b.c", json!(1));
        assert_eq!(value, json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn set_creates_arrays_for_index_segments() {
        let mut value = json!({});
        set(&mut value, "tags.1", json!("b"));
        assert_eq!(value, json!({"tags": [null, "b"]}));
    }

    #[test]
    fn set_replaces_scalar_intermediate() {
        let mut value = json!({"name": "John"});
        set(&mut value, "name.first", json!("J"));
        assert_eq!(value, json!({"name": {"first": "J"}}));
    }

    #[test]
    fn set_keeps_existing_object_for_index_segment() {
        let mut value = json!({"slots": {}});
        set(&mut value, "slots.0", json!("x"));
        assert_eq!(value, json!({"slots": {"0": "x"}}));
    }

    #[test]
    fn set_key_on_array_is_ignored() {
        let mut value = json!({"roles": ["a"]});
        set(&mut value, "roles.name", json!("x"));
        assert_eq!(value, json!({"roles": ["a"]}));
    }

    #[test]
    fn set_on_null_root_creates_container() {
        let mut value = Value::Null;
        set(&mut value, "0.name", json!("x"));
        assert_eq!(value, json!([{"name": "x"}]));

        let mut value = json!("scalar");
        set(&mut value, "name", json!("x"));
        assert_eq!(value, json!({"name": "x"}));
    }

    #[test]
    fn set_with_max_u64_index_writes_a_key() {
        let mut value = json!({});
        set(&mut value, "tags.18446744073709551615", json!(1));
        assert_eq!(value, json!({"tags": {"18446744073709551615": 1}}));
    }

    #[test]
    fn set_past_padding_limit_is_ignored() {
        let mut value = json!({"id": "1"});
        set(&mut value, "tags.100000000000", json!(1));
        assert_eq!(value, json!({"id": "1"}));

        let mut value = json!({"tags": ["a"]});
        set(&mut value, "tags.9007199254740991.name", json!("x"));
        assert_eq!(value, json!({"tags": ["a"]}));

        let mut value = Value::Null;
        set(&mut value, &format!("{}", MAX_ARRAY_PADDING + 1), json!(1));
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn set_at_padding_limit_is_written() {
        let mut value = json!({"tags": []});
        set(&mut value, &format!("tags.{MAX_ARRAY_PADDING}"), json!(1));
        let tags = value["tags"].as_array().unwrap();
        assert_eq!(tags.len(), MAX_ARRAY_PADDING + 1);
        assert_eq!(tags[MAX_ARRAY_PADDING], json!(1));
    }

    #[test]
    fn large_index_on_object_is_a_key() {
        let mut value = json!({"slots": {}});
        set(&mut value, "slots.100000000000", json!("x"));
        assert_eq!(value, json!({"slots": {"100000000000": "x"}}));
    }

    #[test]
    fn set_returns_root() {
        let mut value = json!({});
        let root = set(&mut value, "a", json!(1));
        assert_eq!(root, &json!({"a": 1}));
    }

    #[test]
    fn set_with_brackets() {
        let mut value = json!({});
        set(&mut value, "grid[0][1]", json!(true));
        assert_eq!(value, json!({"grid": [[null, true]]}));
    }

    fn path_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                "[a-z]{1,6}".prop_map(String::from),
                (0usize..4).prop_map(|i| i.to_string()),
            ],
            1..5,
        )
        .prop_map(|parts| parts.join("."))
    }

    proptest! {
        #[test]
        fn set_then_get_returns_value(path in path_strategy(), n in any::<i64>()) {
            let mut record = json!({"id": "1"});
            set(&mut record, &path, json!(n));
            prop_assert_eq!(get(&record, &path), Some(&json!(n)));
        }

        #[test]
        fn trailing_dot_is_same_path(path in path_strategy()) {
            prop_assert_eq!(segments(&format!("{path}.")), segments(&path));
        }
    }
}

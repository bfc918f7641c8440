//! Property-based test generators using proptest.
//!
//! Provides strategies for generating records, record collections with
//! unique identifiers, dotted paths and operation sequences.

use proptest::prelude::*;
use serde_json::{Map, Value};

/// Strategy for generating record identifiers.
pub fn id_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]{1,8}").expect("Invalid regex")
}

/// Strategy for generating field names.
///
/// Never produces `id` and never looks like an array index.
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z_]{0,9}")
        .expect("Invalid regex")
        .prop_filter("Field name must not be the identifier", |s| s != "id")
}

/// Strategy for generating JSON scalars.
pub fn json_scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        prop::string::string_regex("[a-zA-Z ]{0,12}")
            .expect("Invalid regex")
            .prop_map(Value::String),
    ]
}

/// Strategy for generating nested JSON values of bounded depth.
pub fn json_value_strategy() -> impl Strategy<Value = Value> {
    json_scalar_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(field_name_strategy(), inner, 0..4)
                .prop_map(|fields| Value::Object(fields.into_iter().collect())),
        ]
    })
}

/// Strategy for generating a record with the given identifier plus up to
/// four other fields.
pub fn record_with_id_strategy(id: String) -> impl Strategy<Value = Value> {
    prop::collection::btree_map(field_name_strategy(), json_value_strategy(), 0..4).prop_map(
        move |fields| {
            let mut record: Map<String, Value> = fields.into_iter().collect();
            record.insert("id".to_string(), Value::String(id.clone()));
            Value::Object(record)
        },
    )
}

/// Strategy for generating a single record with a random identifier.
pub fn record_strategy() -> impl Strategy<Value = Value> {
    id_strategy().prop_flat_map(record_with_id_strategy)
}

/// Strategy for generating up to `max` records with distinct identifiers.
pub fn records_strategy(max: usize) -> impl Strategy<Value = Vec<Value>> {
    prop::collection::btree_set(id_strategy(), 0..=max).prop_flat_map(|ids| {
        ids.into_iter()
            .map(record_with_id_strategy)
            .collect::<Vec<_>>()
    })
}

/// Strategy for generating dotted paths mixing keys and small indexes.
pub fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            field_name_strategy(),
            (0usize..4).prop_map(|i| i.to_string()),
        ],
        1..5,
    )
    .prop_map(|parts| parts.join("."))
}

/// A mutation applied to a collection during a property test.
#[derive(Debug, Clone)]
pub enum RecordOperation {
    /// Add a new record.
    Add {
        /// The record, including its identifier.
        record: Value,
    },
    /// Update one field of an existing record.
    Update {
        /// Index into the current collection, taken modulo its length.
        index: usize,
        /// Field to set.
        field: String,
        /// New value.
        value: Value,
    },
    /// Destroy an existing record.
    Destroy {
        /// Index into the current collection, taken modulo its length.
        index: usize,
    },
}

/// Strategy for generating a single record operation.
///
/// Added records get identifiers prefixed with `new-` so they never collide
/// with records from [`records_strategy`].
pub fn operation_strategy() -> impl Strategy<Value = RecordOperation> {
    prop_oneof![
        id_strategy()
            .prop_flat_map(|id| record_with_id_strategy(format!("new-{id}")))
            .prop_map(|record| RecordOperation::Add { record }),
        (any::<usize>(), field_name_strategy(), json_scalar_strategy())
            .prop_map(|(index, field, value)| RecordOperation::Update { index, field, value }),
        any::<usize>().prop_map(|index| RecordOperation::Destroy { index }),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operations_strategy(max_ops: usize) -> impl Strategy<Value = Vec<RecordOperation>> {
    prop::collection::vec(operation_strategy(), 0..max_ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::strategy::ValueTree;
    use proptest::test_runner::TestRunner;
    use std::collections::HashSet;

    #[test]
    fn generated_records_carry_identifier() {
        let mut runner = TestRunner::default();
        for _ in 0..50 {
            let record = record_strategy().new_tree(&mut runner).unwrap().current();
            assert!(record["id"].is_string());
        }
    }

    #[test]
    fn generated_collections_have_unique_ids() {
        let mut runner = TestRunner::default();
        for _ in 0..50 {
            let records = records_strategy(8).new_tree(&mut runner).unwrap().current();
            let ids: HashSet<String> = records.iter().map(|r| r["id"].to_string()).collect();
            assert_eq!(ids.len(), records.len());
        }
    }

    #[test]
    fn generated_field_names_are_not_id() {
        let mut runner = TestRunner::default();
        for _ in 0..100 {
            let name = field_name_strategy().new_tree(&mut runner).unwrap().current();
            assert_ne!(name, "id");
        }
    }

    #[test]
    fn generated_paths_have_no_trailing_dot() {
        let mut runner = TestRunner::default();
        for _ in 0..50 {
            let path = path_strategy().new_tree(&mut runner).unwrap().current();
            assert!(!path.ends_with('.'));
            assert!(!path.is_empty());
        }
    }
}

//! Benchmark utilities.

use recstore_core::{Model, ModelOptions};
use serde_json::{json, Value};
use std::path::Path;

/// Generate a record with the given id and a payload of `payload_size` characters.
pub fn record(id: usize, payload_size: usize) -> Value {
    let role = if id % 2 == 0 { "admin" } else { "member" };
    json!({
        "id": id.to_string(),
        "name": format!("user-{id}"),
        "address": {"city": "Oslo", "zip": id % 10_000},
        "roles": [{"name": role}],
        "payload": "x".repeat(payload_size),
    })
}

/// Generate `count` records with ids `"0"` through `count - 1`.
pub fn generate_records(count: usize, payload_size: usize) -> Vec<Value> {
    (0..count).map(|id| record(id, payload_size)).collect()
}

/// An in-memory model seeded with `count` records.
pub fn memory_model(count: usize) -> Model {
    Model::define(ModelOptions::new().name("bench").seeds(move || generate_records(count, 64)))
}

/// A JSON file model at `path` seeded with `count` records.
pub fn file_model(path: &Path, count: usize, pretty: bool) -> Model {
    Model::define(
        ModelOptions::new()
            .name("bench")
            .file(path)
            .pretty(pretty)
            .seeds(move || generate_records(count, 64)),
    )
}

//! Cross-crate integration test helpers.
//!
//! Provides a harness that applies mutations through a file-backed model
//! while tracking the collection it should end up with, and verifies both
//! the live model and a freshly loaded one against it.

use crate::fixtures::TempJsonFile;
use crate::generators::RecordOperation;
use recstore_core::{matcher, path, CoreResult, Model, ModelOptions};
use serde_json::{json, Map, Value};

/// A test harness for integration testing.
pub struct IntegrationHarness {
    /// The file the model persists to.
    file: TempJsonFile,
    /// Seeds used for the live model and for every fresh one.
    seeds: Vec<Value>,
    /// The model under test.
    model: Model,
    /// Collection contents the model should hold.
    expected: Vec<Value>,
}

impl IntegrationHarness {
    /// Creates a harness over a new temporary file seeded with `seeds`.
    pub fn new(seeds: Vec<Value>) -> Self {
        let file = TempJsonFile::new("harness.json");
        let model = file.model(Self::options(&seeds));
        Self {
            expected: seeds.clone(),
            seeds,
            model,
            file,
        }
    }

    fn options(seeds: &[Value]) -> ModelOptions {
        let seeds = seeds.to_vec();
        ModelOptions::new()
            .name("harness")
            .seeds(move || seeds.clone())
    }

    /// The model under test.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// A new model over the same file, as another process would open it.
    pub fn fresh_model(&self) -> Model {
        self.file.model(Self::options(&self.seeds))
    }

    /// The collection the model should hold.
    pub fn expected(&self) -> &[Value] {
        &self.expected
    }

    /// Adds a record and tracks it.
    ///
    /// Like the model, a record whose identifier is already tracked replaces
    /// the first tracked record with that identifier.
    pub fn add(&mut self, record: Value) -> CoreResult<()> {
        self.model.add(record.clone())?;
        match self.tracked_position(record.get("id")) {
            Some(position) => self.expected[position] = record,
            None => self.expected.push(record),
        }
        Ok(())
    }

    /// Sets `field` on the record at `index` (modulo the collection size).
    ///
    /// Does nothing on an empty collection.
    pub fn update(&mut self, index: usize, field: &str, value: Value) -> CoreResult<()> {
        let Some(index) = self.resolve(index) else {
            return Ok(());
        };
        let id = self.expected[index]["id"].clone();

        let mut record = self
            .model
            .find(&json!({ "id": id }))?
            .expect("Tracked record should be present");
        let mut fields = Map::new();
        fields.insert(field.to_string(), value.clone());
        record.update(Value::Object(fields))?;

        if let Some(position) = self.tracked_position(Some(&id)) {
            path::set(&mut self.expected[position], field, value);
        }
        Ok(())
    }

    /// Destroys the record at `index` (modulo the collection size).
    ///
    /// Does nothing on an empty collection.
    pub fn destroy(&mut self, index: usize) -> CoreResult<()> {
        let Some(index) = self.resolve(index) else {
            return Ok(());
        };
        let id = self.expected[index]["id"].clone();

        let mut record = self
            .model
            .find(&json!({ "id": id }))?
            .expect("Tracked record should be present");
        record.destroy()?;

        if let Some(position) = self.tracked_position(Some(&id)) {
            self.expected.remove(position);
        }
        Ok(())
    }

    /// Applies a generated operation.
    pub fn apply(&mut self, operation: &RecordOperation) -> CoreResult<()> {
        match operation {
            RecordOperation::Add { record } => self.add(record.clone()),
            RecordOperation::Update {
                index,
                field,
                value,
            } => self.update(*index, field, value.clone()),
            RecordOperation::Destroy { index } => self.destroy(*index),
        }
    }

    /// Verifies the live model holds exactly the tracked records.
    pub fn verify(&self) {
        let actual = self.model.data().expect("Failed to read model");
        assert_eq!(actual, self.expected, "Live model diverged from tracked records");
    }

    /// Verifies a freshly loaded model holds exactly the tracked records.
    pub fn verify_fresh(&self) {
        let actual = self.fresh_model().data().expect("Failed to read fresh model");
        assert_eq!(actual, self.expected, "Persisted records diverged from tracked records");
    }

    /// Returns the count of tracked records.
    pub fn tracked_count(&self) -> usize {
        self.expected.len()
    }

    fn tracked_position(&self, id: Option<&Value>) -> Option<usize> {
        matcher::position_by_id(&self.expected, "id", id)
    }

    fn resolve(&self, index: usize) -> Option<usize> {
        if self.expected.is_empty() {
            None
        } else {
            Some(index % self.expected.len())
        }
    }
}

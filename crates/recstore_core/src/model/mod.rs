//! Collection model and record handles.
//!
//! A [`Model`] owns one backing store and the in-memory copy of its records.
//! Queries hand out [`Record`] handles that borrow the model and share the
//! stored record; handle writes go back through the model, which rewrites
//! the whole collection.

mod record;
mod state;

pub use record::Record;
pub use state::{LoadState, SharedRecord};

use crate::config::{ModelOptions, SeedFn};
use crate::error::CoreResult;
use crate::matcher;
use parking_lot::{Mutex, RwLock};
use recstore_storage::{InMemoryBackend, JsonFileBackend, StorageBackend};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A collection of JSON records over a backing store.
///
/// The backing store is read lazily on first access and the records are
/// then served from memory until [`reload`](Self::reload). Every persisting
/// operation writes the complete collection back.
///
/// `Model` only exposes `&self` methods, so a defined model can be shared by
/// reference (or in an `Arc`) between everything that needs it.
///
/// Handles are not cached: every query returns new handles, but handles to
/// the same stored record share it. A [`Record::set`] through one handle is
/// visible through every other handle and in later queries, though it is not
/// persisted until something saves the collection.
///
/// # Identity
///
/// Records are identified by the value of the configured identifier field
/// (`"id"` by default). Uniqueness is assumed, not enforced: when two records
/// share an identifier, [`Record::save`] and [`Record::destroy`] act on the
/// first one in collection order.
///
/// # Example
///
/// ```rust
/// use recstore_core::{Model, ModelOptions};
/// use serde_json::json;
///
/// let users = Model::define(ModelOptions::new().name("users"));
/// users.add(json!({"id": "1", "name": "John"})).unwrap();
/// users.add(json!({"id": "2", "name": "Jane"})).unwrap();
///
/// assert_eq!(users.len().unwrap(), 2);
/// assert_eq!(users.last().unwrap().unwrap().id(), Some(json!("2")));
/// assert!(users.find(&json!({"name": "Bob"})).unwrap().is_none());
/// ```
pub struct Model {
    /// Model name for logs.
    name: String,
    /// Field holding each record's identifier.
    id_field: String,
    /// Initial records for an empty store.
    seeds: SeedFn,
    /// Where records are persisted.
    backend: Mutex<Box<dyn StorageBackend>>,
    /// In-memory collection. Locked before any record cell.
    state: RwLock<LoadState>,
}

impl Model {
    /// Defines a model from `options`.
    ///
    /// The model is file-backed when `options.file` is set and in memory
    /// otherwise. Nothing is read or written until the first access.
    #[must_use]
    pub fn define(options: ModelOptions) -> Self {
        let backend: Box<dyn StorageBackend> = match options.file_path() {
            Some(path) => Box::new(JsonFileBackend::new(path).pretty(options.pretty)),
            None => Box::new(InMemoryBackend::new()),
        };
        Self::with_backend(options, backend)
    }

    /// Defines a model over a caller-supplied backend.
    ///
    /// `options.file` and `options.pretty` are ignored.
    #[must_use]
    pub fn with_backend(options: ModelOptions, backend: Box<dyn StorageBackend>) -> Self {
        Self {
            seeds: options.seed_fn(),
            name: options.name,
            id_field: options.id_field,
            backend: Mutex::new(backend),
            state: RwLock::new(LoadState::Unloaded),
        }
    }

    /// Returns the model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the identifier field.
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Returns `true` once the backing store has been read.
    pub fn is_loaded(&self) -> bool {
        self.state.read().is_loaded()
    }

    /// Returns a handle for every record, in collection order.
    pub fn all(&self) -> CoreResult<Vec<Record<'_>>> {
        self.read_records(|records| {
            records
                .iter()
                .map(|record| Record::stored(self, Arc::clone(record)))
                .collect()
        })
    }

    /// Returns handles for every record matching `criteria`.
    ///
    /// See [`matcher::matches`] for the matching rules. No match is an empty
    /// vector, not an error.
    pub fn filter(&self, criteria: &Value) -> CoreResult<Vec<Record<'_>>> {
        self.filter_by(|record| matcher::matches(record, criteria))
    }

    /// Returns handles for every record accepted by `predicate`.
    pub fn filter_by<F>(&self, predicate: F) -> CoreResult<Vec<Record<'_>>>
    where
        F: Fn(&Value) -> bool,
    {
        self.read_records(|records| {
            records
                .iter()
                .filter(|record| predicate(&record.read()))
                .map(|record| Record::stored(self, Arc::clone(record)))
                .collect()
        })
    }

    /// Returns the first record matching `criteria`, in collection order.
    pub fn find(&self, criteria: &Value) -> CoreResult<Option<Record<'_>>> {
        self.find_by(|record| matcher::matches(record, criteria))
    }

    /// Returns the first record accepted by `predicate`.
    pub fn find_by<F>(&self, predicate: F) -> CoreResult<Option<Record<'_>>>
    where
        F: Fn(&Value) -> bool,
    {
        self.read_records(|records| {
            records
                .iter()
                .find(|record| predicate(&record.read()))
                .map(|record| Record::stored(self, Arc::clone(record)))
        })
    }

    /// Returns the first record, or `None` for an empty collection.
    pub fn first(&self) -> CoreResult<Option<Record<'_>>> {
        self.read_records(|records| {
            records
                .first()
                .map(|record| Record::stored(self, Arc::clone(record)))
        })
    }

    /// Returns the last record, or `None` for an empty collection.
    pub fn last(&self) -> CoreResult<Option<Record<'_>>> {
        self.read_records(|records| {
            records
                .last()
                .map(|record| Record::stored(self, Arc::clone(record)))
        })
    }

    /// Wraps `initial` in a new, unsaved handle.
    ///
    /// The collection and the backing store are untouched until the handle
    /// is saved.
    pub fn create(&self, initial: Value) -> Record<'_> {
        Record::new(self, initial)
    }

    /// Serializes `initial` and wraps it in a new, unsaved handle.
    pub fn create_from<T: Serialize>(&self, initial: &T) -> CoreResult<Record<'_>> {
        Ok(self.create(serde_json::to_value(initial)?))
    }

    /// Creates a handle for `initial` and saves it immediately.
    pub fn add(&self, initial: Value) -> CoreResult<Record<'_>> {
        let mut record = self.create(initial);
        record.save()?;
        Ok(record)
    }

    /// Re-reads the backing store, discarding unsaved in-memory changes.
    ///
    /// An empty store is populated from the seed function again. Handles
    /// taken before the reload keep the old records and no longer see the
    /// collection.
    pub fn reload(&self) -> CoreResult<&Self> {
        let records = self.load()?;
        *self.state.write() = LoadState::Loaded(records);
        Ok(self)
    }

    /// Writes the whole in-memory collection to the backing store.
    pub fn save(&self) -> CoreResult<&Self> {
        self.write_records(|_| ())?;
        Ok(self)
    }

    /// Returns a copy of all records.
    pub fn data(&self) -> CoreResult<Vec<Value>> {
        self.read_records(state::snapshot)
    }

    /// Returns the number of records.
    pub fn len(&self) -> CoreResult<usize> {
        self.read_records(<[SharedRecord]>::len)
    }

    /// Returns `true` if the collection holds no records.
    pub fn is_empty(&self) -> CoreResult<bool> {
        self.read_records(<[SharedRecord]>::is_empty)
    }

    /// Reads the backing store, falling back to the seeds when it is empty.
    fn load(&self) -> CoreResult<Vec<SharedRecord>> {
        self.read_backend().map(state::share_all)
    }

    fn read_backend(&self) -> CoreResult<Vec<Value>> {
        let backend = self.backend.lock();
        match backend.read()? {
            Some(records) => {
                tracing::debug!(
                    model = %self.name,
                    source = %backend.describe(),
                    count = records.len(),
                    "loaded records"
                );
                Ok(records)
            }
            None => {
                let records = (self.seeds)();
                tracing::debug!(
                    model = %self.name,
                    source = %backend.describe(),
                    count = records.len(),
                    "backing store empty, using seeds"
                );
                Ok(records)
            }
        }
    }

    /// Runs `f` over the loaded records, loading them first if needed.
    fn read_records<R>(&self, f: impl FnOnce(&[SharedRecord]) -> R) -> CoreResult<R> {
        {
            let state = self.state.read();
            if let Some(records) = state.records() {
                return Ok(f(records));
            }
        }

        self.state
            .write()
            .with_loaded(|| self.load(), |records| f(records.as_slice()))
    }

    /// Applies `f` to the loaded records and persists the result.
    ///
    /// The in-memory change is kept even if the write fails. `f` must not
    /// hold a lock on any record cell.
    pub(crate) fn write_records<R>(
        &self,
        f: impl FnOnce(&mut Vec<SharedRecord>) -> R,
    ) -> CoreResult<R> {
        let mut loaded = self.state.write();
        let (result, records) = loaded.with_loaded(
            || self.load(),
            |records| {
                let result = f(records);
                (result, state::snapshot(records))
            },
        )?;

        let mut backend = self.backend.lock();
        backend.write(&records)?;
        tracing::debug!(
            model = %self.name,
            target = %backend.describe(),
            count = records.len(),
            "persisted records"
        );

        Ok(result)
    }

    /// Position of `record` in the collection.
    ///
    /// The first record whose identifier equals `id` wins. When none does,
    /// the cell itself is looked up, so a record saved without an identifier
    /// is found again instead of appended twice.
    pub(crate) fn locate(
        &self,
        records: &[SharedRecord],
        id: Option<&Value>,
        record: &SharedRecord,
    ) -> Option<usize> {
        records
            .iter()
            .position(|other| matcher::has_id(&other.read(), &self.id_field, id))
            .or_else(|| records.iter().position(|other| Arc::ptr_eq(other, record)))
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name)
            .field("id_field", &self.id_field)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

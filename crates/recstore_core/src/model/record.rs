//! Record handles.

use crate::error::{CoreError, CoreResult};
use crate::model::{Model, SharedRecord};
use crate::path;
use parking_lot::{RwLock, RwLockReadGuard};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// A handle to one record of a [`Model`].
///
/// A handle shares its record with the model's collection and with every
/// other handle to it. Changes made with [`set`](Self::set) are visible
/// through all of them at once but are only persisted by the next save of
/// the collection. When two handles change the record before saving, each
/// save writes everything set so far, so the last save wins for the whole
/// collection.
///
/// `is_new` and `is_saved` belong to the handle, are bookkeeping only and
/// never block an operation.
#[derive(Debug)]
pub struct Record<'m> {
    model: &'m Model,
    data: SharedRecord,
    is_new: bool,
    is_saved: bool,
}

impl<'m> Record<'m> {
    /// A record that has never been persisted.
    pub(crate) fn new(model: &'m Model, data: Value) -> Self {
        Self {
            model,
            data: Arc::new(RwLock::new(data)),
            is_new: true,
            is_saved: false,
        }
    }

    /// A handle to a record in the model's collection.
    pub(crate) fn stored(model: &'m Model, data: SharedRecord) -> Self {
        Self {
            model,
            data,
            is_new: false,
            is_saved: true,
        }
    }

    /// The model this record belongs to.
    pub fn model(&self) -> &'m Model {
        self.model
    }

    /// `true` until the record has been saved once.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// `false` after a `set` through this handle that has not been saved yet.
    pub fn is_saved(&self) -> bool {
        self.is_saved
    }

    /// Returns `true` if both handles refer to the same stored record.
    pub fn shares_with(&self, other: &Record<'_>) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// The record's identifier, if it has one.
    pub fn id(&self) -> Option<Value> {
        self.data.read().get(self.model.id_field()).cloned()
    }

    /// Returns a copy of the value at `path`.
    pub fn get(&self, path: &str) -> Option<Value> {
        path::get(&self.data.read(), path).cloned()
    }

    /// Returns a copy of the value at `path`, or `default` when it is absent.
    pub fn get_or(&self, path: &str, default: impl Into<Value>) -> Value {
        self.get(path).unwrap_or_else(|| default.into())
    }

    /// Sets the value at `path` on the shared record.
    ///
    /// Marks this handle unsaved; nothing is persisted until a save.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> &mut Self {
        self.is_saved = false;
        path::set(&mut self.data.write(), path, value.into());
        self
    }

    /// Writes this record into the model and persists the collection.
    ///
    /// The record replaces the first record with the same identifier, or is
    /// appended when there is none. A record without an identifier is
    /// appended once and found again by later saves.
    pub fn save(&mut self) -> CoreResult<()> {
        let id = self.id();
        let data = Arc::clone(&self.data);

        let index = self.model.write_records(|records| {
            let index = self.model.locate(records, id.as_ref(), &data);
            match index {
                Some(index) => records[index] = data,
                None => records.push(data),
            }
            index
        })?;

        tracing::trace!(
            model = %self.model.name(),
            id = ?id,
            index = ?index,
            "saved record"
        );

        self.is_new = false;
        self.is_saved = true;
        Ok(())
    }

    /// Applies every field of `values` with [`set`](Self::set), then saves.
    ///
    /// Keys may be dotted paths. `values` must be a JSON object.
    pub fn update(&mut self, values: Value) -> CoreResult<()> {
        let fields = match values {
            Value::Object(fields) => fields,
            other => {
                return Err(CoreError::invalid_update(format!(
                    "expected an object of fields, got {other}"
                )))
            }
        };

        for (field, value) in fields {
            self.set(&field, value);
        }
        self.save()
    }

    /// Removes this record from the model and persists the collection.
    ///
    /// The collection is written even when the record is no longer in it.
    pub fn destroy(&mut self) -> CoreResult<()> {
        let id = self.id();

        let removed = self.model.write_records(|records| {
            self.model
                .locate(records, id.as_ref(), &self.data)
                .map(|index| {
                    records.remove(index);
                    index
                })
        })?;

        tracing::trace!(
            model = %self.model.name(),
            id = ?id,
            index = ?removed,
            "destroyed record"
        );
        Ok(())
    }

    /// Locks the record for reading.
    ///
    /// Drop the guard before saving or querying the model.
    pub fn read(&self) -> RwLockReadGuard<'_, Value> {
        self.data.read()
    }

    /// A copy of the raw record.
    pub fn value(&self) -> Value {
        self.data.read().clone()
    }

    /// Consumes the handle, returning the raw record.
    pub fn into_value(self) -> Value {
        match Arc::try_unwrap(self.data) {
            Ok(data) => data.into_inner(),
            Err(shared) => shared.read().clone(),
        }
    }

    /// Deserializes the record into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> CoreResult<T> {
        Ok(T::deserialize(&*self.data.read())?)
    }
}

impl From<Record<'_>> for Value {
    fn from(record: Record<'_>) -> Self {
        record.into_value()
    }
}

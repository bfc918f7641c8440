//! Load state of a model's in-memory collection.

use crate::error::CoreResult;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;

/// One stored record.
///
/// The collection and every handle to the record hold the same cell, so a
/// change made through one handle is seen by all of them.
pub type SharedRecord = Arc<RwLock<Value>>;

/// Wraps each record in its own cell.
pub(crate) fn share_all(records: Vec<Value>) -> Vec<SharedRecord> {
    records
        .into_iter()
        .map(|record| Arc::new(RwLock::new(record)))
        .collect()
}

/// Copies the current contents of every cell.
pub(crate) fn snapshot(records: &[SharedRecord]) -> Vec<Value> {
    records.iter().map(|record| record.read().clone()).collect()
}

/// Whether a model has read its backing store yet.
///
/// A model starts `Unloaded`, becomes `Loaded` on first data access or on
/// `reload`, and never goes back.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    /// Backing store not read yet.
    #[default]
    Unloaded,
    /// In-memory collection, authoritative until the next reload.
    Loaded(Vec<SharedRecord>),
}

impl LoadState {
    /// Returns `true` once the collection is in memory.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// The loaded records, or `None` while unloaded.
    #[must_use]
    pub fn records(&self) -> Option<&[SharedRecord]> {
        match self {
            Self::Loaded(records) => Some(records),
            Self::Unloaded => None,
        }
    }

    /// Runs `f` over the loaded records, running `load` first if unloaded.
    ///
    /// A failed load leaves the state unloaded and `f` is not called.
    pub(crate) fn with_loaded<L, F, R>(&mut self, load: L, f: F) -> CoreResult<R>
    where
        L: FnOnce() -> CoreResult<Vec<SharedRecord>>,
        F: FnOnce(&mut Vec<SharedRecord>) -> R,
    {
        match self {
            Self::Loaded(records) => Ok(f(records)),
            Self::Unloaded => {
                let mut records = load()?;
                let result = f(&mut records);
                *self = Self::Loaded(records);
                Ok(result)
            }
        }
    }
}

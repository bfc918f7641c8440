//! Storage backend trait definition.

use crate::error::StorageResult;
use serde_json::Value;

/// A backing store for one collection of records.
///
/// Backends persist a whole sequence at a time. RecStore keeps the loaded
/// sequence in memory and hands the complete sequence back on every write.
///
/// # Invariants
///
/// - `read` returns `None` when nothing has ever been written (or the
///   persisted representation is empty)
/// - after `write(records)` succeeds, `read` returns `Some(records)`
/// - backends never reorder, merge or deduplicate records
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::JsonFileBackend`] - For persistent storage
pub trait StorageBackend: Send + Sync {
    /// Loads the persisted sequence.
    ///
    /// Returns `Ok(None)` if the store is empty or uninitialized.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An I/O error occurs
    /// - The persisted representation cannot be parsed
    fn read(&self) -> StorageResult<Option<Vec<Value>>>;

    /// Replaces the persisted sequence with `records`.
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be serialized or written.
    fn write(&mut self, records: &[Value]) -> StorageResult<()>;

    /// Short human-readable description of where records live.
    ///
    /// Used in log output only.
    fn describe(&self) -> String;
}

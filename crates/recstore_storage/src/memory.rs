//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::StorageResult;
use parking_lot::RwLock;
use serde_json::Value;

/// An in-memory storage backend.
///
/// Holds the last written sequence in process memory. Nothing survives the
/// backend being dropped, which makes it suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral collections rebuilt from seeds on every start
///
/// # Thread Safety
///
/// This backend is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use recstore_storage::{StorageBackend, InMemoryBackend};
/// use serde_json::json;
///
/// let mut backend = InMemoryBackend::new();
/// backend.write(&[json!({"id": 1}), json!({"id": 2})]).unwrap();
/// assert_eq!(backend.read().unwrap().map(|r| r.len()), Some(2));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    data: RwLock<Option<Vec<Value>>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend with pre-existing records.
    ///
    /// Useful for testing reload scenarios.
    #[must_use]
    pub fn with_records(records: Vec<Value>) -> Self {
        Self {
            data: RwLock::new(Some(records)),
        }
    }

    /// Returns a copy of the stored records, if any were written.
    #[must_use]
    pub fn records(&self) -> Option<Vec<Value>> {
        self.data.read().clone()
    }

    /// Forgets the stored records, returning the backend to its
    /// uninitialized state.
    pub fn clear(&mut self) {
        *self.data.write() = None;
    }
}

impl StorageBackend for InMemoryBackend {
    fn read(&self) -> StorageResult<Option<Vec<Value>>> {
        Ok(self.data.read().clone())
    }

    fn write(&mut self, records: &[Value]) -> StorageResult<()> {
        *self.data.write() = Some(records.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_new_is_uninitialized() {
        let backend = InMemoryBackend::new();
        assert!(backend.read().unwrap().is_none());
        assert!(backend.records().is_none());
    }

    #[test]
    fn memory_write_then_read() {
        let mut backend = InMemoryBackend::new();
        let records = vec![json!({"id": "1", "name": "John"}), json!({"id": "2"})];

        backend.write(&records).unwrap();

        assert_eq!(backend.read().unwrap(), Some(records));
    }

    #[test]
    fn memory_write_replaces_previous() {
        let mut backend = InMemoryBackend::new();
        backend.write(&[json!({"id": "1"}), json!({"id": "2"})]).unwrap();
        backend.write(&[json!({"id": "3"})]).unwrap();

        assert_eq!(backend.read().unwrap(), Some(vec![json!({"id": "3"})]));
    }

    #[test]
    fn memory_empty_write_is_initialized() {
        let mut backend = InMemoryBackend::new();
        backend.write(&[]).unwrap();

        assert_eq!(backend.read().unwrap(), Some(vec![]));
    }

    #[test]
    fn memory_with_records() {
        let backend = InMemoryBackend::with_records(vec![json!({"id": 7})]);
        assert_eq!(backend.read().unwrap(), Some(vec![json!({"id": 7})]));
    }

    #[test]
    fn memory_clear() {
        let mut backend = InMemoryBackend::new();
        backend.write(&[json!({"id": 1})]).unwrap();
        backend.clear();
        assert!(backend.read().unwrap().is_none());
    }

    #[test]
    fn memory_describe() {
        assert_eq!(InMemoryBackend::new().describe(), "memory");
    }
}

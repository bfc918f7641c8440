//! JSON file storage backend for persistent collections.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use serde_json::Value;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A storage backend that keeps the collection as a JSON array in one file.
///
/// The file is read whole on [`read`](StorageBackend::read) and rewritten
/// whole on every [`write`](StorageBackend::write). Nothing is opened or
/// created until the first write.
///
/// # Durability
///
/// Writes go to a sibling `<file>.tmp`, which is synced and then renamed
/// over the target, so a crash leaves either the old or the new document.
///
/// # Missing directories
///
/// Parent directories are created on write if they do not exist yet. The
/// check is not guarded against other processes creating them concurrently.
///
/// # Example
///
/// ```no_run
/// use recstore_storage::{StorageBackend, JsonFileBackend};
/// use serde_json::json;
///
/// let mut backend = JsonFileBackend::new("data/users.json");
/// backend.write(&[json!({"id": "1", "name": "John"})]).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileBackend {
    /// Creates a backend for the JSON document at `path`.
    ///
    /// Output is pretty-printed with two-space indentation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: true,
        }
    }

    /// Sets whether the document is pretty-printed or written compactly.
    #[must_use]
    pub fn pretty(mut self, value: bool) -> Self {
        self.pretty = value;
        self
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("records.json"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn ensure_parent_dir(&self) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tracing::debug!(dir = %parent.display(), "creating collection directory");
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    fn encode(&self, records: &[Value]) -> StorageResult<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(records)?
        } else {
            serde_json::to_vec(records)?
        };
        Ok(bytes)
    }
}

impl StorageBackend for JsonFileBackend {
    fn read(&self) -> StorageResult<Option<Vec<Value>>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if text.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str(&text)? {
            Value::Array(records) => Ok(Some(records)),
            Value::Null => Ok(None),
            other => Err(StorageError::Corrupted(format!(
                "{} holds a JSON {} instead of an array of records",
                self.path.display(),
                json_kind(&other)
            ))),
        }
    }

    fn write(&mut self, records: &[Value]) -> StorageResult<()> {
        self.ensure_parent_dir()?;

        let data = self.encode(records)?;
        let temp_path = self.temp_path();

        let mut file = File::create(&temp_path)?;
        file.write_all(&data)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &self.path)?;
        tracing::trace!(path = %self.path.display(), bytes = data.len(), "wrote collection file");

        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//! Model configuration.

use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Identifier field used when none is configured.
pub const DEFAULT_ID_FIELD: &str = "id";

/// Model name used when none is configured.
pub const DEFAULT_MODEL_NAME: &str = "records";

/// Produces the initial records of a model whose backing store is empty.
pub type SeedFn = Arc<dyn Fn() -> Vec<Value> + Send + Sync>;

/// Options for defining a [`Model`](crate::Model).
///
/// ```rust
/// use recstore_core::ModelOptions;
/// use serde_json::json;
///
/// let options = ModelOptions::new()
///     .name("users")
///     .file("data/users.json")
///     .id_field("uid")
///     .seeds(|| vec![json!({"uid": 1})]);
///
/// assert_eq!(options.id_field, "uid");
/// assert_eq!(options.seed_records(), vec![json!({"uid": 1})]);
/// ```
#[derive(Clone)]
pub struct ModelOptions {
    /// Name used in log output and as the schema key.
    pub name: String,

    /// JSON file holding the collection; `None` keeps it in memory.
    pub file: Option<PathBuf>,

    /// Field whose value identifies a record.
    pub id_field: String,

    /// Whether the JSON file is pretty-printed.
    pub pretty: bool,

    seeds: SeedFn,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL_NAME.to_string(),
            file: None,
            id_field: DEFAULT_ID_FIELD.to_string(),
            pretty: true,
            seeds: Arc::new(Vec::<Value>::new),
        }
    }
}

impl fmt::Debug for ModelOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelOptions")
            .field("name", &self.name)
            .field("file", &self.file)
            .field("id_field", &self.id_field)
            .field("pretty", &self.pretty)
            .finish_non_exhaustive()
    }
}

impl ModelOptions {
    /// Creates options with default values: in memory, `"id"` identifier,
    /// no seeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Backs the model by the JSON file at `path`.
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Keeps the model in memory, dropping any configured file.
    #[must_use]
    pub fn in_memory(mut self) -> Self {
        self.file = None;
        self
    }

    /// Sets the identifier field.
    #[must_use]
    pub fn id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    /// Sets whether the JSON file is pretty-printed.
    #[must_use]
    pub const fn pretty(mut self, value: bool) -> Self {
        self.pretty = value;
        self
    }

    /// Sets the seed function used when the backing store is empty.
    #[must_use]
    pub fn seeds<F>(mut self, seeds: F) -> Self
    where
        F: Fn() -> Vec<Value> + Send + Sync + 'static,
    {
        self.seeds = Arc::new(seeds);
        self
    }

    /// Returns the configured file, if any.
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Runs the seed function.
    #[must_use]
    pub fn seed_records(&self) -> Vec<Value> {
        (self.seeds)()
    }

    pub(crate) fn seed_fn(&self) -> SeedFn {
        Arc::clone(&self.seeds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_options() {
        let options = ModelOptions::default();
        assert_eq!(options.name, DEFAULT_MODEL_NAME);
        assert_eq!(options.id_field, "id");
        assert!(options.file.is_none());
        assert!(options.pretty);
        assert!(options.seed_records().is_empty());
    }

    #[test]
    fn builder_pattern() {
        let options = ModelOptions::new()
            .name("users")
            .file("db/users.json")
            .id_field("uid")
            .pretty(false)
            .seeds(|| vec![json!({"uid": "a"})]);

        assert_eq!(options.name, "users");
        assert_eq!(options.file_path(), Some(Path::new("db/users.json")));
        assert_eq!(options.id_field, "uid");
        assert!(!options.pretty);
        assert_eq!(options.seed_records(), vec![json!({"uid": "a"})]);
    }

    #[test]
    fn in_memory_clears_file() {
        let options = ModelOptions::new().file("db/users.json").in_memory();
        assert!(options.file.is_none());
    }

    #[test]
    fn seeds_run_fresh_each_time() {
        let options = ModelOptions::new().seeds(|| vec![json!({"id": "1"})]);
        let mut first = options.seed_records();
        first.push(json!({"id": "2"}));

        assert_eq!(options.seed_records().len(), 1);
    }

    #[test]
    fn debug_skips_seed_fn() {
        let rendered = format!("{:?}", ModelOptions::new().name("users"));
        assert!(rendered.contains("users"));
        assert!(rendered.contains(".."));
    }
}

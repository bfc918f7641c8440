//! Several named models defined together.

use crate::config::ModelOptions;
use crate::error::{CoreError, CoreResult};
use crate::model::Model;
use std::collections::BTreeMap;
use std::path::Path;

/// A set of models keyed by name.
///
/// ```rust
/// use recstore_core::{ModelOptions, Schema};
/// use serde_json::json;
///
/// let schema = Schema::in_memory([
///     ("users", ModelOptions::new().seeds(|| vec![json!({"id": "1"})])),
///     ("posts", ModelOptions::new()),
/// ]);
///
/// assert_eq!(schema.model("users").unwrap().len().unwrap(), 1);
/// assert!(schema.model("posts").unwrap().is_empty().unwrap());
/// assert!(schema.get("comments").is_none());
/// ```
#[derive(Debug, Default)]
pub struct Schema {
    models: BTreeMap<String, Model>,
}

impl Schema {
    /// Defines every model in memory, ignoring any configured file.
    pub fn in_memory<I, N>(definitions: I) -> Self
    where
        I: IntoIterator<Item = (N, ModelOptions)>,
        N: Into<String>,
    {
        Self::build(definitions, |_, options| options.in_memory())
    }

    /// Defines every model as a JSON file.
    ///
    /// A model without an explicit file is stored at `<dir>/<name>.json`.
    pub fn in_json_dir<I, N>(dir: impl AsRef<Path>, definitions: I) -> Self
    where
        I: IntoIterator<Item = (N, ModelOptions)>,
        N: Into<String>,
    {
        let dir = dir.as_ref();
        Self::build(definitions, |name, options| {
            if options.file.is_some() {
                options
            } else {
                options.file(dir.join(format!("{name}.json")))
            }
        })
    }

    fn build<I, N, F>(definitions: I, mut configure: F) -> Self
    where
        I: IntoIterator<Item = (N, ModelOptions)>,
        N: Into<String>,
        F: FnMut(&str, ModelOptions) -> ModelOptions,
    {
        let models = definitions
            .into_iter()
            .map(|(name, options)| {
                let name = name.into();
                let options = configure(&name, options.name(name.as_str()));
                (name, Model::define(options))
            })
            .collect();
        Self { models }
    }

    /// Returns the model called `name`.
    pub fn get(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    /// Returns the model called `name`, or an error naming it.
    pub fn model(&self, name: &str) -> CoreResult<&Model> {
        self.get(name).ok_or_else(|| CoreError::model_not_found(name))
    }

    /// Model names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Iterates over `(name, model)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Model)> {
        self.models.iter().map(|(name, model)| (name.as_str(), model))
    }

    /// Number of models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if the schema has no models.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

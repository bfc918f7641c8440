//! Test fixtures and model helpers.
//!
//! Provides the two-user seed set used throughout the tests, temporary
//! JSON files that clean up after themselves, and ready-made models.

use recstore_core::{Model, ModelOptions};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The standard seed records: John and Jane Doe, both admins.
pub fn user_seeds() -> Vec<Value> {
    vec![
        json!({
            "id": "1",
            "name": "John",
            "surname": "Doe",
            "roles": [{"name": "admin"}]
        }),
        json!({
            "id": "2",
            "name": "Jane",
            "surname": "Doe",
            "roles": [{"name": "admin"}]
        }),
    ]
}

/// A user record with a random UUID identifier.
pub fn user(name: &str, surname: &str) -> Value {
    json!({
        "id": uuid::Uuid::new_v4().to_string(),
        "name": name,
        "surname": surname,
    })
}

/// Options for a `users` model seeded with [`user_seeds`].
pub fn users_options() -> ModelOptions {
    ModelOptions::new().name("users").seeds(user_seeds)
}

/// An in-memory `users` model seeded with [`user_seeds`].
pub fn memory_users() -> Model {
    Model::define(users_options())
}

/// An in-memory model with no seeds.
pub fn empty_model() -> Model {
    Model::define(ModelOptions::new())
}

/// A JSON file inside a temporary directory.
///
/// The directory and everything in it is removed on drop. The file itself
/// is not created until a model writes to it.
pub struct TempJsonFile {
    path: PathBuf,
    /// Kept alive so the directory survives as long as the fixture.
    _dir: TempDir,
}

impl TempJsonFile {
    /// Creates a fixture for `<tempdir>/<name>`.
    pub fn new(name: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        Self {
            path: dir.path().join(name),
            _dir: dir,
        }
    }

    /// Creates a fixture whose file sits in missing subdirectories.
    pub fn nested(name: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        Self {
            path: dir.path().join(".temp").join("db").join(name),
            _dir: dir,
        }
    }

    /// Path of the JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` once something has been written.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Defines a model over this file using `options`.
    pub fn model(&self, options: ModelOptions) -> Model {
        Model::define(options.file(&self.path))
    }

    /// Defines a fresh `users` model over this file.
    ///
    /// Each call returns an independent model, the way a second process
    /// would see the same file.
    pub fn users_model(&self) -> Model {
        self.model(users_options())
    }

    /// Parses the file as it is on disk, or `None` if it does not exist.
    pub fn read_raw(&self) -> Option<Value> {
        let text = fs::read_to_string(&self.path).ok()?;
        Some(serde_json::from_str(&text).expect("Collection file should be valid JSON"))
    }

    /// Overwrites the file with raw text, bypassing every model.
    pub fn write_raw(&self, text: &str) {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&self.path, text).expect("Failed to write collection file");
    }
}

/// Runs a test with a path to a not-yet-existing JSON file.
pub fn with_temp_file<F, R>(f: F) -> R
where
    F: FnOnce(&Path) -> R,
{
    let file = TempJsonFile::new("records.json");
    f(file.path())
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// An in-memory model holding `count` records with ids `"0"`, `"1"`, ...
    pub fn populated_model(count: usize) -> Model {
        Model::define(ModelOptions::new().name("populated").seeds(move || {
            (0..count)
                .map(|i| json!({"id": i.to_string(), "index": i, "even": i % 2 == 0}))
                .collect()
        }))
    }

    /// Two independent `users` models over the same file.
    pub fn two_models(file: &TempJsonFile) -> (Model, Model) {
        (file.users_model(), file.users_model())
    }
}

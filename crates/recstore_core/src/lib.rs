//! # RecStore Core
//!
//! A small record store over an ordered array of JSON documents.
//!
//! This crate provides:
//! - [`Model`]: a lazily loaded collection with `all`/`filter`/`find`/`first`/`last`
//! - [`Record`]: a handle to one record with path-based `get`/`set`,
//!   `update`, `save` and `destroy`
//! - [`path`]: dotted-path access into nested JSON values
//! - [`Schema`]: several named models defined together
//!
//! Every write rewrites the whole collection through the model's
//! [`StorageBackend`].
//!
//! ## Example
//!
//! ```rust
//! use recstore_core::{Model, ModelOptions};
//! use serde_json::json;
//!
//! let users = Model::define(ModelOptions::new().seeds(|| {
//!     vec![json!({"id": "1", "name": "John", "roles": [{"name": "admin"}]})]
//! }));
//!
//! let mut john = users.find(&json!({"id": "1"})).unwrap().unwrap();
//! assert_eq!(john.get("roles.0.name"), Some(json!("admin")));
//!
//! john.update(json!({"surname": "Smith"})).unwrap();
//! assert_eq!(users.first().unwrap().unwrap().get("surname"), Some(json!("Smith")));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
pub mod matcher;
mod model;
pub mod path;
mod schema;

pub use config::{ModelOptions, SeedFn, DEFAULT_ID_FIELD, DEFAULT_MODEL_NAME};
pub use error::{CoreError, CoreResult};
pub use model::{LoadState, Model, Record, SharedRecord};
pub use schema::Schema;

pub use recstore_storage::{InMemoryBackend, JsonFileBackend, StorageBackend, StorageError};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

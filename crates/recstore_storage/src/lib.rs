//! # RecStore Storage
//!
//! Backing store trait and implementations for RecStore.
//!
//! A backing store holds one ordered sequence of JSON records and knows how
//! to load it into memory and write it back in full. Backends do not
//! interpret individual records: identity, matching and path access all live
//! in `recstore_core`.
//!
//! ## Design Principles
//!
//! - Whole-collection reads and writes only, no partial updates
//! - An absent or empty store reads as `None`, not as an empty sequence
//! - Must be `Send + Sync` so models can be shared
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For tests and ephemeral collections
//! - [`JsonFileBackend`] - A JSON array document on disk
//!
//! ## Example
//!
//! ```rust
//! use recstore_storage::{StorageBackend, InMemoryBackend};
//! use serde_json::json;
//!
//! let mut backend = InMemoryBackend::new();
//! assert!(backend.read().unwrap().is_none());
//!
//! backend.write(&[json!({"id": "1"})]).unwrap();
//! assert_eq!(backend.read().unwrap(), Some(vec![json!({"id": "1"})]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::JsonFileBackend;
pub use memory::InMemoryBackend;

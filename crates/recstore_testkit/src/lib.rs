//! # RecStore Testkit
//!
//! Test utilities for RecStore.
//!
//! This crate provides:
//! - Fixtures: seed users, temporary JSON files and ready-made models
//! - Property-based test generators using proptest
//! - An integration harness that tracks expected collection contents and
//!   checks them against a freshly loaded model
//!
//! ## Usage
//!
//! ```rust
//! use recstore_testkit::prelude::*;
//! use serde_json::json;
//!
//! let file = TempJsonFile::new("users.json");
//! let users = file.users_model();
//! users.add(json!({"id": "3", "name": "Jr"})).unwrap();
//!
//! assert_eq!(file.users_model().len().unwrap(), 3);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;

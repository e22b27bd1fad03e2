//! JSON-file backend for the nation store.
//!
//! The whole store lives in one JSON document mapping nation name to
//! record. Every read parses the file; every write replaces it.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::JsonFileStore;

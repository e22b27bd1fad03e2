//! Core types and rules for the nation presence & trade service.
//!
//! This crate is free of HTTP and storage dependencies. It defines the
//! record model, the presence window, the trade applicator and the
//! [`store::NationStore`] abstraction that storage backends implement.

pub mod error;
pub mod presence;
pub mod record;
pub mod store;
pub mod trade;

pub use error::{Error, Result};
pub use record::{NationRecord, Nations};

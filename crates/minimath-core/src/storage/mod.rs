//! Storage layer
//!
//! Persists player progress in SQLite. The backend owns the only writer;
//! clients reach it through the HTTP API.

pub mod error;
pub mod schema;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};
pub use store::ProgressStore;

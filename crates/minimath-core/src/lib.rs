//! Minimath Core Library
//!
//! Player progress for the Minimath learning game: the record a backend
//! keeps per player name, and the client that keeps a local score in step
//! with it.
//!
//! # Architecture
//!
//! - **ProgressStore** (server side): SQLite table keyed by player name,
//!   with read and unconditional upsert
//! - **ProgressSyncClient** (client side): optimistic local score, debounced
//!   pushes, local-only fallback when the backend is unreachable
//!
//! The two only meet over the HTTP/JSON contract in [`sync::ProgressApi`].
//!
//! # Modules
//!
//! - `models`: Progress record, validation rules, wire types
//! - `storage`: SQLite-backed progress store
//! - `sync`: Sync client, transport, debounce timer
//! - `config`: Application configuration

pub mod config;
pub mod models;
pub mod storage;
pub mod sync;

pub use config::Config;
pub use models::{PlayerProgress, ValidationError, MAX_PLAYER_NAME_CHARS};
pub use storage::{ProgressStore, StoreError};
pub use sync::{ProgressSyncClient, SyncError, SyncSnapshot, SyncStatus};

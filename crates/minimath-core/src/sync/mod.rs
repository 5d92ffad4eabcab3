//! Progress sync client
//!
//! Keeps a player's score in memory and mirrors it to the backend.
//!
//! ## Protocol
//!
//! 1. At startup, probe `/api/health` and, independently, pull the saved
//!    player's record
//! 2. Selecting a player pulls their record; the remote score replaces the
//!    local one
//! 3. Each correct answer bumps the local score and re-arms a 300 ms
//!    trailing debounce; when it fires the current score is posted
//!
//! ## Usage
//!
//! ```ignore
//! let client = ProgressSyncClient::from_config(&config)?;
//! client.bootstrap();
//! client.set_player_name("Ava").await.ok();
//! client.increment_score();
//! ```

mod client;
mod debounce;
mod error;
mod profile;
mod transport;

pub use client::{Bootstrap, ProgressSyncClient, SyncSnapshot, SyncStatus};
pub use debounce::Debouncer;
pub use error::{SyncError, SyncResult};
pub use profile::LocalProfile;
pub use transport::{HttpProgressApi, ProgressApi};

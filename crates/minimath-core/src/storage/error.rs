//! Storage error handling

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::ValidationError;

/// Errors that can occur during progress store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Bad player name or score; the caller must correct its input
    #[error(transparent)]
    InvalidArgument(#[from] ValidationError),

    /// Failed to create the directory holding the database
    #[error("Failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// SQLite database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored row could not be turned back into a record
    #[error("Corrupt progress row for '{player_name}': {details}")]
    CorruptRow {
        player_name: String,
        details: String,
    },
}

impl StoreError {
    /// Whether the error was caused by the request rather than the store
    pub fn is_client_error(&self) -> bool {
        matches!(self, StoreError::InvalidArgument(_))
    }
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

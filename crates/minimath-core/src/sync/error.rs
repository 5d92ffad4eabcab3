//! Sync error handling
//!
//! Every variant means the same thing to the client: the backend could not
//! be used just now, so the game keeps going on its local score.

use thiserror::Error;

/// Errors from talking to the progress backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Connection refused, DNS failure, timeout
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// The backend answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The backend answered 2xx with a body we could not read
    #[error("Unexpected response from backend: {0}")]
    Decode(String),
}

impl SyncError {
    /// Whether resending the same request could succeed
    ///
    /// A 4xx means the input itself was refused.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, SyncError::Rejected { status, .. } if (400..500).contains(status))
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SyncError::Decode(err.to_string())
        } else {
            SyncError::Unreachable(err.to_string())
        }
    }
}

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

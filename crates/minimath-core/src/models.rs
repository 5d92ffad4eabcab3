//! Data models for Minimath
//!
//! Defines the player progress record, the rules that normalize a player
//! name and score before they reach storage, and the JSON shapes exchanged
//! between the sync client and the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest player name the store keeps, counted in characters
pub const MAX_PLAYER_NAME_CHARS: usize = 40;

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "minimalist-math-backend";

/// A player's persisted cumulative score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProgress {
    /// Identity key (trimmed, case-sensitive)
    pub player_name: String,
    /// Correct answers across all game modes
    pub score: u64,
    /// Last successful write; `None` if the player was never saved
    pub updated_at: Option<DateTime<Utc>>,
}

impl PlayerProgress {
    /// The record returned for a name that has never been saved
    pub fn unsaved(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            score: 0,
            updated_at: None,
        }
    }

    /// Whether this record exists on the backend
    pub fn is_saved(&self) -> bool {
        self.updated_at.is_some()
    }
}

/// Rejected player name or score
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("playerName is required.")]
    EmptyPlayerName,

    #[error("score must be a non-negative number.")]
    InvalidScore,
}

/// Normalize a player name: trimmed, non-empty, and silently truncated to
/// [`MAX_PLAYER_NAME_CHARS`] characters
///
/// Reads and writes share this, so any name a caller holds maps to the
/// same stored key. The cut can expose inner whitespace, which is trimmed
/// again.
pub fn normalize_player_name(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyPlayerName);
    }
    let name = match trimmed.char_indices().nth(MAX_PLAYER_NAME_CHARS) {
        Some((cut, _)) => trimmed[..cut].trim_end(),
        None => trimmed,
    };
    Ok(name.to_string())
}

/// Normalize a raw score: finite and non-negative, floored to an integer
///
/// Values beyond what SQLite can hold saturate at `i64::MAX`.
pub fn normalize_score(raw: f64) -> Result<u64, ValidationError> {
    if !raw.is_finite() || raw < 0.0 {
        return Err(ValidationError::InvalidScore);
    }
    let floored = raw.floor();
    if floored >= i64::MAX as f64 {
        return Ok(i64::MAX as u64);
    }
    Ok(floored as u64)
}

/// Body of `POST /api/progress`
///
/// Both fields are optional at the decode layer so that a missing field
/// surfaces as a validation error rather than a malformed request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProgressRequest {
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Body of `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub ok: bool,
    pub service: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthStatus {
    pub fn now() -> Self {
        Self {
            ok: true,
            service: SERVICE_NAME.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Shape of every error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

//! Player progress store
//!
//! Maps a player name to a score and a last-updated timestamp.
//!
//! - `get` never fails for an unknown name; it returns the zero-value record.
//! - `upsert` overwrites unconditionally. There is no comparison against the
//!   stored score, so whichever write commits last wins, even if it carries
//!   a lower score.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::config::Config;
use crate::models::{normalize_player_name, normalize_score, PlayerProgress};
use crate::storage::error::{StoreError, StoreResult};
use crate::storage::schema::{init_schema, needs_init};

/// SQLite-backed progress store
///
/// The connection sits behind a mutex so the store can be shared across
/// request handlers; each operation is a single statement.
pub struct ProgressStore {
    conn: Mutex<Connection>,
}

impl ProgressStore {
    /// Open or create the progress database under the configured data dir
    pub fn open(config: &Config) -> StoreResult<Self> {
        let path = config.database_path();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(&path)?;
        if needs_init(&conn) {
            init_schema(&conn)?;
        }

        debug!("Opened progress database at {:?}", path);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Look up a player's progress
    ///
    /// The name is normalized exactly as `upsert` does, so the full name a
    /// player typed finds the record stored under its truncated key.
    /// Returns `score = 0, updated_at = None` for a name never saved.
    pub fn get(&self, raw_name: &str) -> StoreResult<PlayerProgress> {
        let player_name = normalize_player_name(raw_name)?;
        let conn = self.connection();

        let row = conn
            .query_row(
                "SELECT player_name, score, updated_at FROM progress WHERE player_name = ?1",
                params![player_name],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some(row) => hydrate(row),
            None => Ok(PlayerProgress::unsaved(player_name)),
        }
    }

    /// Create or overwrite a player's progress
    ///
    /// The name is trimmed and truncated to 40 characters; the score must be
    /// finite and non-negative and is floored. Returns the record as stored.
    pub fn upsert(&self, raw_name: &str, raw_score: f64) -> StoreResult<PlayerProgress> {
        let player_name = normalize_player_name(raw_name)?;
        let score = normalize_score(raw_score)?;
        let score = i64::try_from(score).unwrap_or(i64::MAX);
        let now = Utc::now().timestamp_millis();

        let conn = self.connection();
        let row = conn.query_row(
            r#"
            INSERT INTO progress (player_name, score, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            ON CONFLICT(player_name) DO UPDATE SET
                score = excluded.score,
                updated_at = excluded.updated_at
            RETURNING player_name, score, updated_at
            "#,
            params![player_name, score, now],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            },
        )?;

        debug!(player = %player_name, score, "Upserted progress");
        hydrate(row)
    }

    /// Number of players with a saved record
    pub fn player_count(&self) -> StoreResult<i64> {
        let conn = self.connection();
        let count = conn.query_row("SELECT COUNT(*) FROM progress", [], |row| row.get(0))?;
        Ok(count)
    }

    fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        // A panic mid-statement leaves nothing half-applied in SQLite.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn hydrate((player_name, score, updated_at): (String, i64, i64)) -> StoreResult<PlayerProgress> {
    let score = u64::try_from(score).map_err(|_| StoreError::CorruptRow {
        player_name: player_name.clone(),
        details: format!("negative score {}", score),
    })?;
    let updated_at: DateTime<Utc> =
        DateTime::from_timestamp_millis(updated_at).ok_or_else(|| StoreError::CorruptRow {
            player_name: player_name.clone(),
            details: format!("timestamp out of range {}", updated_at),
        })?;

    Ok(PlayerProgress {
        player_name,
        score,
        updated_at: Some(updated_at),
    })
}

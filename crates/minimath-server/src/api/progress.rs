use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;

use minimath_core::models::{PlayerProgress, SaveProgressRequest};
use minimath_core::storage::StoreResult;
use minimath_core::ProgressStore;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// GET /api/progress/:player_name
///
/// An unknown player is not an error: the zero-value record comes back.
pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    player_name: std::result::Result<Path<String>, PathRejection>,
) -> Result<Json<PlayerProgress>> {
    let Path(player_name) = player_name.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let progress = with_store(&state, move |store| store.get(&player_name)).await?;
    Ok(Json(progress))
}

/// POST /api/progress
///
/// Overwrites the player's score unconditionally and returns the stored
/// record.
pub async fn save_progress(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<SaveProgressRequest>, JsonRejection>,
) -> Result<Json<PlayerProgress>> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let player_name = request.player_name.unwrap_or_default();
    // A missing score fails validation the same way a non-finite one does.
    let score = request.score.unwrap_or(f64::NAN);

    let progress = with_store(&state, move |store| store.upsert(&player_name, score)).await?;
    tracing::info!(
        player = %progress.player_name,
        score = progress.score,
        "progress saved"
    );
    Ok(Json(progress))
}

/// Run a store operation off the async executor.
async fn with_store<T, F>(state: &Arc<AppState>, op: F) -> Result<T>
where
    F: FnOnce(&ProgressStore) -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    let result = tokio::task::spawn_blocking(move || op(&state.store))
        .await
        .map_err(|e| ApiError::Internal(format!("store task failed: {e}")))?;
    Ok(result?)
}

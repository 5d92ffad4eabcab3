use axum::Json;

use minimath_core::models::HealthStatus;

/// Liveness probe. Does not touch the store.
pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus::now())
}

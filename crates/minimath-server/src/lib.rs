//! Minimath progress backend
//!
//! HTTP/JSON service over the core [`ProgressStore`](minimath_core::ProgressStore):
//!
//! | Method | Path                        | Purpose                |
//! |--------|-----------------------------|------------------------|
//! | GET    | `/api/health`               | liveness               |
//! | GET    | `/api/progress/:playerName` | read a player's record |
//! | POST   | `/api/progress`             | upsert a player's score|

pub mod api;
pub mod error;
pub mod state;

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;

pub use api::build_router;
pub use error::ApiError;
pub use state::AppState;

/// Serve the API on `listener` until `shutdown` resolves.
pub async fn serve<S>(listener: TcpListener, state: Arc<AppState>, shutdown: S) -> std::io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

use axum::{extract::State, http::StatusCode};
use tracing::warn;

use crate::infra::cache;
use crate::state::AppState;

/// `GET /readyz`: 503 until both Postgres and Redis answer.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    if let Err(e) = state.db.ping().await {
        warn!(error = %e, "database not ready");
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    if let Err(e) = cache::ping(&state.redis).await {
        warn!(error = ?e, "redis not ready");
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    StatusCode::OK
}

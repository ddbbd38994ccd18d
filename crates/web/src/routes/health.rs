//! Health check handlers.

use axum::extract::State;
use axum::http::StatusCode;

use crate::state::AppState;

/// Liveness check.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness check: verifies the database is reachable.
pub async fn readiness(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => Ok("ready"),
        Err(e) => {
            tracing::error!("Readiness check failed: {e}");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

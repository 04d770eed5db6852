use axum::{extract::State, Json};
use crate::api::AppState;
use crate::api::models::HealthResponse;

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let orchestrator = &state.orchestrator;
    Json(HealthResponse {
        status: "healthy",
        service: "gradewatch",
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("GIT_HASH"),
        sessions: orchestrator.tracker().session_count().await,
        cached: orchestrator.cache().len(),
        polling: orchestrator.poller().in_flight().len(),
    })
}

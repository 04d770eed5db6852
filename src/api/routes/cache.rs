use axum::{extract::State, Json};
use crate::api::AppState;
use crate::api::models::CacheResponse;

pub async fn get_cache(State(state): State<AppState>) -> Json<CacheResponse> {
    Json(CacheResponse {
        entries: state.orchestrator.cache().snapshot(),
        in_flight: state.orchestrator.poller().in_flight(),
    })
}

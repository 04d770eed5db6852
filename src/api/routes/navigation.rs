use axum::{extract::State, Json};
use crate::api::AppState;
use crate::api::models::NavigationResponse;
use crate::models::NavigationEvent;
use crate::session::qualified_hostname;

/// Entry point for the request observer: one call per observed request.
pub async fn post_navigation(
    State(state): State<AppState>,
    Json(event): Json<NavigationEvent>,
) -> Json<NavigationResponse> {
    let hostname = qualified_hostname(&event.url);
    let outcome = state.orchestrator.handle_navigation(event).await;
    Json(NavigationResponse { outcome, hostname })
}

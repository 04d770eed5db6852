pub mod routes;
pub mod models;
pub mod errors;

use std::sync::Arc;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::pipeline::{OrchestratorConfig, ScanOrchestrator};
use crate::poller::ScanService;
use crate::reporting::{LogLauncher, MemoryPublisher};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: ScanOrchestrator,
    /// Latest status per session, as published by the orchestrator
    pub statuses: Arc<MemoryPublisher>,
}

pub fn create_app_state(config: OrchestratorConfig, service: Arc<dyn ScanService>) -> AppState {
    let statuses = Arc::new(MemoryPublisher::new());
    let orchestrator = ScanOrchestrator::new(
        config,
        service,
        statuses.clone(),
        Arc::new(LogLauncher::default()),
    );
    AppState { orchestrator, statuses }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", axum::routing::get(routes::health::health_check))
        .route("/api/navigation", axum::routing::post(routes::navigation::post_navigation))
        .route(
            "/api/sessions/{id}",
            axum::routing::get(routes::sessions::get_session).delete(routes::sessions::delete_session),
        )
        .route("/api/sessions/{id}/report", axum::routing::post(routes::sessions::request_report))
        .route(
            "/api/preferences",
            axum::routing::get(routes::preferences::get_preferences).put(routes::preferences::update_preferences),
        )
        .route("/api/cache", axum::routing::get(routes::cache::get_cache))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

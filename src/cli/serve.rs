use crate::cli::commands::ServeArgs;
use crate::errors::GradewatchError;
use crate::api;
use crate::pipeline::OrchestratorConfig;
use tracing::info;

pub async fn handle_serve(args: ServeArgs) -> Result<(), GradewatchError> {
    info!(host = %args.host, port = args.port, "Starting API server");

    let config = super::load_config(args.config.as_deref()).await?;
    let service = super::build_service(&config, args.replay.as_deref()).await?;
    let state = api::create_app_state(OrchestratorConfig::from(&config), service);
    let orchestrator = state.orchestrator.clone();
    let app = api::build_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .map_err(|e| GradewatchError::Internal(format!("Server error: {}", e)))?;

    for poll in orchestrator.poller().in_flight() {
        orchestrator.poller().cancel(&poll.target);
    }
    orchestrator.drain().await;
    Ok(())
}

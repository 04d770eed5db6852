use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use crate::api::AppState;
use crate::api::models::{ReportResponse, SessionResponse};
use crate::errors::GradewatchError;
use crate::models::SessionId;

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionResponse>, GradewatchError> {
    let view = state.orchestrator
        .session(id)
        .await
        .ok_or(GradewatchError::SessionNotFound(id))?;
    Ok(Json(SessionResponse {
        view,
        status: state.statuses.latest(id),
    }))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<Value>, GradewatchError> {
    if state.orchestrator.close_session(id).await {
        Ok(Json(json!({"deleted": true})))
    } else {
        Err(GradewatchError::SessionNotFound(id))
    }
}

pub async fn request_report(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<ReportResponse>, GradewatchError> {
    let views = state.orchestrator.request_report(id).await?;
    Ok(Json(ReportResponse { session: id, views }))
}

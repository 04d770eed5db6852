use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use crate::errors::GradewatchError;

impl IntoResponse for GradewatchError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            GradewatchError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            GradewatchError::Config(_) => StatusCode::BAD_REQUEST,
            GradewatchError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            GradewatchError::InvalidGrade(_) => StatusCode::BAD_REQUEST,
            GradewatchError::Json(_) => StatusCode::BAD_REQUEST,
            GradewatchError::Transport(_) | GradewatchError::ScanService(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({"error": self.to_string()}))).into_response()
    }
}

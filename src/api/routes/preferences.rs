use axum::{extract::State, Json};
use crate::api::AppState;
use crate::api::models::PreferencesResponse;
use crate::config::Preferences;
use crate::errors::GradewatchError;

pub async fn get_preferences(State(state): State<AppState>) -> Json<Preferences> {
    Json(state.orchestrator.preferences().await)
}

/// Replace the preferences. Omitted fields take their defaults.
pub async fn update_preferences(
    State(state): State<AppState>,
    Json(prefs): Json<Preferences>,
) -> Result<Json<PreferencesResponse>, GradewatchError> {
    let depth_changed = state.orchestrator.update_preferences(prefs).await?;
    Ok(Json(PreferencesResponse {
        preferences: state.orchestrator.preferences().await,
        depth_changed,
    }))
}

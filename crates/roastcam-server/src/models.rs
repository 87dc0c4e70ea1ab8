use axum::{Json, extract::State};
use serde_json::Value;

use crate::error::{MODELS_ERROR_FALLBACK, RouteError, RouteFailure};
use crate::state::AppState;

/// `GET /models`: upstream model list, passed through unchanged
pub async fn list_models(State(state): State<AppState>) -> Result<Json<Value>, RouteFailure> {
    let models = state.upstream().list_models().await.map_err(|e| {
        tracing::error!(error = %e, "failed to list models");
        RouteError::from(e).with_fallback(MODELS_ERROR_FALLBACK)
    })?;

    Ok(Json(models))
}

use axum::{Json, extract::State, response::IntoResponse};

use crate::error::ApiError;
use crate::{AppState, hierarchy, run_blocking};

/// GET /grows
pub async fn list_grow_phases(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let phases = run_blocking(&state, |s| hierarchy::list_grow_phases(&s.db)).await?;
    Ok(Json(phases))
}

/// GET /types
pub async fn list_plant_types(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let types = run_blocking(&state, |s| hierarchy::list_plant_types(&s.db)).await?;
    Ok(Json(types))
}

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
};

use growroom_types::api::CreatePlantRequest;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::{AppState, hierarchy, run_blocking};

/// POST /user/{user_id}/rooms/{room_id}/plants
pub async fn create_plant(
    State(state): State<AppState>,
    Path((user_id, room_id)): Path<(i64, i64)>,
    Extension(auth): Extension<AuthUser>,
    body: Result<Json<CreatePlantRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    auth.ensure_owner(user_id)?;
    let Json(req) = body?;

    let plant = run_blocking(&state, move |s| {
        hierarchy::create_plant(&s.db, user_id, room_id, &req)
    })
    .await?;
    Ok(Json(plant))
}

/// GET /user/{user_id}/rooms/{room_id}/plants
pub async fn list_plants(
    State(state): State<AppState>,
    Path((user_id, room_id)): Path<(i64, i64)>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    auth.ensure_owner(user_id)?;

    let plants =
        run_blocking(&state, move |s| hierarchy::list_plants(&s.db, user_id, room_id)).await?;
    Ok(Json(plants))
}

/// GET /user/{user_id}/rooms/{room_id}/plants/{plant_id}
pub async fn get_plant(
    State(state): State<AppState>,
    Path((user_id, room_id, plant_id)): Path<(i64, i64, i64)>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    auth.ensure_owner(user_id)?;

    let plant = run_blocking(&state, move |s| {
        hierarchy::get_plant(&s.db, user_id, room_id, plant_id)
    })
    .await?;
    Ok(Json(plant))
}

/// DELETE /user/{user_id}/rooms/{room_id}/plants/{plant_id}
pub async fn delete_plant(
    State(state): State<AppState>,
    Path((user_id, room_id, plant_id)): Path<(i64, i64, i64)>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    auth.ensure_owner(user_id)?;

    let plant = run_blocking(&state, move |s| {
        hierarchy::delete_plant(&s.db, user_id, room_id, plant_id)
    })
    .await?;
    Ok(Json(plant))
}

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use growroom_types::api::{CreateRoomRequest, RenameRoomRequest};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::{AppState, hierarchy, run_blocking};

/// POST /user/{user_id}/rooms
pub async fn create_room(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Extension(auth): Extension<AuthUser>,
    body: Result<Json<CreateRoomRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    auth.ensure_owner(user_id)?;
    let Json(req) = body?;

    let room = run_blocking(&state, move |s| hierarchy::create_room(&s.db, user_id, &req)).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// GET /user/{user_id}/rooms
pub async fn list_rooms(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    auth.ensure_owner(user_id)?;

    let rooms = run_blocking(&state, move |s| hierarchy::list_rooms(&s.db, user_id)).await?;
    Ok(Json(rooms))
}

/// PATCH /user/{user_id}/rooms/{room_id}
pub async fn rename_room(
    State(state): State<AppState>,
    Path((user_id, room_id)): Path<(i64, i64)>,
    Extension(auth): Extension<AuthUser>,
    body: Result<Json<RenameRoomRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    auth.ensure_owner(user_id)?;
    let Json(req) = body?;

    let room = run_blocking(&state, move |s| {
        hierarchy::rename_room(&s.db, user_id, room_id, &req)
    })
    .await?;
    Ok(Json(room))
}

/// DELETE /user/{user_id}/rooms/{room_id}
pub async fn delete_room(
    State(state): State<AppState>,
    Path((user_id, room_id)): Path<(i64, i64)>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    auth.ensure_owner(user_id)?;

    let room =
        run_blocking(&state, move |s| hierarchy::delete_room(&s.db, user_id, room_id)).await?;
    Ok(Json(room))
}

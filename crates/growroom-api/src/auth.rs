use std::sync::Arc;

use axum::{
    Extension, Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse,
};

use growroom_db::Database;
use growroom_types::api::{LoginRequest, RegisterRequest, RegisterResponse, UsersResponse};

use crate::accounts::{self, TokenKeys};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::run_blocking;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenKeys,
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;

    // Hashing runs on the blocking pool
    let user = run_blocking(&state, move |s| accounts::register(&s.db, &req)).await?;

    Ok(Json(RegisterResponse {
        message: "Registered successfully".into(),
        user,
    }))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let resp = run_blocking(&state, move |s| accounts::login(&s.db, &s.tokens, &req)).await?;
    Ok(Json(resp))
}

/// GET /me: the account behind the bearer token.
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = run_blocking(&state, move |s| accounts::current_user(&s.db, auth.user_id)).await?;
    Ok(Json(user))
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = run_blocking(&state, |s| accounts::list_users(&s.db)).await?;
    Ok(Json(UsersResponse { users }))
}

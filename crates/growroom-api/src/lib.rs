pub mod accounts;
pub mod auth;
pub mod catalog;
pub mod error;
pub mod hierarchy;
pub mod middleware;
pub mod plants;
pub mod rooms;

use axum::{
    Json, Router,
    routing::{get, patch, post},
};
use serde_json::{Value, json};
use tracing::error;

pub use auth::{AppState, AppStateInner};
pub use error::ApiError;

use crate::middleware::require_auth;

/// Build the HTTP surface. Everything under `/user/{user_id}` and the account
/// listings sit behind [`require_auth`]; signup, login and the reference
/// tables are public.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/grows", get(catalog::list_grow_phases))
        .route("/types", get(catalog::list_plant_types))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route("/me", get(auth::me))
        .route("/users", get(auth::list_users))
        .route(
            "/user/{user_id}/rooms",
            get(rooms::list_rooms).post(rooms::create_room),
        )
        .route(
            "/user/{user_id}/rooms/{room_id}",
            patch(rooms::rename_room).delete(rooms::delete_room),
        )
        .route(
            "/user/{user_id}/rooms/{room_id}/plants",
            get(plants::list_plants).post(plants::create_plant),
        )
        .route(
            "/user/{user_id}/rooms/{room_id}/plants/{plant_id}",
            get(plants::get_plant).delete(plants::delete_plant),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Run a synchronous database operation off the async runtime.
pub(crate) async fn run_blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppStateInner) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(state.as_ref()))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(format!("blocking task failed: {e}"))
        })?
}

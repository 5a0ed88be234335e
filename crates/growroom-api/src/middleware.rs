use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::AppState;
use crate::error::ApiError;

/// Identity proven by a verified bearer token. Inserted into the request
/// extensions by [`require_auth`]; handlers take it as `Extension<AuthUser>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
}

impl AuthUser {
    /// Reject callers acting on another user's resources.
    pub fn ensure_owner(&self, user_id: i64) -> Result<(), ApiError> {
        if self.user_id != user_id {
            warn!(
                "User {} attempted to access resources of user {}",
                self.user_id, user_id
            );
            return Err(ApiError::Forbidden(
                "You can only manage your own rooms and plants".into(),
            ));
        }
        Ok(())
    }
}

/// Extract and validate JWT from Authorization header.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let missing = || ApiError::Unauthorized("Missing bearer token".into());

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(missing)?;

    let claims = state.tokens.verify(token)?;

    req.extensions_mut().insert(AuthUser {
        user_id: claims.sub,
        username: claims.username,
    });
    Ok(next.run(req).await)
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::User;

// -- JWT Claims --

/// Bearer token claims. `sub` is the user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub iat: usize,
    pub exp: usize,
}

// -- Auth --
//
// Request fields are optional so that a missing field is reported as a
// validation error with a readable message instead of a generic rejection.

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

// -- Rooms --

#[derive(Debug, Default, Deserialize)]
pub struct CreateRoomRequest {
    pub name_room: Option<String>,
    pub id_user: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RenameRoomRequest {
    pub name_room: Option<String>,
}

// -- Plants --

#[derive(Debug, Default, Deserialize)]
pub struct CreatePlantRequest {
    pub id_room: Option<i64>,
    pub name_plant: Option<String>,
    pub type_plant: Option<i64>,
    pub grow_phase: Option<i64>,
    pub sensor_number: Option<i64>,
}

// -- Errors --

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub status_code: u16,
}

//! Password hashing, signup/login and bearer token issuance.
//!
//! Tokens are HS256 JWTs carrying the user id; verifying one needs only the
//! shared secret, never a database round trip.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::{info, warn};

use growroom_db::{Database, queries};
use growroom_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest};
use growroom_types::models::User;

use crate::error::ApiError;

pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// Signing material for bearer tokens, built once from the configured secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Sign a token for `user_id` that expires `ttl` after `now`.
    pub fn issue(
        &self,
        user_id: i64,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), ApiError> {
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("token encoding failed: {e}")))?;

        Ok((token, expires_at))
    }

    /// Check signature and expiry, returning the claims on success.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                warn!("Rejected bearer token: {}", e);
                ApiError::Unauthorized("Invalid or expired token".into())
            })
    }
}

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// False for any string other than the one that produced `hash`, and for
/// hashes that do not parse.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        warn!("Stored password hash is not a valid PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Returns the trimmed value of a required text field.
pub(crate) fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ApiError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::validation(format!("You need to specify the {field}"))),
    }
}

pub fn register(db: &Database, req: &RegisterRequest) -> Result<User, ApiError> {
    let username = required(&req.username, "username")?;
    let email = required(&req.email, "email")?;
    let location = required(&req.location, "location")?;
    // Passwords are not trimmed
    let password = match req.password.as_deref() {
        Some(p) if !p.is_empty() => p,
        _ => return Err(ApiError::validation("You need to specify the password")),
    };

    let password_hash = hash_password(password)?;

    let user = db.transaction(|conn| {
        if queries::user_by_email(conn, email)?.is_some() {
            return Err(ApiError::Conflict("Email is already registered".into()));
        }
        if queries::user_by_username(conn, username)?.is_some() {
            return Err(ApiError::Conflict("Username is already taken".into()));
        }

        let id = queries::insert_user(conn, username, email, &password_hash, location)?;
        queries::user_by_id(conn, id)?
            .ok_or_else(|| ApiError::Internal(format!("user {id} vanished after insert")))
    })?;

    info!("Registered user {} ({})", user.username, user.id);
    Ok(user.into())
}

pub fn login(
    db: &Database,
    keys: &TokenKeys,
    req: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let email = required(&req.email, "email")?;
    let password = match req.password.as_deref() {
        Some(p) if !p.is_empty() => p,
        _ => return Err(ApiError::validation("You need to specify the password")),
    };

    let invalid = || ApiError::Unauthorized("Email or password invalid".into());

    let Some(user) = db.get_user_by_email(email)? else {
        warn!("Login attempt for unknown email");
        return Err(invalid());
    };

    if !verify_password(password, &user.password) {
        warn!("Failed login for user {}", user.id);
        return Err(invalid());
    }

    if !user.is_active {
        return Err(ApiError::Unauthorized("Account is disabled".into()));
    }

    let (token, expires_at) = keys.issue(user.id, &user.username, Utc::now())?;

    Ok(LoginResponse {
        token,
        user_id: user.id,
        expires_at,
    })
}

/// Resolve a verified user id back to its account.
pub fn current_user(db: &Database, user_id: i64) -> Result<User, ApiError> {
    db.get_user_by_id(user_id)?
        .map(User::from)
        .ok_or_else(|| ApiError::not_found(format!("User {user_id} not found")))
}

pub fn list_users(db: &Database) -> Result<Vec<User>, ApiError> {
    Ok(db.get_users()?.into_iter().map(User::from).collect())
}

//! Registration, login, and logout.
//!
//! Passwords are stored as Argon2id PHC strings and never serialized back
//! to clients. Login issues an HS256 session token in an httpOnly,
//! same-site-strict cookie.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::tokens::{clear_session_cookie, session_cookie};
use super::AppState;
use crate::error::ApiError;
use crate::models::User;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct LoginResponse {
    details: User,
    message: &'static str,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(username), Some(email), Some(password)) = (body.username, body.email, body.password)
    else {
        return Err(ApiError::Validation(
            "Username, email, and password are required".into(),
        ));
    };
    let username = username.trim().to_string();
    let email = email.trim().to_lowercase();

    // Duplicate checks run before format checks, matching the original.
    if state.users.find_by_username(&username).await?.is_some() {
        return Err(ApiError::Conflict("Username already exists"));
    }
    if state.users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict("Email already exists"));
    }

    if !is_valid_email(&email) {
        return Err(ApiError::Validation(
            "Please enter a valid email address".into(),
        ));
    }
    if username.chars().count() < 3 {
        return Err(ApiError::Validation(
            "Username must be at least 3 characters long".into(),
        ));
    }
    if password.chars().count() < 6 {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters long".into(),
        ));
    }

    let hash = hash_password(&password)?;
    let mut user = User::new(username, email, hash);
    if let Some(url) = body.profile_picture {
        user = user.with_profile_picture(url);
    }
    state.users.create(&user).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User has been created successfully",
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(username), Some(password)) = (body.username, body.password) else {
        return Err(ApiError::Validation(
            "Username and password are required".into(),
        ));
    };

    let user = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    if !verify_password(&password, &user.password_hash)? {
        return Err(ApiError::WrongCredentials);
    }

    let token = state
        .keys
        .sign(user.id)
        .map_err(|e| ApiError::Internal(format!("failed to sign session token: {}", e)))?;

    Ok((
        [(
            header::SET_COOKIE,
            session_cookie(&token, state.cookie_secure),
        )],
        Json(LoginResponse {
            details: user,
            message: "Login successful",
        }),
    ))
}

pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_session_cookie(state.cookie_secure))],
        Json(MessageResponse {
            message: "Logged out successfully",
        }),
    )
}

/// Hash a password using Argon2id. Returns a PHC-format string.
fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("failed to hash password: {}", e)))
}

/// Verify a password against a PHC-format hash string.
fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ApiError::Internal(format!("invalid stored password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Minimal shape check: something@something.something, no whitespace.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    matches!(domain.rsplit_once('.'), Some((host, tld)) if !host.is_empty() && !tld.is_empty())
}

//! Authentication API handlers: signup and login.

use axum::{Json, extract::State, http::StatusCode};
use courtside::auth::{LoginRequest, LoginResponse, RegisterRequest};

use super::AppState;
use super::error::ApiError;
use super::users::UserResponse;
use crate::{logging, metrics};

/// Register a new player account.
///
/// Self-service signup always creates a Player; referee and organizer
/// accounts are provisioned by an organizer through `POST /api/users`.
///
/// Returns `201 Created` with the public user representation.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state.auth.register_user(payload).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Authenticate a user and issue an access token.
///
/// The response carries the signed token plus the username and role so the
/// frontend can route to the right dashboard without decoding the token.
///
/// # Errors
///
/// - `404 Not Found`: unknown username
/// - `401 Unauthorized`: wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = payload.username.clone();

    match state.auth.login(payload).await {
        Ok(response) => {
            metrics::login_attempts_total(true);
            Ok(Json(response))
        }
        Err(e) => {
            metrics::login_attempts_total(false);
            logging::log_security_event("failed_login", Some(&username), &e.client_message());
            Err(e.into())
        }
    }
}

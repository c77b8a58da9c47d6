//! User lookup and provisioning handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use courtside::auth::{AuthError, RegisterRequest, Role, User};
use serde::{Deserialize, Serialize};

use super::AppState;
use super::error::ApiError;

/// Public representation of a user; the password hash never leaves the
/// store.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub name: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            name: user.name,
            role: user.role,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserPayload {
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

/// Provision an account with an explicit role (organizer only).
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state
        .auth
        .create_user(
            RegisterRequest {
                username: payload.username,
                password: payload.password,
                name: payload.name,
            },
            payload.role,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// List users holding a role, e.g. the referees available for scheduling.
pub async fn users_by_role(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let role = Role::parse(&role.to_ascii_uppercase())
        .ok_or_else(|| ApiError::Auth(AuthError::InvalidRole(role)))?;

    let users = state.auth.users_by_role(role).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Look a single user up by username.
pub async fn user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.auth.user_by_username(&username).await?;
    Ok(Json(UserResponse::from(user)))
}

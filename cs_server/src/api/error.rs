//! Boundary error translation.
//!
//! Domain components raise specific, named failures; this module is the
//! single place where each of them is mapped to an HTTP status and a JSON
//! payload. The mapping is a total function over the closed failure
//! taxonomy, so it can be exercised directly in tests without an HTTP
//! harness.
//!
//! One deliberate oddity is preserved from the product's behavior: a
//! duplicate player registration is a *soft success*: status 200 with a
//! `{"status": ...}` payload, because the frontend treats "already
//! registered" as information, not an error.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use courtside::{AuthError, MatchError, NotificationError, RegistrationError, TournamentError};
use serde::Serialize;
use thiserror::Error;

/// Message shown for the soft-success duplicate registration case.
pub const ALREADY_REGISTERED_STATUS: &str = "You are already registered for this tournament";

/// One wrapper per domain component; handlers bubble these up with `?`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Notification(#[from] NotificationError),

    #[error(transparent)]
    Tournament(#[from] TournamentError),
}

/// Standard error payload
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Soft status payload for the duplicate-registration case
#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub status: String,
}

impl ApiError {
    /// Total mapping from failure kind to status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Auth(e) => match e {
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::InvalidPassword => StatusCode::UNAUTHORIZED,
                AuthError::UsernameTaken => StatusCode::CONFLICT,
                AuthError::InvalidUsername(_)
                | AuthError::WeakPassword(_)
                | AuthError::InvalidRole(_) => StatusCode::BAD_REQUEST,
                AuthError::HashingFailed | AuthError::Storage(_) | AuthError::Jwt(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Registration(e) => match e {
                // Soft success, see module docs.
                RegistrationError::AlreadyRegistered => StatusCode::OK,
                RegistrationError::PlayerNotFound
                | RegistrationError::TournamentNotFound
                | RegistrationError::NotFound(_)
                | RegistrationError::NoneForPlayer
                | RegistrationError::NoneForTournament
                | RegistrationError::NonePending => StatusCode::NOT_FOUND,
                RegistrationError::AlreadyDecided { .. } | RegistrationError::TournamentFull => {
                    StatusCode::CONFLICT
                }
                RegistrationError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Match(e) => match e {
                MatchError::UserNotFound(_)
                | MatchError::TournamentNotFound
                | MatchError::NotFound(_) => StatusCode::NOT_FOUND,
                MatchError::AlreadyScheduled => StatusCode::CONFLICT,
                MatchError::InvalidMatch(_) | MatchError::InvalidScore(_) => {
                    StatusCode::BAD_REQUEST
                }
                MatchError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Notification(e) => match e {
                NotificationError::UserNotFound | NotificationError::NotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                NotificationError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Tournament(e) => match e {
                TournamentError::NotFound => StatusCode::NOT_FOUND,
                TournamentError::NameTaken(_) => StatusCode::CONFLICT,
                TournamentError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// The payload message. Auth failures are sanitized; storage failures of
    /// the other components embed the underlying message.
    pub fn message(&self) -> String {
        match self {
            ApiError::Auth(e) => e.client_message(),
            ApiError::Registration(RegistrationError::Storage(e)) => format!("Internal error: {e}"),
            ApiError::Match(MatchError::Storage(e)) => format!("Internal error: {e}"),
            ApiError::Notification(NotificationError::Storage(e)) => format!("Internal error: {e}"),
            ApiError::Tournament(TournamentError::Storage(e)) => format!("Internal error: {e}"),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(
            self,
            ApiError::Registration(RegistrationError::AlreadyRegistered)
        ) {
            return (
                StatusCode::OK,
                Json(StatusBody {
                    status: ALREADY_REGISTERED_STATUS.to_string(),
                }),
            )
                .into_response();
        }

        let status = self.status_code();
        (
            status,
            Json(ErrorBody {
                message: self.message(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside::RegistrationStatus;
    use courtside::db::StoreError;

    fn taxonomy() -> Vec<(ApiError, StatusCode)> {
        vec![
            (AuthError::UserNotFound.into(), StatusCode::NOT_FOUND),
            (AuthError::InvalidPassword.into(), StatusCode::UNAUTHORIZED),
            (AuthError::UsernameTaken.into(), StatusCode::CONFLICT),
            (
                AuthError::WeakPassword("too short".into()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                AuthError::InvalidUsername("spaces".into()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                AuthError::InvalidRole("UMPIRE".into()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (AuthError::HashingFailed.into(), StatusCode::INTERNAL_SERVER_ERROR),
            (
                AuthError::Storage(StoreError::Duplicate).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (RegistrationError::AlreadyRegistered.into(), StatusCode::OK),
            (RegistrationError::PlayerNotFound.into(), StatusCode::NOT_FOUND),
            (
                RegistrationError::TournamentNotFound.into(),
                StatusCode::NOT_FOUND,
            ),
            (RegistrationError::NotFound(7).into(), StatusCode::NOT_FOUND),
            (RegistrationError::NoneForPlayer.into(), StatusCode::NOT_FOUND),
            (
                RegistrationError::NoneForTournament.into(),
                StatusCode::NOT_FOUND,
            ),
            (RegistrationError::NonePending.into(), StatusCode::NOT_FOUND),
            (
                RegistrationError::AlreadyDecided {
                    status: RegistrationStatus::Approved,
                }
                .into(),
                StatusCode::CONFLICT,
            ),
            (RegistrationError::TournamentFull.into(), StatusCode::CONFLICT),
            (
                RegistrationError::Storage(StoreError::Duplicate).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                MatchError::UserNotFound("Player1").into(),
                StatusCode::NOT_FOUND,
            ),
            (MatchError::TournamentNotFound.into(), StatusCode::NOT_FOUND),
            (MatchError::NotFound(3).into(), StatusCode::NOT_FOUND),
            (MatchError::AlreadyScheduled.into(), StatusCode::CONFLICT),
            (
                MatchError::InvalidMatch("a player cannot face themselves").into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                MatchError::InvalidScore("negative games".into()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                MatchError::Storage(StoreError::Duplicate).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (NotificationError::UserNotFound.into(), StatusCode::NOT_FOUND),
            (NotificationError::NotFound(5).into(), StatusCode::NOT_FOUND),
            (
                NotificationError::Storage(StoreError::Duplicate).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (TournamentError::NotFound.into(), StatusCode::NOT_FOUND),
            (
                TournamentError::NameTaken("Open".into()).into(),
                StatusCode::CONFLICT,
            ),
            (
                TournamentError::Storage(StoreError::Duplicate).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ]
    }

    #[test]
    fn test_status_mapping_is_total_over_the_taxonomy() {
        for (error, expected) in taxonomy() {
            assert_eq!(error.status_code(), expected, "{error:?}");
        }
    }

    #[test]
    fn test_storage_failures_embed_the_underlying_message() {
        let error: ApiError = RegistrationError::Storage(StoreError::Duplicate).into();
        assert!(error.message().starts_with("Internal error:"));
    }

    #[test]
    fn test_auth_storage_failures_are_sanitized() {
        let error: ApiError = AuthError::Storage(StoreError::Duplicate).into();
        assert_eq!(error.message(), "Internal server error");
    }

    #[test]
    fn test_duplicate_registration_is_a_soft_success() {
        let error: ApiError = RegistrationError::AlreadyRegistered.into();
        assert_eq!(error.status_code(), StatusCode::OK);

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

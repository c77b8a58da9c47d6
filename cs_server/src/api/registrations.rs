//! Registration workflow API handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use courtside::registration::{Registration, RegistrationStatus};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::{AppState, MessageBody};
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct RegisterPlayerPayload {
    pub player_username: String,
    pub tournament_id: i64,
}

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub id: i64,
    pub player: String,
    pub tournament: String,
    pub registration_date: DateTime<Utc>,
    pub status: RegistrationStatus,
}

impl From<Registration> for RegistrationResponse {
    fn from(registration: Registration) -> Self {
        Self {
            id: registration.id,
            player: registration.player_username,
            tournament: registration.tournament_name,
            registration_date: registration.registration_date,
            status: registration.status,
        }
    }
}

/// File a registration request for a tournament.
///
/// Returns `201 Created` with the pending registration. A repeated request
/// for the same (player, tournament) pair answers `200 OK` with an
/// "already registered" status payload rather than an error.
pub async fn register_player(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPlayerPayload>,
) -> Result<(StatusCode, Json<RegistrationResponse>), ApiError> {
    let registration = state
        .registrations
        .register_player(&payload.player_username, payload.tournament_id)
        .await?;

    metrics::registrations_submitted_total();
    Ok((StatusCode::CREATED, Json(registration.into())))
}

/// Approve a pending registration and notify the player.
pub async fn approve_registration(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageBody>, ApiError> {
    state.registrations.approve(id).await?;
    metrics::registration_decisions_total("approved");
    Ok(Json(MessageBody {
        message: "Registration approved".to_string(),
    }))
}

/// Deny a pending registration and notify the player.
pub async fn deny_registration(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageBody>, ApiError> {
    state.registrations.deny(id).await?;
    metrics::registration_decisions_total("denied");
    Ok(Json(MessageBody {
        message: "Registration denied".to_string(),
    }))
}

/// All registrations of a player, any status.
pub async fn registrations_by_player(
    State(state): State<AppState>,
    Path(player_id): Path<i64>,
) -> Result<Json<Vec<RegistrationResponse>>, ApiError> {
    let registrations = state.registrations.registrations_by_player(player_id).await?;
    Ok(Json(registrations.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    pub status: Option<RegistrationStatus>,
}

/// A tournament's registrations. Without a `?status=` filter this is the
/// roster: approved registrations only.
pub async fn registrations_by_tournament(
    State(state): State<AppState>,
    Path(tournament_id): Path<i64>,
    Query(filter): Query<StatusFilter>,
) -> Result<Json<Vec<RegistrationResponse>>, ApiError> {
    let registrations = state
        .registrations
        .registrations_by_tournament(tournament_id, filter.status)
        .await?;
    Ok(Json(registrations.into_iter().map(Into::into).collect()))
}

/// Registrations still awaiting a decision. Answers `404` when none are
/// pending.
pub async fn pending_registrations(
    State(state): State<AppState>,
    Path(tournament_id): Path<i64>,
) -> Result<Json<Vec<RegistrationResponse>>, ApiError> {
    let registrations = state
        .registrations
        .pending_by_tournament(tournament_id)
        .await?;
    Ok(Json(registrations.into_iter().map(Into::into).collect()))
}

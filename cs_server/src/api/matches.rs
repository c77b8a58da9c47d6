//! Match scheduling API handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use courtside::matches::{CreateMatch, Match, SetScore};
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ErrorBody};
use super::{AppState, MessageBody};
use crate::metrics;

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub id: i64,
    pub player1: String,
    pub player2: String,
    pub referee: String,
    pub tournament: String,
    pub court_number: i32,
    pub start_date: DateTime<Utc>,
    pub sets: Vec<SetScore>,
}

impl From<Match> for MatchResponse {
    fn from(m: Match) -> Self {
        Self {
            id: m.id,
            player1: m.player1,
            player2: m.player2,
            referee: m.referee,
            tournament: m.tournament_name,
            court_number: m.court_number,
            start_date: m.start_date,
            sets: m.sets,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateScorePayload {
    pub match_id: i64,
    pub sets: Vec<SetScore>,
}

/// Schedule a match between two players with a referee.
///
/// # Errors
///
/// - `404 Not Found`: unknown player, referee, or tournament
/// - `409 Conflict`: the identical match is already scheduled
/// - `400 Bad Request`: self-play, playing referee, or negative game counts
pub async fn create_match(
    State(state): State<AppState>,
    Json(payload): Json<CreateMatch>,
) -> Result<(StatusCode, Json<MatchResponse>), ApiError> {
    let created = state.matches.create_match(payload).await?;
    metrics::matches_scheduled_total();
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Replace a match's full set sequence. Callers resend the complete game
/// history; this is not an append.
pub async fn update_score(
    State(state): State<AppState>,
    Json(payload): Json<UpdateScorePayload>,
) -> Result<Json<MatchResponse>, ApiError> {
    let updated = state
        .matches
        .update_score(payload.match_id, payload.sets)
        .await?;
    Ok(Json(updated.into()))
}

/// Delete a match. Any failure, including a missing match, is reported as a
/// generic 500; delete-missing is not modeled as its own failure.
pub async fn delete_match(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.matches.delete_match(id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageBody {
                message: "Match deleted successfully.".to_string(),
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                message: format!("Failed to delete match: {e}"),
            }),
        )
            .into_response(),
    }
}

/// All matches of a tournament. No matches yet is a normal, empty answer.
pub async fn matches_by_tournament(
    State(state): State<AppState>,
    Path(tournament_id): Path<i64>,
) -> Result<Json<Vec<MatchResponse>>, ApiError> {
    let matches = state.matches.matches_by_tournament(tournament_id).await?;
    Ok(Json(matches.into_iter().map(Into::into).collect()))
}

/// All matches officiated by a referee.
pub async fn matches_by_referee(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<MatchResponse>>, ApiError> {
    let matches = state.matches.matches_by_referee(&username).await?;
    Ok(Json(matches.into_iter().map(Into::into).collect()))
}

/// All matches a player takes part in.
pub async fn matches_by_player(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<MatchResponse>>, ApiError> {
    let matches = state.matches.matches_by_player(&username).await?;
    Ok(Json(matches.into_iter().map(Into::into).collect()))
}

/// Download a tournament's matches as CSV.
pub async fn export_matches(
    State(state): State<AppState>,
    Path(tournament_id): Path<i64>,
) -> Result<Response, ApiError> {
    let csv = state.matches.export_matches_csv(tournament_id).await?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], csv).into_response())
}

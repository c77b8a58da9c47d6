//! Tournament API handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use courtside::tournament::{CreateTournament, Tournament};

use super::error::ApiError;
use super::{AppState, MessageBody};

/// Create a tournament (organizer only). Names are unique.
pub async fn create_tournament(
    State(state): State<AppState>,
    Json(payload): Json<CreateTournament>,
) -> Result<(StatusCode, Json<Tournament>), ApiError> {
    let tournament = state.tournaments.create_tournament(payload).await?;
    Ok((StatusCode::CREATED, Json(tournament)))
}

/// Delete a tournament. Its registrations and matches go with it.
pub async fn delete_tournament(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageBody>, ApiError> {
    state.tournaments.delete_tournament(id).await?;
    Ok(Json(MessageBody {
        message: "Tournament deleted".to_string(),
    }))
}

/// List all tournaments.
pub async fn list_tournaments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Tournament>>, ApiError> {
    Ok(Json(state.tournaments.list_tournaments().await?))
}

/// Look a tournament up by its unique name.
pub async fn tournament_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Tournament>, ApiError> {
    Ok(Json(state.tournaments.tournament_by_name(&name).await?))
}

/// Tournaments starting strictly after a date (`YYYY-MM-DD`).
pub async fn tournaments_starting_after(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Vec<Tournament>>, ApiError> {
    Ok(Json(state.tournaments.tournaments_starting_after(date).await?))
}

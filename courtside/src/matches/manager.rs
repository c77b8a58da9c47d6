//! Match scheduling, scoring, and projections.

use std::sync::Arc;

use log::info;
use thiserror::Error;

use super::models::{CreateMatch, Match, MatchId, SetScore};
use crate::db::repository::{MatchStore, StoreError, TournamentStore, UserStore};

/// Match scheduling errors
#[derive(Debug, Error)]
pub enum MatchError {
    /// One of the three participants could not be resolved; the payload
    /// names which ("Player1", "Player2", "Referee", "Player").
    #[error("{0} not found")]
    UserNotFound(&'static str),

    #[error("Tournament not found")]
    TournamentNotFound,

    #[error("This match already exists in the tournament")]
    AlreadyScheduled,

    #[error("Invalid match: {0}")]
    InvalidMatch(&'static str),

    #[error("Invalid score: {0}")]
    InvalidScore(String),

    #[error("Match not found: {0}")]
    NotFound(MatchId),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

pub type MatchResult<T> = Result<T, MatchError>;

/// Validates and persists matches and their set scores.
#[derive(Clone)]
pub struct MatchManager {
    users: Arc<dyn UserStore>,
    tournaments: Arc<dyn TournamentStore>,
    matches: Arc<dyn MatchStore>,
}

impl MatchManager {
    pub fn new(
        users: Arc<dyn UserStore>,
        tournaments: Arc<dyn TournamentStore>,
        matches: Arc<dyn MatchStore>,
    ) -> Self {
        Self {
            users,
            tournaments,
            matches,
        }
    }

    /// Schedule a match.
    ///
    /// The two players must be distinct and the referee must not be one of
    /// them. The (player1, player2, referee, tournament, start_date) tuple
    /// must not already be scheduled. Courts and start times are not checked
    /// for double-booking.
    pub async fn create_match(&self, request: CreateMatch) -> MatchResult<Match> {
        let player1 = self.resolve_user(&request.player1_username, "Player1").await?;
        let player2 = self.resolve_user(&request.player2_username, "Player2").await?;
        let referee = self.resolve_user(&request.referee_username, "Referee").await?;

        let tournament = self
            .tournaments
            .find_by_id(request.tournament_id)
            .await?
            .ok_or(MatchError::TournamentNotFound)?;

        // Fast path; the composite unique index is the authoritative guard.
        if self
            .matches
            .exists(
                player1.id,
                player2.id,
                referee.id,
                tournament.id,
                request.start_date,
            )
            .await?
        {
            return Err(MatchError::AlreadyScheduled);
        }

        if player1.id == player2.id {
            return Err(MatchError::InvalidMatch("a player cannot face themselves"));
        }
        if referee.id == player1.id || referee.id == player2.id {
            return Err(MatchError::InvalidMatch(
                "a player cannot referee their own match",
            ));
        }

        validate_sets(&request.sets)?;

        let created = match self
            .matches
            .insert(
                &player1,
                &player2,
                &referee,
                &tournament,
                request.court_number,
                request.start_date,
                &request.sets,
            )
            .await
        {
            Ok(created) => created,
            Err(StoreError::Duplicate) => return Err(MatchError::AlreadyScheduled),
            Err(e) => return Err(e.into()),
        };

        info!(
            "scheduled match {} ({} vs {}) in tournament {}",
            created.id, created.player1, created.player2, created.tournament_name
        );

        Ok(created)
    }

    /// Replace the full set sequence of a match. This is not an incremental
    /// append; callers resend the complete game history every time.
    pub async fn update_score(&self, match_id: MatchId, sets: Vec<SetScore>) -> MatchResult<Match> {
        validate_sets(&sets)?;

        self.matches
            .replace_sets(match_id, &sets)
            .await?
            .ok_or(MatchError::NotFound(match_id))
    }

    /// Remove a match.
    pub async fn delete_match(&self, match_id: MatchId) -> MatchResult<()> {
        if self.matches.delete(match_id).await? {
            Ok(())
        } else {
            Err(MatchError::NotFound(match_id))
        }
    }

    /// All matches of a tournament. An empty list is a normal result.
    pub async fn matches_by_tournament(&self, tournament_id: i64) -> MatchResult<Vec<Match>> {
        Ok(self.matches.list_by_tournament(tournament_id).await?)
    }

    /// All matches officiated by a referee.
    pub async fn matches_by_referee(&self, username: &str) -> MatchResult<Vec<Match>> {
        let referee = self.resolve_user(username, "Referee").await?;
        Ok(self.matches.list_by_referee(referee.id).await?)
    }

    /// All matches a player takes part in.
    pub async fn matches_by_player(&self, username: &str) -> MatchResult<Vec<Match>> {
        let player = self.resolve_user(username, "Player").await?;
        Ok(self.matches.list_by_player(player.id).await?)
    }

    /// Render a tournament's matches as CSV for download.
    pub async fn export_matches_csv(&self, tournament_id: i64) -> MatchResult<String> {
        let matches = self.matches.list_by_tournament(tournament_id).await?;

        let mut csv = String::from("Match ID,Player 1,Player 2,Referee,Court,Start Date,Set Scores\n");
        for m in matches {
            let sets = m
                .sets
                .iter()
                .map(|s| format!("{}-{}", s.player1_games, s.player2_games))
                .collect::<Vec<_>>()
                .join(" | ");
            csv.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                m.id, m.player1, m.player2, m.referee, m.court_number, m.start_date, sets
            ));
        }

        Ok(csv)
    }

    async fn resolve_user(
        &self,
        username: &str,
        label: &'static str,
    ) -> MatchResult<crate::auth::models::User> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or(MatchError::UserNotFound(label))
    }
}

fn validate_sets(sets: &[SetScore]) -> MatchResult<()> {
    if let Some(bad) = sets.iter().find(|s| !s.is_valid()) {
        return Err(MatchError::InvalidScore(format!(
            "game counts must be non-negative, got {}-{}",
            bad.player1_games, bad.player2_games
        )));
    }
    Ok(())
}

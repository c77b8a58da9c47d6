//! Match and set score data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Match ID type
pub type MatchId = i64;

/// Game count for both players within one set. Has no identity of its own;
/// it only exists as an element of a match's ordered set sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScore {
    pub player1_games: i32,
    pub player2_games: i32,
}

impl SetScore {
    /// Game counts are non-negative; nothing else is validated (a 6-0 set and
    /// a 99-98 set are equally acceptable to the scheduler).
    pub fn is_valid(self) -> bool {
        self.player1_games >= 0 && self.player2_games >= 0
    }
}

/// A scheduled contest between two players officiated by a referee.
///
/// Identified by the (player1, player2, referee, tournament, start_date)
/// tuple; usernames and the tournament name are denormalized for
/// presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub player1_id: i64,
    pub player1: String,
    pub player2_id: i64,
    pub player2: String,
    pub referee_id: i64,
    pub referee: String,
    pub tournament_id: i64,
    pub tournament_name: String,
    pub court_number: i32,
    pub start_date: DateTime<Utc>,
    pub sets: Vec<SetScore>,
}

/// Everything needed to schedule a match. Participants are referenced by
/// username, the way the admin dashboard submits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMatch {
    pub player1_username: String,
    pub player2_username: String,
    pub referee_username: String,
    pub tournament_id: i64,
    pub court_number: i32,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub sets: Vec<SetScore>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_score_validity() {
        assert!(SetScore { player1_games: 6, player2_games: 4 }.is_valid());
        assert!(SetScore { player1_games: 0, player2_games: 0 }.is_valid());
        assert!(!SetScore { player1_games: -1, player2_games: 4 }.is_valid());
        assert!(!SetScore { player1_games: 6, player2_games: -3 }.is_valid());
    }
}

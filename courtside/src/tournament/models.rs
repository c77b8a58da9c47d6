//! Tournament data models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tournament ID type
pub type TournamentId = i64;

/// Tournament model. `max_participants` bounds the approved roster, not the
/// number of pending registration requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub registration_deadline: Option<NaiveDate>,
    pub max_participants: i32,
}

/// Everything needed to create a tournament.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTournament {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub registration_deadline: Option<NaiveDate>,
    pub max_participants: i32,
}

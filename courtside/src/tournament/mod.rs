//! Tournament management module.

pub mod manager;
pub mod models;

pub use manager::{TournamentError, TournamentManager, TournamentResult};
pub use models::{CreateTournament, Tournament, TournamentId};

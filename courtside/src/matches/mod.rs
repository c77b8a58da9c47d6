//! Match scheduling module.
//!
//! A match pairs two distinct players with a referee who is neither of them,
//! on a court at a start time, and carries an ordered sequence of set
//! scores. Scores are updated by replacing the whole sequence. Courts and
//! participants are not checked for overlapping bookings.

pub mod manager;
pub mod models;

pub use manager::{MatchError, MatchManager, MatchResult};
pub use models::{CreateMatch, Match, MatchId, SetScore};

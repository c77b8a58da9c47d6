//! Registration data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registration ID type
pub type RegistrationId = i64;

/// Lifecycle of a registration request.
///
/// Starts at `Pending`; `Approved` and `Denied` are both terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Denied,
}

impl RegistrationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "PENDING",
            RegistrationStatus::Approved => "APPROVED",
            RegistrationStatus::Denied => "DENIED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(RegistrationStatus::Pending),
            "APPROVED" => Some(RegistrationStatus::Approved),
            "DENIED" => Some(RegistrationStatus::Denied),
            _ => None,
        }
    }
}

/// A player's registration request for a tournament, denormalized with the
/// player username and tournament name for presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub player_id: i64,
    pub player_username: String,
    pub tournament_id: i64,
    pub tournament_name: String,
    pub registration_date: DateTime<Utc>,
    pub status: RegistrationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            RegistrationStatus::Pending,
            RegistrationStatus::Approved,
            RegistrationStatus::Denied,
        ] {
            assert_eq!(RegistrationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RegistrationStatus::parse("WAITLISTED"), None);
    }
}

//! Identity and authentication data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User ID type
pub type UserId = i64;

/// Account role, decides which operations a principal may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Player,
    Referee,
    Organizer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Player => "PLAYER",
            Role::Referee => "REFEREE",
            Role::Organizer => "ORGANIZER",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PLAYER" => Some(Role::Player),
            "REFEREE" => Some(Role::Referee),
            "ORGANIZER" => Some(Role::Organizer),
            _ => None,
        }
    }
}

/// User model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// The authenticated identity attached to a request after the bearer
/// credential has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub role: Role,
}

/// User registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub name: String,
}

/// User login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login outcome: the signed credential plus the claims the
/// frontend needs without decoding it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub username: String,
}

/// JWT claims for access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String, // Username
    pub role: Role,
    pub exp: i64, // Expiration timestamp
    pub iat: i64, // Issued at timestamp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Player, Role::Referee, Role::Organizer] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("UMPIRE"), None);
        assert_eq!(Role::parse("player"), None);
    }

    #[test]
    fn test_role_serde_uses_screaming_case() {
        let json = serde_json::to_string(&Role::Organizer).unwrap();
        assert_eq!(json, "\"ORGANIZER\"");
        let back: Role = serde_json::from_str("\"REFEREE\"").unwrap();
        assert_eq!(back, Role::Referee);
    }
}

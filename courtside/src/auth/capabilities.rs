//! Declarative capability map: which role may call which operation.
//!
//! Authorization is data, not scattered per-handler checks: every REST
//! operation has exactly one entry here, and the guard middleware consults it
//! once per request. An operation with `Access::Open` is reachable without a
//! credential.

use super::models::{Principal, Role};

/// Every operation exposed over the REST surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    RegisterUser,
    Login,
    CreateUser,
    UsersByRole,
    UserByUsername,
    CreateTournament,
    DeleteTournament,
    ListTournaments,
    TournamentByName,
    TournamentsAfter,
    RegisterPlayer,
    RegistrationsByPlayer,
    TournamentRoster,
    PendingRegistrations,
    ApproveRegistration,
    DenyRegistration,
    CreateMatch,
    UpdateScore,
    DeleteMatch,
    MatchesByTournament,
    ExportMatches,
    MatchesByReferee,
    MatchesByPlayer,
    NotificationsForUser,
    MarkNotificationRead,
}

/// Role requirement of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Reachable without a credential.
    Open,
    /// Any authenticated principal.
    Authenticated,
    /// Only principals holding one of the listed roles.
    Role(&'static [Role]),
}

/// Why an operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenied {
    /// No (valid) credential was presented but one is required.
    Unauthenticated,
    /// The principal's role is not in the operation's required set.
    Forbidden,
}

impl Operation {
    pub const ALL: [Operation; 25] = [
        Operation::RegisterUser,
        Operation::Login,
        Operation::CreateUser,
        Operation::UsersByRole,
        Operation::UserByUsername,
        Operation::CreateTournament,
        Operation::DeleteTournament,
        Operation::ListTournaments,
        Operation::TournamentByName,
        Operation::TournamentsAfter,
        Operation::RegisterPlayer,
        Operation::RegistrationsByPlayer,
        Operation::TournamentRoster,
        Operation::PendingRegistrations,
        Operation::ApproveRegistration,
        Operation::DenyRegistration,
        Operation::CreateMatch,
        Operation::UpdateScore,
        Operation::DeleteMatch,
        Operation::MatchesByTournament,
        Operation::ExportMatches,
        Operation::MatchesByReferee,
        Operation::MatchesByPlayer,
        Operation::NotificationsForUser,
        Operation::MarkNotificationRead,
    ];

    /// The HTTP method and route template this operation is served under.
    ///
    /// The templates must match the router registrations exactly; the guard
    /// middleware looks requests up by their matched route.
    pub fn route(self) -> (&'static str, &'static str) {
        match self {
            Operation::RegisterUser => ("POST", "/api/auth/register"),
            Operation::Login => ("POST", "/api/auth/login"),
            Operation::CreateUser => ("POST", "/api/users"),
            Operation::UsersByRole => ("GET", "/api/users/role/{role}"),
            Operation::UserByUsername => ("GET", "/api/users/{username}"),
            Operation::CreateTournament => ("POST", "/api/tournaments"),
            Operation::DeleteTournament => ("DELETE", "/api/tournaments/{id}"),
            Operation::ListTournaments => ("GET", "/api/tournaments"),
            Operation::TournamentByName => ("GET", "/api/tournaments/name/{name}"),
            Operation::TournamentsAfter => ("GET", "/api/tournaments/after/{date}"),
            Operation::RegisterPlayer => ("POST", "/api/registrations"),
            Operation::RegistrationsByPlayer => ("GET", "/api/registrations/player/{player_id}"),
            Operation::TournamentRoster => ("GET", "/api/registrations/tournament/{tournament_id}"),
            Operation::PendingRegistrations => {
                ("GET", "/api/registrations/tournament/{tournament_id}/pending")
            }
            Operation::ApproveRegistration => ("POST", "/api/registrations/{id}/approve"),
            Operation::DenyRegistration => ("POST", "/api/registrations/{id}/deny"),
            Operation::CreateMatch => ("POST", "/api/matches"),
            Operation::UpdateScore => ("PUT", "/api/matches/score"),
            Operation::DeleteMatch => ("DELETE", "/api/matches/{id}"),
            Operation::MatchesByTournament => ("GET", "/api/matches/tournament/{tournament_id}"),
            Operation::ExportMatches => ("GET", "/api/matches/tournament/{tournament_id}/export"),
            Operation::MatchesByReferee => ("GET", "/api/matches/referee/{username}"),
            Operation::MatchesByPlayer => ("GET", "/api/matches/player/{username}"),
            Operation::NotificationsForUser => ("GET", "/api/notifications/user/{username}"),
            Operation::MarkNotificationRead => ("POST", "/api/notifications/mark-as-read/{id}"),
        }
    }

    /// Required role set. Organizer-only entries correspond to the admin
    /// dashboard, score entry is shared between referees and organizers.
    pub fn access(self) -> Access {
        const ORGANIZER: &[Role] = &[Role::Organizer];
        const SCOREKEEPERS: &[Role] = &[Role::Referee, Role::Organizer];

        match self {
            Operation::RegisterUser | Operation::Login => Access::Open,
            Operation::ListTournaments
            | Operation::TournamentByName
            | Operation::TournamentsAfter
            | Operation::TournamentRoster
            | Operation::MatchesByTournament => Access::Open,
            Operation::UsersByRole
            | Operation::UserByUsername
            | Operation::RegisterPlayer
            | Operation::RegistrationsByPlayer
            | Operation::MatchesByReferee
            | Operation::MatchesByPlayer
            | Operation::NotificationsForUser
            | Operation::MarkNotificationRead => Access::Authenticated,
            Operation::CreateUser
            | Operation::CreateTournament
            | Operation::DeleteTournament
            | Operation::PendingRegistrations
            | Operation::ApproveRegistration
            | Operation::DenyRegistration
            | Operation::CreateMatch
            | Operation::DeleteMatch
            | Operation::ExportMatches => Access::Role(ORGANIZER),
            Operation::UpdateScore => Access::Role(SCOREKEEPERS),
        }
    }

    /// Reverse lookup from a request's method and matched route template.
    pub fn from_route(method: &str, path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| {
            let (m, p) = op.route();
            m == method && p == path
        })
    }
}

/// Decide whether a principal (or its absence) may perform an operation with
/// the given requirement.
pub fn authorize(access: Access, principal: Option<&Principal>) -> Result<(), AccessDenied> {
    match access {
        Access::Open => Ok(()),
        Access::Authenticated => {
            if principal.is_some() {
                Ok(())
            } else {
                Err(AccessDenied::Unauthenticated)
            }
        }
        Access::Role(roles) => match principal {
            None => Err(AccessDenied::Unauthenticated),
            Some(p) if roles.contains(&p.role) => Ok(()),
            Some(_) => Err(AccessDenied::Forbidden),
        },
    }
}

//! Registration workflow: request, approve or deny, list.

use std::sync::Arc;

use chrono::Utc;
use log::warn;
use thiserror::Error;

use super::models::{Registration, RegistrationId, RegistrationStatus};
use crate::db::repository::{RegistrationStore, StoreError, TournamentStore, UserStore};
use crate::notification::NotificationManager;

/// Registration errors
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Player not found")]
    PlayerNotFound,

    #[error("Tournament not found")]
    TournamentNotFound,

    #[error("The player is already registered for this tournament")]
    AlreadyRegistered,

    #[error("Registration not found: {0}")]
    NotFound(RegistrationId),

    /// Approve/deny on a registration that is no longer pending.
    #[error("Registration has already been decided")]
    AlreadyDecided { status: RegistrationStatus },

    /// The approved roster is at the tournament's capacity.
    #[error("Tournament is full")]
    TournamentFull,

    #[error("This player is not registered for any tournament")]
    NoneForPlayer,

    #[error("No registrations for this tournament")]
    NoneForTournament,

    #[error("No pending registrations for this tournament")]
    NonePending,

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

pub type RegistrationResult<T> = Result<T, RegistrationError>;

/// Manages the lifecycle of registration requests and dispatches the
/// decision notifications.
#[derive(Clone)]
pub struct RegistrationManager {
    users: Arc<dyn UserStore>,
    tournaments: Arc<dyn TournamentStore>,
    registrations: Arc<dyn RegistrationStore>,
    notifications: NotificationManager,
}

impl RegistrationManager {
    pub fn new(
        users: Arc<dyn UserStore>,
        tournaments: Arc<dyn TournamentStore>,
        registrations: Arc<dyn RegistrationStore>,
        notifications: NotificationManager,
    ) -> Self {
        Self {
            users,
            tournaments,
            registrations,
            notifications,
        }
    }

    /// File a registration request for a player. The new registration is
    /// Pending and stamped now.
    ///
    /// # Errors
    ///
    /// * `RegistrationError::PlayerNotFound` / `TournamentNotFound`
    /// * `RegistrationError::AlreadyRegistered` - the (player, tournament)
    ///   pair already has a registration, whatever its status
    pub async fn register_player(
        &self,
        player_username: &str,
        tournament_id: i64,
    ) -> RegistrationResult<Registration> {
        let player = self
            .users
            .find_by_username(player_username)
            .await?
            .ok_or(RegistrationError::PlayerNotFound)?;

        let tournament = self
            .tournaments
            .find_by_id(tournament_id)
            .await?
            .ok_or(RegistrationError::TournamentNotFound)?;

        // Fast path for a friendly error; the unique index on
        // (player_id, tournament_id) is what actually guarantees uniqueness
        // under concurrent submissions.
        if self.registrations.exists(player.id, tournament.id).await? {
            return Err(RegistrationError::AlreadyRegistered);
        }

        match self
            .registrations
            .insert(&player, &tournament, Utc::now())
            .await
        {
            Ok(registration) => Ok(registration),
            Err(StoreError::Duplicate) => Err(RegistrationError::AlreadyRegistered),
            Err(e) => Err(e.into()),
        }
    }

    /// Approve a pending registration and notify the player.
    ///
    /// Approval is capacity-checked: once the approved roster has reached
    /// the tournament's `max_participants`, further approvals fail with
    /// `TournamentFull`.
    pub async fn approve(&self, registration_id: RegistrationId) -> RegistrationResult<Registration> {
        let registration = self.pending_registration(registration_id).await?;

        let tournament = self
            .tournaments
            .find_by_id(registration.tournament_id)
            .await?
            .ok_or(RegistrationError::TournamentNotFound)?;

        let approved = self
            .registrations
            .count_with_status(tournament.id, RegistrationStatus::Approved)
            .await?;
        if approved >= i64::from(tournament.max_participants) {
            return Err(RegistrationError::TournamentFull);
        }

        self.decide(registration, RegistrationStatus::Approved)
            .await
    }

    /// Deny a pending registration and notify the player. Denial is never
    /// capacity-limited.
    pub async fn deny(&self, registration_id: RegistrationId) -> RegistrationResult<Registration> {
        let registration = self.pending_registration(registration_id).await?;
        self.decide(registration, RegistrationStatus::Denied).await
    }

    async fn pending_registration(
        &self,
        registration_id: RegistrationId,
    ) -> RegistrationResult<Registration> {
        let registration = self
            .registrations
            .find_by_id(registration_id)
            .await?
            .ok_or(RegistrationError::NotFound(registration_id))?;

        if registration.status != RegistrationStatus::Pending {
            return Err(RegistrationError::AlreadyDecided {
                status: registration.status,
            });
        }

        Ok(registration)
    }

    /// Persist the terminal status, then dispatch the notification. The
    /// status write is durable before the notification is attempted, and a
    /// dispatch failure never rolls the decision back.
    async fn decide(
        &self,
        registration: Registration,
        status: RegistrationStatus,
    ) -> RegistrationResult<Registration> {
        self.registrations
            .set_status(registration.id, status)
            .await?;

        let message = match status {
            RegistrationStatus::Approved => format!(
                "Your registration for {} has been approved.",
                registration.tournament_name
            ),
            _ => format!(
                "Your registration for {} was denied.",
                registration.tournament_name
            ),
        };

        if let Err(e) = self
            .notifications
            .create_notification(&registration.player_username, &message)
            .await
        {
            warn!(
                "notification dispatch failed for registration {}: {}",
                registration.id, e
            );
        }

        Ok(Registration {
            status,
            ..registration
        })
    }

    /// All registrations of a player, any status.
    pub async fn registrations_by_player(
        &self,
        player_id: i64,
    ) -> RegistrationResult<Vec<Registration>> {
        self.users
            .find_by_id(player_id)
            .await?
            .ok_or(RegistrationError::PlayerNotFound)?;

        let registrations = self.registrations.list_by_player(player_id).await?;
        if registrations.is_empty() {
            return Err(RegistrationError::NoneForPlayer);
        }
        Ok(registrations)
    }

    /// A tournament's registrations. Without an explicit filter this is the
    /// roster: approved registrations only.
    pub async fn registrations_by_tournament(
        &self,
        tournament_id: i64,
        status_filter: Option<RegistrationStatus>,
    ) -> RegistrationResult<Vec<Registration>> {
        self.tournaments
            .find_by_id(tournament_id)
            .await?
            .ok_or(RegistrationError::TournamentNotFound)?;

        let status = status_filter.unwrap_or(RegistrationStatus::Approved);
        let registrations = self
            .registrations
            .list_by_tournament(tournament_id, status)
            .await?;
        if registrations.is_empty() {
            return Err(RegistrationError::NoneForTournament);
        }
        Ok(registrations)
    }

    /// Registrations still awaiting a decision.
    pub async fn pending_by_tournament(
        &self,
        tournament_id: i64,
    ) -> RegistrationResult<Vec<Registration>> {
        self.tournaments
            .find_by_id(tournament_id)
            .await?
            .ok_or(RegistrationError::TournamentNotFound)?;

        let registrations = self
            .registrations
            .list_by_tournament(tournament_id, RegistrationStatus::Pending)
            .await?;
        if registrations.is_empty() {
            return Err(RegistrationError::NonePending);
        }
        Ok(registrations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;
    use crate::db::repository::NotificationStore;
    use crate::db::repository::mock::{
        MockNotificationStore, MockRegistrationStore, MockTournamentStore, MockUserStore,
    };
    use chrono::NaiveDate;

    struct Fixture {
        manager: RegistrationManager,
        registrations: Arc<MockRegistrationStore>,
        notifications: Arc<MockNotificationStore>,
        users: Arc<MockUserStore>,
        tournaments: Arc<MockTournamentStore>,
    }

    async fn fixture() -> Fixture {
        let users = Arc::new(MockUserStore::new());
        let tournaments = Arc::new(MockTournamentStore::new());
        let registrations = Arc::new(MockRegistrationStore::new());
        let notifications = Arc::new(MockNotificationStore::new());

        users
            .create("alice", "hash", "Alice", Role::Player)
            .await
            .unwrap();
        tournaments
            .create(
                "Open",
                NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 9, 14).unwrap(),
                Some(NaiveDate::from_ymd_opt(2026, 8, 20).unwrap()),
                32,
            )
            .await
            .unwrap();

        let manager = RegistrationManager::new(
            users.clone(),
            tournaments.clone(),
            registrations.clone(),
            NotificationManager::new(users.clone(), notifications.clone()),
        );

        Fixture {
            manager,
            registrations,
            notifications,
            users,
            tournaments,
        }
    }

    #[tokio::test]
    async fn test_register_player_creates_pending_registration() {
        let f = fixture().await;

        let registration = f.manager.register_player("alice", 1).await.unwrap();
        assert_eq!(registration.status, RegistrationStatus::Pending);
        assert_eq!(registration.player_username, "alice");
        assert_eq!(registration.tournament_name, "Open");
        assert_eq!(f.registrations.row_count(), 1);
    }

    #[tokio::test]
    async fn test_register_player_unknown_user_or_tournament() {
        let f = fixture().await;

        let result = f.manager.register_player("nobody", 1).await;
        assert!(matches!(result, Err(RegistrationError::PlayerNotFound)));

        let result = f.manager.register_player("alice", 999).await;
        assert!(matches!(result, Err(RegistrationError::TournamentNotFound)));

        assert_eq!(f.registrations.row_count(), 0);
    }

    #[tokio::test]
    async fn test_second_registration_never_creates_a_second_row() {
        let f = fixture().await;

        f.manager.register_player("alice", 1).await.unwrap();
        let result = f.manager.register_player("alice", 1).await;
        assert!(matches!(result, Err(RegistrationError::AlreadyRegistered)));
        assert_eq!(f.registrations.row_count(), 1);
    }

    #[tokio::test]
    async fn test_approve_notifies_player_with_tournament_name() {
        let f = fixture().await;
        let registration = f.manager.register_player("alice", 1).await.unwrap();

        let approved = f.manager.approve(registration.id).await.unwrap();
        assert_eq!(approved.status, RegistrationStatus::Approved);

        let stored = f
            .registrations
            .find_by_id(registration.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, RegistrationStatus::Approved);

        assert_eq!(f.notifications.row_count(), 1);
        let inbox = f.notifications.list_for_user(1).await.unwrap();
        assert!(inbox[0].message.contains("approved"));
        assert!(inbox[0].message.contains("Open"));
    }

    #[tokio::test]
    async fn test_deny_notifies_player() {
        let f = fixture().await;
        let registration = f.manager.register_player("alice", 1).await.unwrap();

        let denied = f.manager.deny(registration.id).await.unwrap();
        assert_eq!(denied.status, RegistrationStatus::Denied);

        let inbox = f.notifications.list_for_user(1).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert!(inbox[0].message.contains("denied"));
    }

    #[tokio::test]
    async fn test_decision_is_terminal() {
        let f = fixture().await;
        let registration = f.manager.register_player("alice", 1).await.unwrap();
        f.manager.approve(registration.id).await.unwrap();

        let again = f.manager.approve(registration.id).await;
        assert!(matches!(
            again,
            Err(RegistrationError::AlreadyDecided {
                status: RegistrationStatus::Approved
            })
        ));

        let flip = f.manager.deny(registration.id).await;
        assert!(matches!(flip, Err(RegistrationError::AlreadyDecided { .. })));

        // Exactly one notification from the one real decision.
        assert_eq!(f.notifications.row_count(), 1);
    }

    #[tokio::test]
    async fn test_approve_missing_registration() {
        let f = fixture().await;
        let result = f.manager.approve(42).await;
        assert!(matches!(result, Err(RegistrationError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_approve_respects_tournament_capacity() {
        let f = fixture().await;
        // Capacity of one.
        f.tournaments
            .create(
                "Club Cup",
                NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 10, 2).unwrap(),
                None,
                1,
            )
            .await
            .unwrap();
        f.users
            .create("bob", "hash", "Bob", Role::Player)
            .await
            .unwrap();

        let first = f.manager.register_player("alice", 2).await.unwrap();
        let second = f.manager.register_player("bob", 2).await.unwrap();

        f.manager.approve(first.id).await.unwrap();
        let result = f.manager.approve(second.id).await;
        assert!(matches!(result, Err(RegistrationError::TournamentFull)));

        // The denied-for-capacity registration is still pending.
        let stored = f.registrations.find_by_id(second.id).await.unwrap().unwrap();
        assert_eq!(stored.status, RegistrationStatus::Pending);
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_roll_back_the_decision() {
        let f = fixture().await;
        let registration = f.manager.register_player("alice", 1).await.unwrap();

        f.notifications.fail_inserts(true);
        let approved = f.manager.approve(registration.id).await.unwrap();
        assert_eq!(approved.status, RegistrationStatus::Approved);

        let stored = f
            .registrations
            .find_by_id(registration.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, RegistrationStatus::Approved);
        assert_eq!(f.notifications.row_count(), 0);
    }

    #[tokio::test]
    async fn test_roster_and_pending_projections() {
        let f = fixture().await;
        f.users
            .create("bob", "hash", "Bob", Role::Player)
            .await
            .unwrap();

        let alice = f.manager.register_player("alice", 1).await.unwrap();
        f.manager.register_player("bob", 1).await.unwrap();
        f.manager.approve(alice.id).await.unwrap();

        let roster = f
            .manager
            .registrations_by_tournament(1, None)
            .await
            .unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].player_username, "alice");
        assert_eq!(roster[0].status, RegistrationStatus::Approved);

        let pending = f.manager.pending_by_tournament(1).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].player_username, "bob");
        assert_eq!(pending[0].status, RegistrationStatus::Pending);

        // An explicit filter overrides the roster default.
        let filtered = f
            .manager
            .registrations_by_tournament(1, Some(RegistrationStatus::Pending))
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].player_username, "bob");
    }

    #[tokio::test]
    async fn test_empty_projections_report_not_found() {
        let f = fixture().await;

        let result = f.manager.registrations_by_tournament(1, None).await;
        assert!(matches!(result, Err(RegistrationError::NoneForTournament)));

        let result = f.manager.pending_by_tournament(1).await;
        assert!(matches!(result, Err(RegistrationError::NonePending)));

        let result = f.manager.pending_by_tournament(999).await;
        assert!(matches!(result, Err(RegistrationError::TournamentNotFound)));

        let result = f.manager.registrations_by_player(1).await;
        assert!(matches!(result, Err(RegistrationError::NoneForPlayer)));

        let result = f.manager.registrations_by_player(999).await;
        assert!(matches!(result, Err(RegistrationError::PlayerNotFound)));
    }

    #[tokio::test]
    async fn test_registrations_by_player_includes_every_status() {
        let f = fixture().await;
        f.tournaments
            .create(
                "Masters",
                NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 11, 7).unwrap(),
                None,
                16,
            )
            .await
            .unwrap();

        let first = f.manager.register_player("alice", 1).await.unwrap();
        f.manager.register_player("alice", 2).await.unwrap();
        f.manager.deny(first.id).await.unwrap();

        let mine = f.manager.registrations_by_player(1).await.unwrap();
        assert_eq!(mine.len(), 2);
    }
}

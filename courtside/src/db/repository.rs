//! Store trait definitions for testability and dependency injection.
//!
//! This module provides trait-based abstractions over database operations,
//! enabling better testing through mock implementations and dependency
//! injection. The PostgreSQL implementations rely on the unique indexes in
//! `schema.sql` as the authoritative duplicate guard: a unique violation
//! surfaces as [`StoreError::Duplicate`] and the workflows translate it into
//! their domain conflict error, so concurrent duplicate submissions cannot
//! produce two rows even when the workflow-level existence check races.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use thiserror::Error;

use crate::auth::models::{Role, User};
use crate::matches::models::{Match, SetScore};
use crate::notification::models::Notification;
use crate::registration::models::{Registration, RegistrationStatus};
use crate::tournament::models::Tournament;

/// Errors surfaced by the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique constraint rejected the write.
    #[error("duplicate key")]
    Duplicate,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Map an insert error, turning unique violations into [`StoreError::Duplicate`].
fn map_insert_err(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate,
        _ => StoreError::Database(err),
    }
}

/// Trait for user identity store operations
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a new user
    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        name: &str,
        role: Role,
    ) -> StoreResult<User>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: i64) -> StoreResult<Option<User>>;

    /// Find user together with the stored password hash, for login
    async fn find_with_password(&self, username: &str) -> StoreResult<Option<(User, String)>>;

    /// List all users holding a role
    async fn list_by_role(&self, role: Role) -> StoreResult<Vec<User>>;
}

/// Trait for tournament store operations
#[async_trait]
pub trait TournamentStore: Send + Sync {
    /// Create a new tournament
    async fn create(
        &self,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        registration_deadline: Option<NaiveDate>,
        max_participants: i32,
    ) -> StoreResult<Tournament>;

    /// Find tournament by ID
    async fn find_by_id(&self, tournament_id: i64) -> StoreResult<Option<Tournament>>;

    /// Find tournament by its unique name
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Tournament>>;

    /// List all tournaments
    async fn list_all(&self) -> StoreResult<Vec<Tournament>>;

    /// Delete a tournament; registrations and matches cascade
    async fn delete(&self, tournament_id: i64) -> StoreResult<bool>;
}

/// Trait for registration store operations
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Insert a pending registration; the (player, tournament) pair is
    /// constrained unique
    async fn insert(
        &self,
        player: &User,
        tournament: &Tournament,
        registered_at: DateTime<Utc>,
    ) -> StoreResult<Registration>;

    /// Fast-path existence check for the (player, tournament) pair
    async fn exists(&self, player_id: i64, tournament_id: i64) -> StoreResult<bool>;

    /// Find registration by ID
    async fn find_by_id(&self, registration_id: i64) -> StoreResult<Option<Registration>>;

    /// Overwrite the status of a registration
    async fn set_status(&self, registration_id: i64, status: RegistrationStatus)
    -> StoreResult<()>;

    /// Count a tournament's registrations with the given status
    async fn count_with_status(
        &self,
        tournament_id: i64,
        status: RegistrationStatus,
    ) -> StoreResult<i64>;

    /// All registrations of a player, any status
    async fn list_by_player(&self, player_id: i64) -> StoreResult<Vec<Registration>>;

    /// A tournament's registrations with the given status
    async fn list_by_tournament(
        &self,
        tournament_id: i64,
        status: RegistrationStatus,
    ) -> StoreResult<Vec<Registration>>;
}

/// Trait for match store operations
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Insert a match; the (player1, player2, referee, tournament, start)
    /// identity tuple is constrained unique
    #[allow(clippy::too_many_arguments)]
    async fn insert(
        &self,
        player1: &User,
        player2: &User,
        referee: &User,
        tournament: &Tournament,
        court_number: i32,
        start_date: DateTime<Utc>,
        sets: &[SetScore],
    ) -> StoreResult<Match>;

    /// Fast-path existence check for the identity tuple
    async fn exists(
        &self,
        player1_id: i64,
        player2_id: i64,
        referee_id: i64,
        tournament_id: i64,
        start_date: DateTime<Utc>,
    ) -> StoreResult<bool>;

    /// Find match by ID
    async fn find_by_id(&self, match_id: i64) -> StoreResult<Option<Match>>;

    /// Replace the full set sequence of a match, returning the updated match
    /// or `None` if it does not exist
    async fn replace_sets(&self, match_id: i64, sets: &[SetScore]) -> StoreResult<Option<Match>>;

    /// Delete a match, reporting whether a row was removed
    async fn delete(&self, match_id: i64) -> StoreResult<bool>;

    /// All matches of a tournament, in storage order
    async fn list_by_tournament(&self, tournament_id: i64) -> StoreResult<Vec<Match>>;

    /// All matches officiated by a referee
    async fn list_by_referee(&self, referee_id: i64) -> StoreResult<Vec<Match>>;

    /// All matches a player takes part in, on either side of the net
    async fn list_by_player(&self, player_id: i64) -> StoreResult<Vec<Match>>;
}

/// Trait for notification store operations
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Append an unread notification for a user
    async fn insert(
        &self,
        recipient: &User,
        message: &str,
        timestamp: DateTime<Utc>,
    ) -> StoreResult<Notification>;

    /// Mark a notification read, reporting whether it exists. Marking an
    /// already-read notification reports `true` again.
    async fn mark_read(&self, notification_id: i64) -> StoreResult<bool>;

    /// A user's notifications, newest first
    async fn list_for_user(&self, user_id: i64) -> StoreResult<Vec<Notification>>;
}

fn user_from_row(row: &PgRow) -> User {
    let role: String = row.get("role");
    User {
        id: row.get("id"),
        username: row.get("username"),
        role: Role::parse(&role).unwrap_or(Role::Player),
        name: row.get("name"),
        created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
    }
}

fn tournament_from_row(row: &PgRow) -> Tournament {
    Tournament {
        id: row.get("id"),
        name: row.get("name"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        registration_deadline: row.get("registration_deadline"),
        max_participants: row.get("max_participants"),
    }
}

fn registration_from_row(row: &PgRow) -> Registration {
    let status: String = row.get("status");
    Registration {
        id: row.get("id"),
        player_id: row.get("player_id"),
        player_username: row.get("player_username"),
        tournament_id: row.get("tournament_id"),
        tournament_name: row.get("tournament_name"),
        registration_date: row
            .get::<chrono::NaiveDateTime, _>("registration_date")
            .and_utc(),
        status: RegistrationStatus::parse(&status).unwrap_or(RegistrationStatus::Pending),
    }
}

fn match_from_row(row: &PgRow) -> StoreResult<Match> {
    let sets: Vec<SetScore> = serde_json::from_value(row.get("sets"))?;
    Ok(Match {
        id: row.get("id"),
        player1_id: row.get("player1_id"),
        player1: row.get("player1"),
        player2_id: row.get("player2_id"),
        player2: row.get("player2"),
        referee_id: row.get("referee_id"),
        referee: row.get("referee"),
        tournament_id: row.get("tournament_id"),
        tournament_name: row.get("tournament_name"),
        court_number: row.get("court_number"),
        start_date: row.get::<chrono::NaiveDateTime, _>("start_date").and_utc(),
        sets,
    })
}

fn notification_from_row(row: &PgRow) -> Notification {
    Notification {
        id: row.get("id"),
        user_id: row.get("user_id"),
        message: row.get("message"),
        timestamp: row.get::<chrono::NaiveDateTime, _>("timestamp").and_utc(),
        read: row.get("read"),
    }
}

const MATCH_COLUMNS: &str = r#"
    m.id, m.player1_id, p1.username AS player1, m.player2_id, p2.username AS player2,
    m.referee_id, rf.username AS referee, m.tournament_id, t.name AS tournament_name,
    m.court_number, m.start_date, m.sets
    FROM matches m
    JOIN users p1 ON p1.id = m.player1_id
    JOIN users p2 ON p2.id = m.player2_id
    JOIN users rf ON rf.id = m.referee_id
    JOIN tournaments t ON t.id = m.tournament_id
"#;

const REGISTRATION_COLUMNS: &str = r#"
    r.id, r.player_id, u.username AS player_username, r.tournament_id,
    t.name AS tournament_name, r.registration_date, r.status
    FROM registrations r
    JOIN users u ON u.id = r.player_id
    JOIN tournaments t ON t.id = r.tournament_id
"#;

/// PostgreSQL implementation of `UserStore`
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        name: &str,
        role: Role,
    ) -> StoreResult<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, name, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, name, role, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(name)
        .bind(role.as_str())
        .bind(Utc::now().naive_utc())
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_err)?;

        Ok(user_from_row(&row))
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, name, role, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_by_id(&self, user_id: i64) -> StoreResult<Option<User>> {
        let row =
            sqlx::query("SELECT id, username, name, role, created_at FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_with_password(&self, username: &str) -> StoreResult<Option<(User, String)>> {
        let row = sqlx::query(
            "SELECT id, username, name, role, created_at, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row
            .as_ref()
            .map(|r| (user_from_row(r), r.get("password_hash"))))
    }

    async fn list_by_role(&self, role: Role) -> StoreResult<Vec<User>> {
        let rows = sqlx::query(
            "SELECT id, username, name, role, created_at FROM users WHERE role = $1 ORDER BY username",
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(user_from_row).collect())
    }
}

/// PostgreSQL implementation of `TournamentStore`
pub struct PgTournamentStore {
    pool: PgPool,
}

impl PgTournamentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TournamentStore for PgTournamentStore {
    async fn create(
        &self,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        registration_deadline: Option<NaiveDate>,
        max_participants: i32,
    ) -> StoreResult<Tournament> {
        let row = sqlx::query(
            r#"
            INSERT INTO tournaments (name, start_date, end_date, registration_deadline, max_participants)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, start_date, end_date, registration_deadline, max_participants
            "#,
        )
        .bind(name)
        .bind(start_date)
        .bind(end_date)
        .bind(registration_deadline)
        .bind(max_participants)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_err)?;

        Ok(tournament_from_row(&row))
    }

    async fn find_by_id(&self, tournament_id: i64) -> StoreResult<Option<Tournament>> {
        let row = sqlx::query(
            "SELECT id, name, start_date, end_date, registration_deadline, max_participants
             FROM tournaments WHERE id = $1",
        )
        .bind(tournament_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(tournament_from_row))
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Tournament>> {
        let row = sqlx::query(
            "SELECT id, name, start_date, end_date, registration_deadline, max_participants
             FROM tournaments WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(tournament_from_row))
    }

    async fn list_all(&self) -> StoreResult<Vec<Tournament>> {
        let rows = sqlx::query(
            "SELECT id, name, start_date, end_date, registration_deadline, max_participants
             FROM tournaments ORDER BY start_date",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(tournament_from_row).collect())
    }

    async fn delete(&self, tournament_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tournaments WHERE id = $1")
            .bind(tournament_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// PostgreSQL implementation of `RegistrationStore`
pub struct PgRegistrationStore {
    pool: PgPool,
}

impl PgRegistrationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationStore for PgRegistrationStore {
    async fn insert(
        &self,
        player: &User,
        tournament: &Tournament,
        registered_at: DateTime<Utc>,
    ) -> StoreResult<Registration> {
        let row = sqlx::query(
            r#"
            INSERT INTO registrations (player_id, tournament_id, registration_date, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(player.id)
        .bind(tournament.id)
        .bind(registered_at.naive_utc())
        .bind(RegistrationStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_err)?;

        Ok(Registration {
            id: row.get("id"),
            player_id: player.id,
            player_username: player.username.clone(),
            tournament_id: tournament.id,
            tournament_name: tournament.name.clone(),
            registration_date: registered_at,
            status: RegistrationStatus::Pending,
        })
    }

    async fn exists(&self, player_id: i64, tournament_id: i64) -> StoreResult<bool> {
        let row =
            sqlx::query("SELECT id FROM registrations WHERE player_id = $1 AND tournament_id = $2")
                .bind(player_id)
                .bind(tournament_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.is_some())
    }

    async fn find_by_id(&self, registration_id: i64) -> StoreResult<Option<Registration>> {
        let row = sqlx::query(&format!("SELECT {REGISTRATION_COLUMNS} WHERE r.id = $1"))
            .bind(registration_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(registration_from_row))
    }

    async fn set_status(
        &self,
        registration_id: i64,
        status: RegistrationStatus,
    ) -> StoreResult<()> {
        sqlx::query("UPDATE registrations SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(registration_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn count_with_status(
        &self,
        tournament_id: i64,
        status: RegistrationStatus,
    ) -> StoreResult<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total FROM registrations WHERE tournament_id = $1 AND status = $2",
        )
        .bind(tournament_id)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("total"))
    }

    async fn list_by_player(&self, player_id: i64) -> StoreResult<Vec<Registration>> {
        let rows = sqlx::query(&format!(
            "SELECT {REGISTRATION_COLUMNS} WHERE r.player_id = $1"
        ))
        .bind(player_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(registration_from_row).collect())
    }

    async fn list_by_tournament(
        &self,
        tournament_id: i64,
        status: RegistrationStatus,
    ) -> StoreResult<Vec<Registration>> {
        let rows = sqlx::query(&format!(
            "SELECT {REGISTRATION_COLUMNS} WHERE r.tournament_id = $1 AND r.status = $2"
        ))
        .bind(tournament_id)
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(registration_from_row).collect())
    }
}

/// PostgreSQL implementation of `MatchStore`
pub struct PgMatchStore {
    pool: PgPool,
}

impl PgMatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchStore for PgMatchStore {
    async fn insert(
        &self,
        player1: &User,
        player2: &User,
        referee: &User,
        tournament: &Tournament,
        court_number: i32,
        start_date: DateTime<Utc>,
        sets: &[SetScore],
    ) -> StoreResult<Match> {
        let sets_json = serde_json::to_value(sets)?;
        let row = sqlx::query(
            r#"
            INSERT INTO matches (player1_id, player2_id, referee_id, tournament_id, court_number, start_date, sets)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(player1.id)
        .bind(player2.id)
        .bind(referee.id)
        .bind(tournament.id)
        .bind(court_number)
        .bind(start_date.naive_utc())
        .bind(sets_json)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_err)?;

        Ok(Match {
            id: row.get("id"),
            player1_id: player1.id,
            player1: player1.username.clone(),
            player2_id: player2.id,
            player2: player2.username.clone(),
            referee_id: referee.id,
            referee: referee.username.clone(),
            tournament_id: tournament.id,
            tournament_name: tournament.name.clone(),
            court_number,
            start_date,
            sets: sets.to_vec(),
        })
    }

    async fn exists(
        &self,
        player1_id: i64,
        player2_id: i64,
        referee_id: i64,
        tournament_id: i64,
        start_date: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let row = sqlx::query(
            r#"
            SELECT id FROM matches
            WHERE player1_id = $1 AND player2_id = $2 AND referee_id = $3
              AND tournament_id = $4 AND start_date = $5
            "#,
        )
        .bind(player1_id)
        .bind(player2_id)
        .bind(referee_id)
        .bind(tournament_id)
        .bind(start_date.naive_utc())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    async fn find_by_id(&self, match_id: i64) -> StoreResult<Option<Match>> {
        let row = sqlx::query(&format!("SELECT {MATCH_COLUMNS} WHERE m.id = $1"))
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(match_from_row).transpose()
    }

    async fn replace_sets(&self, match_id: i64, sets: &[SetScore]) -> StoreResult<Option<Match>> {
        let sets_json = serde_json::to_value(sets)?;
        let result = sqlx::query("UPDATE matches SET sets = $1 WHERE id = $2")
            .bind(sets_json)
            .bind(match_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(match_id).await
    }

    async fn delete(&self, match_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(match_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_tournament(&self, tournament_id: i64) -> StoreResult<Vec<Match>> {
        let rows = sqlx::query(&format!("SELECT {MATCH_COLUMNS} WHERE m.tournament_id = $1"))
            .bind(tournament_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(match_from_row).collect()
    }

    async fn list_by_referee(&self, referee_id: i64) -> StoreResult<Vec<Match>> {
        let rows = sqlx::query(&format!("SELECT {MATCH_COLUMNS} WHERE m.referee_id = $1"))
            .bind(referee_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(match_from_row).collect()
    }

    async fn list_by_player(&self, player_id: i64) -> StoreResult<Vec<Match>> {
        let rows = sqlx::query(&format!(
            "SELECT {MATCH_COLUMNS} WHERE m.player1_id = $1 OR m.player2_id = $1"
        ))
        .bind(player_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(match_from_row).collect()
    }
}

/// PostgreSQL implementation of `NotificationStore`
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn insert(
        &self,
        recipient: &User,
        message: &str,
        timestamp: DateTime<Utc>,
    ) -> StoreResult<Notification> {
        let row = sqlx::query(
            r#"
            INSERT INTO notifications (user_id, message, timestamp, read)
            VALUES ($1, $2, $3, FALSE)
            RETURNING id
            "#,
        )
        .bind(recipient.id)
        .bind(message)
        .bind(timestamp.naive_utc())
        .fetch_one(&self.pool)
        .await?;

        Ok(Notification {
            id: row.get("id"),
            user_id: recipient.id,
            message: message.to_string(),
            timestamp,
            read: false,
        })
    }

    async fn mark_read(&self, notification_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1")
            .bind(notification_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_user(&self, user_id: i64) -> StoreResult<Vec<Notification>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, message, timestamp, read
            FROM notifications
            WHERE user_id = $1
            ORDER BY timestamp DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(notification_from_row).collect())
    }
}

//! # Courtside
//!
//! A tennis tournament administration library.
//!
//! Players register for tournaments, organizers approve or deny the
//! registrations, matches between two players are scheduled with a referee
//! and scored set-by-set, and players are notified of registration
//! decisions.
//!
//! ## Architecture
//!
//! All durable state lives in PostgreSQL behind store traits
//! ([`db::repository`]); each request is handled independently with no
//! in-process caching, queues, or long-lived locks. Uniqueness of
//! registrations and matches is guaranteed by database constraints, with the
//! workflow-level existence checks serving only to produce friendlier
//! errors.
//!
//! ## Core Modules
//!
//! - [`auth`]: accounts, stateless access tokens, and the capability map
//! - [`registration`]: the registration request lifecycle
//! - [`matches`]: match scheduling and set-by-set scoring
//! - [`notification`]: per-user notification records
//! - [`tournament`]: tournament management
//! - [`db`]: connection pooling and the store layer
//!
//! ## Example
//!
//! ```no_run
//! use courtside::db::{Database, DatabaseConfig, PgRegistrationStore, PgTournamentStore,
//!     PgNotificationStore, PgUserStore};
//! use courtside::notification::NotificationManager;
//! use courtside::registration::RegistrationManager;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&DatabaseConfig::from_env()).await?;
//!     let pool = db.pool().clone();
//!
//!     let users = Arc::new(PgUserStore::new(pool.clone()));
//!     let tournaments = Arc::new(PgTournamentStore::new(pool.clone()));
//!     let notifications = NotificationManager::new(
//!         users.clone(),
//!         Arc::new(PgNotificationStore::new(pool.clone())),
//!     );
//!     let registrations = RegistrationManager::new(
//!         users,
//!         tournaments,
//!         Arc::new(PgRegistrationStore::new(pool)),
//!         notifications,
//!     );
//!
//!     let registration = registrations.register_player("alice", 1).await?;
//!     println!("registered: {}", registration.id);
//!     Ok(())
//! }
//! ```

/// Accounts, credentials, and authorization.
pub mod auth;
pub use auth::{AuthError, AuthManager, AuthResult, Principal, Role};

/// Database pooling and store traits.
pub mod db;
pub use db::{Database, DatabaseConfig};

/// Match scheduling and scoring.
pub mod matches;
pub use matches::{MatchError, MatchManager};

/// Notification records.
pub mod notification;
pub use notification::{NotificationError, NotificationManager};

/// Registration workflow.
pub mod registration;
pub use registration::{RegistrationError, RegistrationManager, RegistrationStatus};

/// Tournament management.
pub mod tournament;
pub use tournament::{TournamentError, TournamentManager};

//! Registration workflow module.
//!
//! A registration starts Pending and is moved exactly once to Approved or
//! Denied by an organizer; both outcomes notify the player. The roster of a
//! tournament is its approved registrations.

pub mod manager;
pub mod models;

pub use manager::{RegistrationError, RegistrationManager, RegistrationResult};
pub use models::{Registration, RegistrationId, RegistrationStatus};

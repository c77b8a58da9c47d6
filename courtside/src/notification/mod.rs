//! Notification module.
//!
//! Notifications are created as a side effect of registration decisions and
//! retrieved per user, newest first. `read` transitions only from `false` to
//! `true`, and marking twice is harmless.

pub mod manager;
pub mod models;

pub use manager::{NotificationError, NotificationManager, NotificationResult};
pub use models::{Notification, NotificationId};

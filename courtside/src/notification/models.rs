//! Notification data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notification ID type
pub type NotificationId = i64;

/// A message delivered to a user as a side effect of a workflow transition.
/// `read` only ever moves from `false` to `true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: i64,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

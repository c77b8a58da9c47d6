//! Notification dispatch and retrieval.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use super::models::{Notification, NotificationId};
use crate::db::repository::{NotificationStore, StoreError, UserStore};

/// Notification errors
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("User not found")]
    UserNotFound,

    #[error("Notification not found: {0}")]
    NotFound(NotificationId),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

pub type NotificationResult<T> = Result<T, NotificationError>;

/// Creates and retrieves per-user notification records.
///
/// Only the registration workflow dispatches notifications today, but the
/// manager is generic over recipient and message so other workflows can
/// reuse it.
#[derive(Clone)]
pub struct NotificationManager {
    users: Arc<dyn UserStore>,
    notifications: Arc<dyn NotificationStore>,
}

impl NotificationManager {
    pub fn new(users: Arc<dyn UserStore>, notifications: Arc<dyn NotificationStore>) -> Self {
        Self {
            users,
            notifications,
        }
    }

    /// Append an unread notification for a user, stamped now.
    pub async fn create_notification(
        &self,
        username: &str,
        message: &str,
    ) -> NotificationResult<Notification> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(NotificationError::UserNotFound)?;

        Ok(self
            .notifications
            .insert(&user, message, Utc::now())
            .await?)
    }

    /// Mark a notification read. Marking an already-read notification is a
    /// no-op success, not an error.
    pub async fn mark_as_read(&self, notification_id: NotificationId) -> NotificationResult<()> {
        if self.notifications.mark_read(notification_id).await? {
            Ok(())
        } else {
            Err(NotificationError::NotFound(notification_id))
        }
    }

    /// A user's notifications, most recent first.
    pub async fn notifications_for_user(
        &self,
        username: &str,
    ) -> NotificationResult<Vec<Notification>> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(NotificationError::UserNotFound)?;

        Ok(self.notifications.list_for_user(user.id).await?)
    }
}

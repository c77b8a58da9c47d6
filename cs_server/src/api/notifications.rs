//! Notification API handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use courtside::notification::Notification;
use serde::Serialize;

use super::error::ApiError;
use super::{AppState, MessageBody};

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: i64,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            message: n.message,
            timestamp: n.timestamp,
            read: n.read,
        }
    }
}

/// A user's notifications, most recent first.
pub async fn notifications_for_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let notifications = state.notifications.notifications_for_user(&username).await?;
    Ok(Json(notifications.into_iter().map(Into::into).collect()))
}

/// Mark a notification read. Marking twice is a no-op success.
pub async fn mark_as_read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageBody>, ApiError> {
    state.notifications.mark_as_read(id).await?;
    Ok(Json(MessageBody {
        message: "Notification marked as read".to_string(),
    }))
}

//! Notification entities - persisted notifications and transient toasts.
//!
//! Notifications are kept newest-first in the notification store and survive
//! restarts; toasts are short-lived pop-ups that expire on a timer and are
//! never written to storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of a notification; also reused as the toast kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// Fired 1 hour before a booked event starts
    Reminder,
    /// Raised when a simulated payment completes
    PaymentSuccess,
    /// Fired when a booked event is within the next 24 hours
    EventSoon,
    /// General informational message
    Info,
}

/// Persisted notification model
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier for the notification
    pub id: Uuid,
    /// What triggered this notification
    #[serde(rename = "type")]
    pub kind: NotificationType,
    /// Short headline shown in the notification list
    pub title: String,
    /// Full message body
    pub message: String,
    /// Whether the user has seen this notification; monotonic
    pub read: bool,
    /// When the notification was created
    pub created_at: DateTime<Utc>,
    /// Optional reference to the catalog event this notification is about
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

/// Transient toast pop-up; expires after `duration_ms` and is never persisted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    /// Unique identifier, used to remove the toast once it expires
    pub id: Uuid,
    /// Visual kind, mirroring the notification that raised it
    pub kind: NotificationType,
    /// Short headline
    pub title: String,
    /// Message body
    pub message: String,
    /// How long the toast stays visible, in milliseconds
    pub duration_ms: u64,
}

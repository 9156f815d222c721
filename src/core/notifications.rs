//! Notification business logic - Persistent inbox plus transient toasts.
//!
//! The inbox is kept newest-first and snapshotted to storage after every
//! mutation. Toasts live only in memory: adding an inbox entry raises a
//! matching toast, and [`SharedNotifications`] spawns a timer per toast to
//! remove it once its display time is over.

use crate::{
    entities::{Notification, NotificationType, Toast},
    errors::Result,
    storage::{JsonStore, NOTIFICATIONS_KEY},
};
use chrono::Utc;
use std::{sync::Arc, time::Duration};
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// How long a toast stays visible unless the caller says otherwise.
pub const DEFAULT_TOAST_DURATION_MS: u64 = 5000;

/// Payload for a new inbox notification. Id, timestamp, and the unread flag
/// are assigned by the store.
#[derive(Clone, Debug)]
pub struct NewNotification {
    /// What triggered the notification.
    pub kind: NotificationType,
    /// Short headline.
    pub title: String,
    /// Message body.
    pub message: String,
    /// Catalog event this notification is about, if any.
    pub event_id: Option<String>,
}

/// Persistent store of notifications plus the in-memory toast list.
#[derive(Debug)]
pub struct NotificationStore {
    storage: JsonStore,
    notifications: Vec<Notification>,
    toasts: Vec<Toast>,
}

impl NotificationStore {
    /// Opens the store, loading any previously persisted notifications.
    /// Toasts always start empty; they never survive a restart.
    #[must_use]
    pub fn open(storage: JsonStore) -> Self {
        let notifications = storage.load(NOTIFICATIONS_KEY);
        Self {
            storage,
            notifications,
            toasts: Vec::new(),
        }
    }

    /// Adds a notification to the front of the inbox and raises a matching
    /// toast with the default duration.
    ///
    /// The returned value carries the assigned id and timestamp. The raised
    /// toast is the newest entry in [`toasts`](Self::toasts); timer-based
    /// removal is the caller's concern (see [`SharedNotifications::notify`]).
    pub fn add_notification(&mut self, new: NewNotification) -> Result<Notification> {
        let notification = Notification {
            id: Uuid::new_v4(),
            kind: new.kind,
            title: new.title,
            message: new.message,
            read: false,
            created_at: Utc::now(),
            event_id: new.event_id,
        };
        self.notifications.insert(0, notification.clone());
        self.persist()?;

        self.push_toast(
            notification.kind,
            &notification.title,
            &notification.message,
            DEFAULT_TOAST_DURATION_MS,
        );
        Ok(notification)
    }

    /// Marks one notification as read. Returns Ok(false) for unknown ids;
    /// marking an already-read entry is a successful no-op.
    pub fn mark_as_read(&mut self, notification_id: &Uuid) -> Result<bool> {
        let Some(notification) = self
            .notifications
            .iter_mut()
            .find(|n| n.id == *notification_id)
        else {
            return Ok(false);
        };
        notification.read = true;
        self.persist()?;
        Ok(true)
    }

    /// Marks every notification as read.
    pub fn mark_all_as_read(&mut self) -> Result<()> {
        for notification in &mut self.notifications {
            notification.read = true;
        }
        self.persist()
    }

    /// Deletes one notification. Returns Ok(false) for unknown ids.
    pub fn delete_notification(&mut self, notification_id: &Uuid) -> Result<bool> {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id != *notification_id);
        if self.notifications.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Empties the inbox. Toasts currently on screen are left alone.
    pub fn clear_all(&mut self) -> Result<()> {
        self.notifications.clear();
        self.persist()
    }

    /// Returns the inbox, newest first.
    #[must_use]
    pub fn all(&self) -> &[Notification] {
        &self.notifications
    }

    /// Returns the unread notifications, newest first.
    #[must_use]
    pub fn unread(&self) -> Vec<&Notification> {
        self.notifications.iter().filter(|n| !n.read).collect()
    }

    /// Number of unread notifications, as shown on the inbox badge.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    /// Returns the notifications attached to one event, newest first.
    #[must_use]
    pub fn by_event(&self, event_id: &str) -> Vec<&Notification> {
        self.notifications
            .iter()
            .filter(|n| n.event_id.as_deref() == Some(event_id))
            .collect()
    }

    /// Checks whether an event already has a notification of the given kind.
    /// Used to deduplicate reminder sweeps.
    #[must_use]
    pub fn has_event_notification(&self, event_id: &str, kind: NotificationType) -> bool {
        self.notifications
            .iter()
            .any(|n| n.kind == kind && n.event_id.as_deref() == Some(event_id))
    }

    /// Raises a toast without touching the inbox.
    pub fn push_toast(
        &mut self,
        kind: NotificationType,
        title: &str,
        message: &str,
        duration_ms: u64,
    ) -> Toast {
        let toast = Toast {
            id: Uuid::new_v4(),
            kind,
            title: title.to_string(),
            message: message.to_string(),
            duration_ms,
        };
        self.toasts.push(toast.clone());
        toast
    }

    /// Removes a toast, normally because its timer expired. Returns false
    /// if it was already gone.
    pub fn remove_toast(&mut self, toast_id: &Uuid) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != *toast_id);
        self.toasts.len() != before
    }

    /// Returns the toasts currently on screen, oldest first.
    #[must_use]
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    fn persist(&self) -> Result<()> {
        self.storage.save(NOTIFICATIONS_KEY, &self.notifications)
    }
}

/// Cloneable handle to the notification store, shared between the app and
/// the spawned timer tasks.
#[derive(Clone, Debug)]
pub struct SharedNotifications(Arc<Mutex<NotificationStore>>);

impl SharedNotifications {
    /// Wraps a store for shared use.
    #[must_use]
    pub fn new(store: NotificationStore) -> Self {
        Self(Arc::new(Mutex::new(store)))
    }

    /// Locks the store for direct reads or writes.
    pub async fn lock(&self) -> MutexGuard<'_, NotificationStore> {
        self.0.lock().await
    }

    /// Adds an inbox notification and schedules the removal of the toast it
    /// raised.
    pub async fn notify(&self, new: NewNotification) -> Result<Notification> {
        let (notification, toast) = {
            let mut store = self.0.lock().await;
            let notification = store.add_notification(new)?;
            // The toast raised by the add is the newest entry.
            let toast = store.toasts().last().cloned();
            (notification, toast)
        };
        if let Some(toast) = toast {
            self.schedule_toast_expiry(toast.id, Duration::from_millis(toast.duration_ms));
        }
        Ok(notification)
    }

    /// Raises a standalone toast and schedules its removal. The inbox is
    /// not touched; use [`notify`](Self::notify) for that.
    pub async fn show_toast(
        &self,
        kind: NotificationType,
        title: &str,
        message: &str,
        duration_ms: u64,
    ) -> Toast {
        let toast = self
            .0
            .lock()
            .await
            .push_toast(kind, title, message, duration_ms);
        self.schedule_toast_expiry(toast.id, Duration::from_millis(toast.duration_ms));
        toast
    }

    /// Spawns the timer task that removes a toast once its display time is
    /// over. Toast timers are short-lived and intentionally not tracked.
    pub fn schedule_toast_expiry(&self, toast_id: Uuid, after: Duration) {
        let handle = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            handle.0.lock().await.remove_toast(&toast_id);
        });
    }
}

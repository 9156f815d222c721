//! Reminder scheduling - Timer tasks that notify ahead of booked events.
//!
//! Two lead times are scheduled per event: 24 hours before (an `event_soon`
//! notification) and 1 hour before (a `reminder`). Timer handles are kept in
//! a per-event registry so rescheduling replaces the previous timers and a
//! cancelled booking silences its event, instead of orphaned timers firing
//! for bookings that no longer exist. A startup sweep covers events that
//! come into range while the process is down.

use crate::{
    core::{
        applications::ApplicationStore,
        catalog::EventCatalog,
        notifications::{NewNotification, SharedNotifications},
    },
    entities::{NotificationType, Toast},
    errors::Result,
};
use chrono::{DateTime, Duration as TimeDelta, Utc};
use std::{
    collections::{HashMap, HashSet},
    time::Duration,
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

// tokio timers cap out around 2.2 years; longer waits are clamped rather
// than panicking on a far-future catalog date.
const MAX_TIMER_DELAY: Duration = Duration::from_millis(68_719_476_000);

/// Schedules and cancels reminder timers for booked events.
#[derive(Debug)]
pub struct ReminderScheduler {
    notifications: SharedNotifications,
    timers: HashMap<String, Vec<JoinHandle<()>>>,
}

impl ReminderScheduler {
    /// Creates a scheduler that records fired reminders through the given
    /// notification handle.
    #[must_use]
    pub fn new(notifications: SharedNotifications) -> Self {
        Self {
            notifications,
            timers: HashMap::new(),
        }
    }

    /// Schedules the reminder timers for one event.
    ///
    /// Only lead times still in the future get a timer; an event starting in
    /// two hours gets the 1-hour reminder but not the 24-hour one. Calling
    /// this again for the same event replaces its previous timers.
    pub fn schedule_event_reminder(
        &mut self,
        event_id: &str,
        event_title: &str,
        starts_at: DateTime<Utc>,
    ) {
        self.cancel_event_reminders(event_id);

        let reminders = [
            (
                TimeDelta::hours(24),
                NotificationType::EventSoon,
                "Event Tomorrow!",
                format!("\"{event_title}\" is happening in 24 hours. Get ready!"),
            ),
            (
                TimeDelta::hours(1),
                NotificationType::Reminder,
                "Event Starting Soon!",
                format!("\"{event_title}\" starts in 1 hour. Don't be late!"),
            ),
        ];

        let now = Utc::now();
        let mut handles = Vec::new();
        for (lead, kind, title, message) in reminders {
            let fire_at = starts_at - lead;
            if fire_at <= now {
                continue;
            }
            // Non-negative by the check above.
            let Ok(delay) = (fire_at - now).to_std() else {
                continue;
            };
            let delay = delay.min(MAX_TIMER_DELAY);

            let notifications = self.notifications.clone();
            let notification = NewNotification {
                kind,
                title: title.to_string(),
                message,
                event_id: Some(event_id.to_string()),
            };
            handles.push(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if let Err(error) = notifications.notify(notification).await {
                    warn!("Failed to record a fired reminder: {}", error);
                }
            }));
        }

        if handles.is_empty() {
            return;
        }
        debug!(
            "Scheduled {} reminder timer(s) for event {}",
            handles.len(),
            event_id
        );
        self.timers.insert(event_id.to_string(), handles);
    }

    /// Aborts any pending reminder timers for an event. Returns false if the
    /// event had none.
    pub fn cancel_event_reminders(&mut self, event_id: &str) -> bool {
        let Some(handles) = self.timers.remove(event_id) else {
            return false;
        };
        for handle in &handles {
            handle.abort();
        }
        debug!("Cancelled reminder timers for event {}", event_id);
        true
    }

    /// Number of scheduled timers that have not fired or been aborted yet.
    #[must_use]
    pub fn pending_timer_count(&self) -> usize {
        self.timers
            .values()
            .flatten()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Sweeps the paid bookings for events starting within the next 24
    /// hours and inserts one `event_soon` notification per such event.
    ///
    /// The sweep deduplicates against notifications already in the inbox,
    /// so running it repeatedly, or after a timer already fired for the
    /// event, inserts nothing new. Returns how many notifications were
    /// inserted.
    pub async fn check_upcoming_events(
        &self,
        catalog: &EventCatalog,
        applications: &ApplicationStore,
    ) -> Result<usize> {
        let now = Utc::now();
        let horizon = now + TimeDelta::hours(24);
        let mut inserted = 0;

        let mut store = self.notifications.lock().await;
        let mut seen: HashSet<&str> = HashSet::new();
        for application in applications.paid_applications() {
            let Some(event) = catalog.event_by_id(&application.event_id) else {
                continue;
            };
            if event.date <= now || event.date > horizon {
                continue;
            }
            // One notification per event, however many bookings it has.
            if !seen.insert(event.id.as_str()) {
                continue;
            }
            if store.has_event_notification(&event.id, NotificationType::EventSoon) {
                continue;
            }
            store.add_notification(NewNotification {
                kind: NotificationType::EventSoon,
                title: "Event Coming Up!".to_string(),
                message: format!("\"{}\" is happening within 24 hours!", event.title),
                event_id: Some(event.id.clone()),
            })?;
            inserted += 1;
        }

        // Hand the toasts raised inside the lock over to their expiry
        // timers.
        let fresh: Vec<Toast> = store.toasts().iter().rev().take(inserted).cloned().collect();
        drop(store);
        for toast in fresh {
            self.notifications
                .schedule_toast_expiry(toast.id, Duration::from_millis(toast.duration_ms));
        }

        if inserted > 0 {
            info!("Upcoming-event sweep added {} notification(s)", inserted);
        }
        Ok(inserted)
    }

    /// Aborts every pending timer. Part of the explicit app teardown.
    pub fn shutdown(&mut self) {
        let mut cancelled = 0;
        for (_, handles) in self.timers.drain() {
            for handle in handles {
                if !handle.is_finished() {
                    cancelled += 1;
                }
                handle.abort();
            }
        }
        if cancelled > 0 {
            info!("Cancelled {} pending reminder timer(s)", cancelled);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::notifications::NotificationStore,
        test_utils::{create_test_booking, create_test_event, setup_test_storage},
    };

    fn test_scheduler() -> Result<(ReminderScheduler, SharedNotifications, tempfile::TempDir)> {
        let (storage, dir) = setup_test_storage()?;
        let shared = SharedNotifications::new(NotificationStore::open(storage));
        Ok((ReminderScheduler::new(shared.clone()), shared, dir))
    }

    #[tokio::test]
    async fn test_only_future_lead_times_get_timers() -> Result<()> {
        let (mut scheduler, _shared, _dir) = test_scheduler()?;
        let now = Utc::now();

        // Both lead times ahead.
        scheduler.schedule_event_reminder("evt-far", "Far", now + TimeDelta::hours(30));
        assert_eq!(scheduler.pending_timer_count(), 2);

        // The 24-hour instant is already past, the 1-hour one is not.
        scheduler.schedule_event_reminder("evt-near", "Near", now + TimeDelta::hours(2));
        assert_eq!(scheduler.pending_timer_count(), 3);

        // Both instants past: no timers at all.
        scheduler.schedule_event_reminder("evt-started", "Started", now + TimeDelta::minutes(30));
        assert_eq!(scheduler.pending_timer_count(), 3);

        scheduler.shutdown();
        assert_eq!(scheduler.pending_timer_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_rescheduling_replaces_previous_timers() -> Result<()> {
        let (mut scheduler, _shared, _dir) = test_scheduler()?;
        let now = Utc::now();

        scheduler.schedule_event_reminder("evt-1", "One", now + TimeDelta::hours(30));
        scheduler.schedule_event_reminder("evt-1", "One", now + TimeDelta::hours(40));
        assert_eq!(scheduler.pending_timer_count(), 2);

        scheduler.shutdown();
        Ok(())
    }

    #[tokio::test]
    async fn test_timer_fires_and_records_notification() -> Result<()> {
        let (mut scheduler, shared, _dir) = test_scheduler()?;

        // Start the event just past the 24-hour lead so that timer fires
        // almost immediately.
        let starts_at = Utc::now() + TimeDelta::hours(24) + TimeDelta::milliseconds(50);
        scheduler.schedule_event_reminder("evt-1", "Lantern Night", starts_at);

        tokio::time::sleep(Duration::from_millis(300)).await;

        let store = shared.lock().await;
        assert_eq!(store.all().len(), 1);
        let fired = &store.all()[0];
        assert_eq!(fired.kind, NotificationType::EventSoon);
        assert_eq!(fired.title, "Event Tomorrow!");
        assert_eq!(
            fired.message,
            "\"Lantern Night\" is happening in 24 hours. Get ready!"
        );
        assert_eq!(fired.event_id.as_deref(), Some("evt-1"));
        drop(store);

        // The 1-hour timer is still pending.
        assert_eq!(scheduler.pending_timer_count(), 1);
        scheduler.shutdown();
        Ok(())
    }

    #[tokio::test]
    async fn test_one_hour_reminder_fires_alone_for_near_events() -> Result<()> {
        let (mut scheduler, shared, _dir) = test_scheduler()?;

        // Inside the 24-hour window already, so only the 1-hour timer is
        // set, and it fires almost immediately.
        let starts_at = Utc::now() + TimeDelta::hours(1) + TimeDelta::milliseconds(50);
        scheduler.schedule_event_reminder("evt-1", "Lantern Night", starts_at);
        assert_eq!(scheduler.pending_timer_count(), 1);

        tokio::time::sleep(Duration::from_millis(300)).await;

        let store = shared.lock().await;
        assert_eq!(store.all().len(), 1);
        let fired = &store.all()[0];
        assert_eq!(fired.kind, NotificationType::Reminder);
        assert_eq!(fired.title, "Event Starting Soon!");
        assert_eq!(
            fired.message,
            "\"Lantern Night\" starts in 1 hour. Don't be late!"
        );
        drop(store);

        scheduler.shutdown();
        Ok(())
    }

    #[tokio::test]
    async fn test_cancelled_timers_do_not_fire() -> Result<()> {
        let (mut scheduler, shared, _dir) = test_scheduler()?;

        let starts_at = Utc::now() + TimeDelta::hours(24) + TimeDelta::milliseconds(50);
        scheduler.schedule_event_reminder("evt-1", "Lantern Night", starts_at);
        assert!(scheduler.cancel_event_reminders("evt-1"));
        assert!(!scheduler.cancel_event_reminders("evt-1"));

        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(shared.lock().await.all().is_empty());
        assert_eq!(scheduler.pending_timer_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_check_upcoming_events_inserts_once_per_event() -> Result<()> {
        let (scheduler, shared, _dir) = test_scheduler()?;
        let (storage, _apps_dir) = setup_test_storage()?;
        let mut applications = ApplicationStore::open(storage);

        let now = Utc::now();
        let soon = create_test_event("evt-soon", now + TimeDelta::hours(5), 50);
        let far = create_test_event("evt-far", now + TimeDelta::hours(30), 50);
        let catalog = EventCatalog::new(vec![soon.clone(), far]);

        // Two paid bookings for the soon event, one pending, one paid for
        // the far event.
        let a = applications.create_application("evt-soon", create_test_booking("Ana", 1))?;
        let b = applications.create_application("evt-soon", create_test_booking("Ben", 2))?;
        applications.create_application("evt-soon", create_test_booking("Cleo", 1))?;
        let far_app = applications.create_application("evt-far", create_test_booking("Dee", 1))?;
        applications.complete_payment(&a.id)?;
        applications.complete_payment(&b.id)?;
        applications.complete_payment(&far_app.id)?;

        let inserted = scheduler
            .check_upcoming_events(&catalog, &applications)
            .await?;
        assert_eq!(inserted, 1);

        {
            let store = shared.lock().await;
            assert_eq!(store.all().len(), 1);
            assert_eq!(store.all()[0].kind, NotificationType::EventSoon);
            assert_eq!(store.all()[0].title, "Event Coming Up!");
            assert_eq!(
                store.all()[0].message,
                format!("\"{}\" is happening within 24 hours!", soon.title)
            );
        }

        // A second sweep finds the existing notification and adds nothing.
        let inserted = scheduler
            .check_upcoming_events(&catalog, &applications)
            .await?;
        assert_eq!(inserted, 0);
        assert_eq!(shared.lock().await.all().len(), 1);

        Ok(())
    }
}

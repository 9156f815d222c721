//! Application wiring - Builds every component once and orchestrates the
//! booking flow across them.
//!
//! [`App::init`] is the only place components are constructed; everything
//! else borrows them from the `App` value, so there is no global state and
//! a test can stand up a fully wired instance against a throwaway data
//! directory. The orchestration methods implement the end-to-end flows:
//! book, check out, cancel, share.

use crate::{
    config::{catalog::load_catalog, settings::Settings},
    core::{
        applications::{ApplicationStore, BookingDetails},
        artifact::{self, ShareOutcome, ShareSurface},
        catalog::EventCatalog,
        notifications::{NewNotification, NotificationStore, SharedNotifications},
        payment::{CardDetails, PaymentSimulator},
        scheduler::ReminderScheduler,
    },
    entities::{Application, NotificationType},
    errors::{Error, Result},
    storage::JsonStore,
};
use tracing::{info, warn};
use uuid::Uuid;

/// The wired-up ticketing demo: catalog, stores, scheduler, and payment
/// simulator behind one value.
pub struct App {
    /// Static event catalog loaded from the catalog file.
    pub catalog: EventCatalog,
    /// Applications and their tickets.
    pub applications: ApplicationStore,
    /// Shared notification inbox and toasts.
    pub notifications: SharedNotifications,
    /// Reminder timers for booked events.
    pub scheduler: ReminderScheduler,
    /// The mock payment processor.
    pub payments: PaymentSimulator,
    settings: Settings,
}

impl App {
    /// Builds the app from settings: opens storage, loads the catalog, and
    /// wires the stores, scheduler, and simulator together.
    ///
    /// Finishes with the upcoming-event sweep so bookings whose events came
    /// within 24 hours while the process was down still get their
    /// `event_soon` notification.
    pub async fn init(settings: Settings) -> Result<Self> {
        let storage = JsonStore::open(&settings.data_dir)?;
        let catalog = EventCatalog::new(load_catalog(&settings.catalog_path)?.events);
        let applications = ApplicationStore::open(storage.clone());
        let notifications = SharedNotifications::new(NotificationStore::open(storage));
        let scheduler = ReminderScheduler::new(notifications.clone());

        info!(
            "Initialized with {} catalog event(s) and {} stored application(s)",
            catalog.events().len(),
            applications.applications().len()
        );

        let app = Self {
            catalog,
            applications,
            notifications,
            scheduler,
            payments: PaymentSimulator::new(),
            settings,
        };
        app.scheduler
            .check_upcoming_events(&app.catalog, &app.applications)
            .await?;
        Ok(app)
    }

    /// Books an event for an applicant.
    ///
    /// Paid events leave the application pending until [`checkout`]
    /// succeeds. Free events skip the simulator and are confirmed on the
    /// spot, so their tickets and reminders exist by the time this returns.
    /// Either way an inbox notification records the booking.
    ///
    /// [`checkout`]: Self::checkout
    pub async fn book(&mut self, event_id: &str, details: BookingDetails) -> Result<Application> {
        let Some(event) = self.catalog.event_by_id(event_id) else {
            return Err(Error::UnknownEvent {
                event_id: event_id.to_string(),
            });
        };
        let (event_title, event_date, free) = (event.title.clone(), event.date, event.is_free());

        let application = self.applications.create_application(event_id, details)?;
        info!(
            "Application {} created for event {} ({} seat(s))",
            application.id, event_id, application.quantity
        );

        if free {
            self.applications.complete_payment(&application.id)?;
            self.notifications
                .notify(NewNotification {
                    kind: NotificationType::Info,
                    title: "Application Confirmed!".to_string(),
                    message: format!(
                        "You're all set for \"{event_title}\". Check your email for details."
                    ),
                    event_id: Some(event_id.to_string()),
                })
                .await?;
            self.scheduler
                .schedule_event_reminder(event_id, &event_title, event_date);
        } else {
            self.notifications
                .notify(NewNotification {
                    kind: NotificationType::Info,
                    title: "Application Created".to_string(),
                    message: format!(
                        "Please complete payment to secure your spot at \"{event_title}\"."
                    ),
                    event_id: Some(event_id.to_string()),
                })
                .await?;
        }

        // Re-read so the returned value reflects an immediate confirmation.
        Ok(self
            .applications
            .application_by_id(&application.id)
            .cloned()
            .unwrap_or(application))
    }

    /// Charges an application's total through the payment simulator.
    ///
    /// On approval the application flips to paid, tickets are generated, a
    /// `payment_success` notification lands in the inbox, and the event's
    /// reminder timers are scheduled. On decline or card validation failure
    /// the application stays pending and the reason is available from
    /// [`PaymentSimulator::last_error`]; retrying is simply calling again.
    /// An unknown application id returns Ok(false) without starting an
    /// attempt.
    pub async fn checkout(&mut self, application_id: &Uuid, card: &CardDetails) -> Result<bool> {
        let Some(application) = self.applications.application_by_id(application_id) else {
            warn!("Checkout requested for unknown application {}", application_id);
            return Ok(false);
        };
        let Some(event) = self.catalog.event_by_id(&application.event_id) else {
            warn!(
                "Application {} references unknown event {}",
                application_id, application.event_id
            );
            return Ok(false);
        };
        // Quantity has no upper bound, so the product can exceed u32.
        let amount = u64::from(event.price) * u64::from(application.quantity);
        let event_id = event.id.clone();
        let event_title = event.title.clone();
        let event_date = event.date;

        if !self.payments.process_payment(amount, card).await {
            return Ok(false);
        }

        self.applications.complete_payment(application_id)?;
        self.notifications
            .notify(NewNotification {
                kind: NotificationType::PaymentSuccess,
                title: "Payment Successful!".to_string(),
                message: format!("Your tickets for \"{event_title}\" have been confirmed."),
                event_id: Some(event_id.clone()),
            })
            .await?;
        self.scheduler
            .schedule_event_reminder(&event_id, &event_title, event_date);
        Ok(true)
    }

    /// Deletes an application.
    ///
    /// When the deleted booking was the last paid one for its event, the
    /// event's pending reminder timers are cancelled with it; nobody is
    /// going anymore. Returns Ok(false) for unknown ids.
    pub fn cancel_application(&mut self, application_id: &Uuid) -> Result<bool> {
        let Some(event_id) = self
            .applications
            .application_by_id(application_id)
            .map(|a| a.event_id.clone())
        else {
            return Ok(false);
        };

        if !self.applications.delete_application(application_id)? {
            return Ok(false);
        }
        info!("Application {} cancelled", application_id);

        if self.applications.total_booked_seats(&event_id) == 0 {
            self.scheduler.cancel_event_reminders(&event_id);
        }
        Ok(true)
    }

    /// The shareable deep link for a ticket on this deployment's origin.
    #[must_use]
    pub fn ticket_link(&self, ticket_id: &str) -> String {
        artifact::ticket_link(&self.settings.share_origin, ticket_id)
    }

    /// Shares a ticket through the given surface, native share first with a
    /// clipboard fallback. A clipboard copy raises a short confirmation
    /// toast. Unknown ticket ids report [`ShareOutcome::Failed`].
    pub async fn share_ticket(
        &self,
        surface: &mut dyn ShareSurface,
        ticket_id: &str,
    ) -> ShareOutcome {
        let Some(lookup) = self.applications.ticket_by_id(ticket_id) else {
            return ShareOutcome::Failed;
        };
        let Some(event) = self.catalog.event_by_id(&lookup.application.event_id) else {
            return ShareOutcome::Failed;
        };
        let outcome =
            artifact::share_ticket(surface, &lookup.ticket, event, &self.settings.share_origin);
        if outcome == ShareOutcome::Copied {
            self.notifications
                .show_toast(
                    NotificationType::Info,
                    "Link Copied!",
                    "Ticket link has been copied to clipboard.",
                    4000,
                )
                .await;
        }
        outcome
    }

    /// Tears down the background timers. Storage needs no teardown: every
    /// mutation already wrote its snapshot.
    pub fn shutdown(&mut self) {
        self.scheduler.shutdown();
        info!("Shutdown complete");
    }
}

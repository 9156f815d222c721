//! Application lifecycle business logic - Handles booking, payment
//! completion, and ticket management.
//!
//! An application starts `pending` with no tickets. Completing payment moves
//! it to `paid` and generates one ticket per requested seat. Every mutation
//! is followed by a whole-collection snapshot save, so the on-disk state
//! always reflects the last completed operation. A missing application or
//! ticket is an expected outcome and is reported through the return value
//! (`false` or `None`), never as an error.

use crate::{
    core::artifact,
    entities::{Application, ApplicationStatus, Ticket},
    errors::{Error, Result},
    storage::{APPLICATIONS_KEY, JsonStore},
};
use chrono::Utc;
use uuid::Uuid;

/// Applicant details captured by the booking form.
#[derive(Clone, Debug)]
pub struct BookingDetails {
    /// Name of the applicant; also the holder name of the first ticket.
    pub user_name: String,
    /// Contact email address.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Number of seats requested, at least 1.
    pub quantity: u32,
}

/// A ticket found by id together with an owned copy of its application.
#[derive(Clone, Debug)]
pub struct TicketLookup {
    /// The matching ticket.
    pub ticket: Ticket,
    /// The application the ticket belongs to.
    pub application: Application,
}

/// Persistent store of applications and their nested tickets.
#[derive(Debug)]
pub struct ApplicationStore {
    storage: JsonStore,
    applications: Vec<Application>,
}

impl ApplicationStore {
    /// Opens the store, loading any previously persisted applications.
    ///
    /// A missing or unreadable snapshot yields an empty store; see
    /// [`JsonStore::load`] for the recovery behavior.
    #[must_use]
    pub fn open(storage: JsonStore) -> Self {
        let applications = storage.load(APPLICATIONS_KEY);
        Self {
            storage,
            applications,
        }
    }

    /// Creates a new pending application for an event.
    ///
    /// The store does not check seat availability; capacity is a display
    /// concern handled by the catalog views. Quantity must be at least 1.
    pub fn create_application(
        &mut self,
        event_id: &str,
        details: BookingDetails,
    ) -> Result<Application> {
        if details.quantity < 1 {
            return Err(Error::InvalidQuantity {
                quantity: details.quantity,
            });
        }

        let application = Application {
            id: Uuid::new_v4(),
            event_id: event_id.to_string(),
            user_name: details.user_name,
            email: details.email,
            phone: details.phone,
            quantity: details.quantity,
            status: ApplicationStatus::Pending,
            tickets: Vec::new(),
            applied_at: Utc::now(),
            paid_at: None,
        };
        self.applications.push(application.clone());
        self.persist()?;
        Ok(application)
    }

    /// Marks an application as paid and generates its tickets.
    ///
    /// Returns Ok(false) if the application id is unknown. Calling this on an
    /// already-paid application regenerates its tickets with fresh ids; the
    /// ticket count stays equal to the requested quantity either way.
    pub fn complete_payment(&mut self, application_id: &Uuid) -> Result<bool> {
        let Some(application) = self
            .applications
            .iter_mut()
            .find(|a| a.id == *application_id)
        else {
            return Ok(false);
        };

        application.status = ApplicationStatus::Paid;
        application.paid_at = Some(Utc::now());
        // Ticket generation persists the collection, covering the status
        // change as well.
        self.generate_tickets(application_id)?;
        Ok(true)
    }

    /// Generates one ticket per requested seat and replaces the
    /// application's ticket batch.
    ///
    /// The first ticket is held by the applicant; further tickets get the
    /// `"{name} (Guest {n})"` holder pattern. Returns an empty vec if the
    /// application id is unknown.
    pub fn generate_tickets(&mut self, application_id: &Uuid) -> Result<Vec<Ticket>> {
        let Some(application) = self
            .applications
            .iter_mut()
            .find(|a| a.id == *application_id)
        else {
            return Ok(Vec::new());
        };

        let mut tickets = Vec::with_capacity(application.quantity as usize);
        for i in 0..application.quantity {
            let ticket_id = new_ticket_id();
            let qr_code = artifact::qr_code_url(&ticket_id);
            tickets.push(Ticket {
                id: ticket_id,
                application_id: *application_id,
                holder_name: if i == 0 {
                    application.user_name.clone()
                } else {
                    format!("{} (Guest {i})", application.user_name)
                },
                qr_code,
                is_used: false,
            });
        }

        application.tickets = tickets.clone();
        self.persist()?;
        Ok(tickets)
    }

    /// Renames the holder of a single ticket.
    ///
    /// Returns Ok(false) if no ticket with that id exists anywhere in the
    /// store.
    pub fn update_ticket_holder_name(&mut self, ticket_id: &str, new_name: &str) -> Result<bool> {
        let Some(ticket) = self.ticket_mut(ticket_id) else {
            return Ok(false);
        };
        ticket.holder_name = new_name.to_string();
        self.persist()?;
        Ok(true)
    }

    /// Marks a ticket as used (entrance scan).
    ///
    /// The flag is monotonic; marking an already-used ticket again is a
    /// no-op that still reports success. Returns Ok(false) for unknown ids.
    pub fn mark_ticket_as_used(&mut self, ticket_id: &str) -> Result<bool> {
        let Some(ticket) = self.ticket_mut(ticket_id) else {
            return Ok(false);
        };
        ticket.is_used = true;
        self.persist()?;
        Ok(true)
    }

    /// Deletes an application and its tickets.
    ///
    /// Returns Ok(false) if the id is unknown, in which case nothing is
    /// written.
    pub fn delete_application(&mut self, application_id: &Uuid) -> Result<bool> {
        let before = self.applications.len();
        self.applications.retain(|a| a.id != *application_id);
        if self.applications.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Removes every application from the store.
    pub fn clear_all(&mut self) -> Result<()> {
        self.applications.clear();
        self.persist()
    }

    /// Returns all applications in creation order.
    #[must_use]
    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    /// Finds an application by id.
    #[must_use]
    pub fn application_by_id(&self, application_id: &Uuid) -> Option<&Application> {
        self.applications.iter().find(|a| a.id == *application_id)
    }

    /// Returns the applications made against one event, any status.
    #[must_use]
    pub fn applications_by_event(&self, event_id: &str) -> Vec<&Application> {
        self.applications
            .iter()
            .filter(|a| a.event_id == event_id)
            .collect()
    }

    /// Sums the seats held by paid applications for one event.
    ///
    /// Pending applications do not count; they hold no seats until payment
    /// completes.
    #[must_use]
    pub fn total_booked_seats(&self, event_id: &str) -> u32 {
        self.applications
            .iter()
            .filter(|a| a.event_id == event_id && a.is_paid())
            .map(|a| a.quantity)
            .sum()
    }

    /// Returns the paid applications in creation order.
    #[must_use]
    pub fn paid_applications(&self) -> Vec<&Application> {
        self.applications.iter().filter(|a| a.is_paid()).collect()
    }

    /// Returns the applications still awaiting payment in creation order.
    #[must_use]
    pub fn pending_applications(&self) -> Vec<&Application> {
        self.applications.iter().filter(|a| !a.is_paid()).collect()
    }

    /// Finds a ticket by id across all applications, returning it together
    /// with its owning application.
    #[must_use]
    pub fn ticket_by_id(&self, ticket_id: &str) -> Option<TicketLookup> {
        self.applications.iter().find_map(|application| {
            application
                .tickets
                .iter()
                .find(|t| t.id == ticket_id)
                .map(|ticket| TicketLookup {
                    ticket: ticket.clone(),
                    application: application.clone(),
                })
        })
    }

    // Linear scan across every application's tickets. The dataset is one
    // user's bookings, so an index would not pay for itself.
    fn ticket_mut(&mut self, ticket_id: &str) -> Option<&mut Ticket> {
        self.applications
            .iter_mut()
            .flat_map(|a| a.tickets.iter_mut())
            .find(|t| t.id == ticket_id)
    }

    fn persist(&self) -> Result<()> {
        self.storage.save(APPLICATIONS_KEY, &self.applications)
    }
}

/// Alphabet for the human-facing part of a ticket id.
const TICKET_ID_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generates a ticket id in the `TKT-` + 8 uppercase base-36 wire format.
///
/// The base-36 payload is drawn from a v4 UUID's bits rather than a bare
/// RNG, so ticket identity has the same collision characteristics as the
/// other ids in the system while keeping the short scannable format.
fn new_ticket_id() -> String {
    let mut bits = Uuid::new_v4().as_u128();
    let mut id = String::with_capacity(12);
    id.push_str("TKT-");
    for _ in 0..8 {
        id.push(char::from(TICKET_ID_ALPHABET[(bits % 36) as usize]));
        bits /= 36;
    }
    id
}

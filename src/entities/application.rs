//! Application entity - a user's booking request against a catalog event.
//!
//! An application starts out pending with no tickets; completing payment
//! transitions it to paid and fills in exactly `quantity` tickets. The
//! invariant throughout: `tickets.len() == quantity` iff the application is
//! paid, otherwise `tickets` is empty.

use super::ticket::Ticket;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of an application
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    /// Created but not yet paid for; no tickets exist
    Pending,
    /// Payment completed; tickets have been generated
    Paid,
}

/// Booking application model, the unit owned by the application store
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Unique identifier for the application
    pub id: Uuid,
    /// Reference to the catalog event being booked (not ownership)
    pub event_id: String,
    /// Name of the applicant; also the holder name of the first ticket
    pub user_name: String,
    /// Contact email address
    pub email: String,
    /// Contact phone number
    pub phone: String,
    /// Number of tickets requested; at least 1
    pub quantity: u32,
    /// Current lifecycle status
    pub status: ApplicationStatus,
    /// Generated tickets; empty until the application is paid
    pub tickets: Vec<Ticket>,
    /// When the application was created
    pub applied_at: DateTime<Utc>,
    /// When payment completed; present iff status is paid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Application {
    /// Whether payment has completed for this application.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.status == ApplicationStatus::Paid
    }
}

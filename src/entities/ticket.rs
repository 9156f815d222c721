//! Ticket entity - an individual admission credential.
//!
//! Tickets are created in a single batch when their owning application
//! transitions to paid; the batch size always equals the application's
//! quantity. Afterwards only two attributes may change: the holder name can
//! be edited and the used flag can flip from false to true (never back).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Admission ticket model, nested inside its owning application
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket identifier in the wire format `TKT-` + 8 uppercase base-36
    /// characters
    pub id: String,
    /// Back-reference to the owning application (not ownership)
    pub application_id: Uuid,
    /// Name of the person admitted with this ticket
    pub holder_name: String,
    /// QR payload: a URL to an external QR-rendering endpoint parameterized
    /// by the ticket id
    pub qr_code: String,
    /// Whether the ticket has been scanned at the entrance; monotonic
    pub is_used: bool,
}

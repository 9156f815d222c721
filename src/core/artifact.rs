//! Ticket artifacts - Printable ticket documents, QR payloads, and the
//! share surface.
//!
//! A [`TicketDocument`] is the single-page ticket layout as plain data;
//! turning it into real bytes is behind the [`TicketRenderer`] seam so the
//! core never links a PDF library. Sharing works the same way: the
//! [`ShareSurface`] trait abstracts whatever native share or clipboard the
//! host offers, and [`share_ticket`] picks between them.

use crate::{
    entities::{Event, Ticket},
    errors::Result,
};
use chrono::{DateTime, Utc};

/// External QR rendering endpoint. The ticket id is appended as the QR
/// payload; ticket ids are URL-safe by construction.
const QR_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/?size=200x200&data=";

/// Builds the QR image URL for a ticket id.
#[must_use]
pub fn qr_code_url(ticket_id: &str) -> String {
    format!("{QR_ENDPOINT}{ticket_id}")
}

/// Builds the shareable deep link for a ticket.
#[must_use]
pub fn ticket_link(origin: &str, ticket_id: &str) -> String {
    format!("{}/ticket/{ticket_id}", origin.trim_end_matches('/'))
}

/// Formats an event instant as a long date, e.g. "Saturday, March 14, 2026".
#[must_use]
pub fn format_event_date(instant: DateTime<Utc>) -> String {
    instant.format("%A, %B %-d, %Y").to_string()
}

/// Formats an event instant as a short clock time, e.g. "6:30 PM".
#[must_use]
pub fn format_event_time(instant: DateTime<Utc>) -> String {
    instant.format("%-I:%M %p").to_string()
}

/// The single-page ticket layout as data, ready for a renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TicketDocument {
    /// Page heading, always "EVENT TICKET".
    pub heading: String,
    /// Event title line under the heading.
    pub event_title: String,
    /// Labeled detail lines in display order.
    pub lines: Vec<(&'static str, String)>,
    /// Caption under the blank scan region.
    pub scan_caption: String,
    /// Page footer.
    pub footer: String,
    ticket_id: String,
}

impl TicketDocument {
    /// Composes the document for one ticket of one event.
    #[must_use]
    pub fn compose(ticket: &Ticket, event: &Event) -> Self {
        Self {
            heading: "EVENT TICKET".to_string(),
            event_title: event.title.clone(),
            lines: vec![
                ("Ticket ID", ticket.id.clone()),
                ("Holder", ticket.holder_name.clone()),
                ("Date", format_event_date(event.date)),
                ("Time", format_event_time(event.date)),
                ("Location", event.location.clone()),
                ("Organizer", event.organizer.clone()),
                ("Category", event.category.clone()),
            ],
            scan_caption: "Scan at entrance".to_string(),
            footer: "Powered by Tiketa".to_string(),
            ticket_id: ticket.id.clone(),
        }
    }

    /// Download file name for the rendered artifact.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("ticket-{}.pdf", self.ticket_id)
    }
}

/// Renders a composed ticket document into its final bytes.
///
/// The core ships no implementation; hosts plug in a PDF backend (or
/// anything else) behind this seam.
pub trait TicketRenderer {
    /// Produces the artifact bytes for one document.
    fn render(&self, document: &TicketDocument) -> Result<Vec<u8>>;
}

/// What a share attempt is asking the host surface to present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareRequest {
    /// Share sheet title.
    pub title: String,
    /// Accompanying text.
    pub text: String,
    /// The ticket deep link.
    pub url: String,
}

/// How a share attempt ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The native share surface presented and completed the share.
    Shared,
    /// No native surface; the link went to the clipboard instead.
    Copied,
    /// The share was cancelled or the surface failed.
    Failed,
}

/// Host capabilities for sharing a ticket link.
pub trait ShareSurface {
    /// Whether a native share action exists on this host.
    fn supports_share(&self) -> bool;
    /// Presents the native share action. Returning false means the user
    /// cancelled or the surface failed.
    fn share(&mut self, request: &ShareRequest) -> bool;
    /// Copies text to the host clipboard.
    fn copy_to_clipboard(&mut self, text: &str) -> bool;
}

/// Shares a ticket link through the best surface available.
///
/// Prefers the native share action when the host supports one; a cancelled
/// native share is a final outcome, not a reason to fall back. Hosts
/// without native share get the link copied to the clipboard.
pub fn share_ticket(
    surface: &mut dyn ShareSurface,
    ticket: &Ticket,
    event: &Event,
    origin: &str,
) -> ShareOutcome {
    let url = ticket_link(origin, &ticket.id);
    if surface.supports_share() {
        let request = ShareRequest {
            title: format!("Ticket for {}", event.title),
            text: format!(
                "Here's your ticket for {} on {}",
                event.title,
                format_event_date(event.date)
            ),
            url,
        };
        if surface.share(&request) {
            ShareOutcome::Shared
        } else {
            ShareOutcome::Failed
        }
    } else if surface.copy_to_clipboard(&url) {
        ShareOutcome::Copied
    } else {
        ShareOutcome::Failed
    }
}

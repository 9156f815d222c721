//! Event entity - a static, immutable catalog entry describing a bookable
//! occasion. Events are loaded once at startup from the catalog file and are
//! never mutated; applications reference them by id without owning them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog event model
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Catalog identifier, unique within the loaded catalog
    pub id: String,
    /// Human-readable event title
    pub title: String,
    /// Longer marketing description
    pub description: String,
    /// Cover image URL (display-only, carried for completeness)
    pub image: String,
    /// Venue, free-form (e.g. "Landmark Centre, Victoria Island")
    pub location: String,
    /// Start instant of the event
    pub date: DateTime<Utc>,
    /// Price per ticket in integer currency units; 0 means the event is free
    pub price: u32,
    /// Seat capacity; advisory only, never enforced at booking time
    pub seats: u32,
    /// Category used for filtering (e.g. "Music", "Technology")
    pub category: String,
    /// Organizing body shown on tickets
    pub organizer: String,
}

impl Event {
    /// Whether this event costs nothing to attend.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.price == 0
    }
}

//! Event catalog business logic - Read-only queries over the configured events.
//!
//! The catalog is immutable for the lifetime of the process: events come from
//! the catalog config at startup and every view here is a pure function of
//! that list plus a caller-supplied clock instant. Taking `now` as an
//! argument keeps all date-sensitive views deterministic under test.

use crate::{core::applications::ApplicationStore, entities::Event};
use chrono::{DateTime, Utc};

/// Wildcard category accepted by [`EventFilters`] and returned first from
/// [`EventCatalog::categories`].
pub const ALL_CATEGORIES: &str = "All";

/// Price constraint for catalog filtering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PriceFilter {
    /// No price constraint.
    #[default]
    All,
    /// Only events with a zero price.
    Free,
    /// Only events with a non-zero price.
    Paid,
}

/// Date constraint for catalog filtering, evaluated against the supplied `now`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateFilter {
    /// No date constraint.
    #[default]
    All,
    /// Events strictly after `now`.
    Upcoming,
    /// Events at or before `now`.
    Past,
}

/// Conjunctive filter set for [`EventCatalog::filter`].
///
/// The default value matches every event, so callers only set the
/// constraints they care about.
#[derive(Clone, Debug)]
pub struct EventFilters {
    /// Case-insensitive substring matched against each of title,
    /// description, location, and category. An empty query matches
    /// everything.
    pub query: String,
    /// Price constraint.
    pub price: PriceFilter,
    /// Date constraint.
    pub date: DateFilter,
    /// Exact category to match, or [`ALL_CATEGORIES`] for no constraint.
    pub category: String,
}

impl Default for EventFilters {
    fn default() -> Self {
        Self {
            query: String::new(),
            price: PriceFilter::All,
            date: DateFilter::All,
            category: ALL_CATEGORIES.to_string(),
        }
    }
}

/// In-memory catalog of bookable events.
#[derive(Clone, Debug)]
pub struct EventCatalog {
    events: Vec<Event>,
}

impl EventCatalog {
    /// Creates a catalog from the configured event list, preserving config
    /// order.
    #[must_use]
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Returns every configured event in catalog order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Finds an event by its id, returning None for unknown ids.
    #[must_use]
    pub fn event_by_id(&self, event_id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.id == event_id)
    }

    /// Returns events strictly after `now`, soonest first.
    #[must_use]
    pub fn upcoming(&self, now: DateTime<Utc>) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.events.iter().filter(|e| e.date > now).collect();
        events.sort_by_key(|e| e.date);
        events
    }

    /// Returns events at or before `now`, most recent first.
    #[must_use]
    pub fn past(&self, now: DateTime<Utc>) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.events.iter().filter(|e| e.date <= now).collect();
        events.sort_by_key(|e| std::cmp::Reverse(e.date));
        events
    }

    /// Returns the zero-price events in catalog order.
    #[must_use]
    pub fn free(&self) -> Vec<&Event> {
        self.events.iter().filter(|e| e.is_free()).collect()
    }

    /// Returns the events with a non-zero price in catalog order.
    #[must_use]
    pub fn paid(&self) -> Vec<&Event> {
        self.events.iter().filter(|e| !e.is_free()).collect()
    }

    /// Returns the events in the given category in catalog order. The
    /// [`ALL_CATEGORIES`] wildcard returns the whole catalog, matching the
    /// selector list [`categories`](Self::categories) hands out.
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| category == ALL_CATEGORIES || e.category == category)
            .collect()
    }

    /// Returns the distinct categories with the wildcard first, then the
    /// rest in first-seen catalog order.
    ///
    /// This is the list a category selector presents, which is why the
    /// wildcard entry is part of the result rather than a caller concern.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for event in &self.events {
            if !categories.contains(&event.category) {
                categories.push(event.category.clone());
            }
        }
        categories
    }

    /// Applies every constraint in `filters` conjunctively and returns the
    /// matching events sorted ascending by date.
    ///
    /// The text query is matched case-insensitively as a substring of each
    /// of the title, description, location, and category fields in turn;
    /// whitespace in the query is part of the match.
    #[must_use]
    pub fn filter(&self, filters: &EventFilters, now: DateTime<Utc>) -> Vec<&Event> {
        let query = filters.query.to_lowercase();
        let mut matches: Vec<&Event> = self
            .events
            .iter()
            .filter(|event| {
                let matches_query = query.is_empty()
                    || [
                        &event.title,
                        &event.description,
                        &event.location,
                        &event.category,
                    ]
                    .into_iter()
                    .any(|field| field.to_lowercase().contains(&query));
                let matches_price = match filters.price {
                    PriceFilter::All => true,
                    PriceFilter::Free => event.is_free(),
                    PriceFilter::Paid => !event.is_free(),
                };
                let matches_date = match filters.date {
                    DateFilter::All => true,
                    DateFilter::Upcoming => event.date > now,
                    DateFilter::Past => event.date <= now,
                };
                let matches_category =
                    filters.category == ALL_CATEGORIES || event.category == filters.category;
                matches_query && matches_price && matches_date && matches_category
            })
            .collect();
        matches.sort_by_key(|e| e.date);
        matches
    }

    /// Computes the remaining seat count for an event given the current paid
    /// bookings.
    ///
    /// Unknown event ids report zero rather than an error. Capacity is never
    /// enforced at booking time, so the count can reach zero while further
    /// applications still succeed.
    #[must_use]
    pub fn available_seats(&self, event_id: &str, applications: &ApplicationStore) -> u32 {
        self.event_by_id(event_id).map_or(0, |event| {
            event
                .seats
                .saturating_sub(applications.total_booked_seats(event_id))
        })
    }
}

//! Shared test utilities for Tiketa.
//!
//! This module provides common helper functions for setting up throwaway
//! storage and creating test entities with sensible defaults.

use crate::{
    app::App,
    config::settings::Settings,
    core::{
        applications::BookingDetails,
        artifact::{ShareRequest, ShareSurface, qr_code_url},
        notifications::NewNotification,
        payment::CardDetails,
    },
    entities::{Event, NotificationType, Ticket},
    errors::Result,
    storage::JsonStore,
};
use chrono::{DateTime, Datelike, Duration, Utc};
use tempfile::TempDir;
use uuid::Uuid;

/// Creates a `JsonStore` rooted in a fresh temp directory.
/// This is the standard setup for all storage-backed tests; keep the
/// returned guard alive for the duration of the test.
pub fn setup_test_storage() -> Result<(JsonStore, TempDir)> {
    let dir = tempfile::tempdir()?;
    let storage = JsonStore::open(dir.path())?;
    Ok((storage, dir))
}

/// Creates a test event with sensible defaults.
///
/// # Arguments
/// * `id` - Event id
/// * `date` - When the event starts
/// * `price` - Ticket price; 0 makes it a free event
///
/// # Defaults
/// * `seats`: 100
/// * `category`: "General"
/// * `location`: "Test Hall"
#[must_use]
pub fn create_test_event(id: &str, date: DateTime<Utc>, price: u32) -> Event {
    Event {
        id: id.to_string(),
        title: format!("Test Event {id}"),
        description: "A test event".to_string(),
        image: format!("https://picsum.photos/seed/{id}/600/400"),
        location: "Test Hall".to_string(),
        date,
        price,
        seats: 100,
        category: "General".to_string(),
        organizer: "Test Organizing Co.".to_string(),
    }
}

/// Creates booking details with derived contact fields.
#[must_use]
pub fn create_test_booking(user_name: &str, quantity: u32) -> BookingDetails {
    BookingDetails {
        user_name: user_name.to_string(),
        email: format!(
            "{}@example.com",
            user_name.to_lowercase().replace(' ', ".")
        ),
        phone: "+1 555 0100".to_string(),
        quantity,
    }
}

/// Creates card details that pass every validation rule.
///
/// # Defaults
/// * `number`: the classic 4242 test card
/// * `expiry`: 12 months from now, so it never goes stale
/// * `cvv`: "123"
#[must_use]
pub fn create_test_card() -> CardDetails {
    CardDetails {
        number: "4242 4242 4242 4242".to_string(),
        expiry: expiry_months_from_now(12),
        cvv: "123".to_string(),
        holder_name: "Maya Chen".to_string(),
    }
}

/// Builds an `MM/YY` expiry string relative to the current month.
/// Negative offsets produce already-expired dates.
#[must_use]
pub fn expiry_months_from_now(offset: i32) -> String {
    let now = Utc::now();
    let months = now.year() * 12 + i32::try_from(now.month0()).unwrap_or_default() + offset;
    let year = months.div_euclid(12);
    let month = months.rem_euclid(12) + 1;
    format!("{month:02}/{:02}", year % 100)
}

/// Creates a notification payload with the `info` kind.
#[must_use]
pub fn create_test_notification(title: &str, event_id: Option<&str>) -> NewNotification {
    NewNotification {
        kind: NotificationType::Info,
        title: title.to_string(),
        message: format!("{title} message body"),
        event_id: event_id.map(ToString::to_string),
    }
}

/// Creates a standalone ticket attached to a random application id.
#[must_use]
pub fn create_test_ticket(ticket_id: &str, holder_name: &str) -> Ticket {
    Ticket {
        id: ticket_id.to_string(),
        application_id: Uuid::new_v4(),
        holder_name: holder_name.to_string(),
        qr_code: qr_code_url(ticket_id),
        is_used: false,
    }
}

/// Sets up a fully wired [`App`] over a throwaway data directory.
///
/// The generated catalog has two future events: `evt-gala` (paid, 120 per
/// seat, 40 seats, 10 days out) and `evt-meetup` (free, 100 seats, 3 days
/// out). Returns (app, guard) for end-to-end test scenarios.
pub async fn setup_test_app() -> Result<(App, TempDir)> {
    let dir = tempfile::tempdir()?;
    let catalog_path = dir.path().join("catalog.toml");

    let gala_date = (Utc::now() + Duration::days(10)).to_rfc3339();
    let meetup_date = (Utc::now() + Duration::days(3)).to_rfc3339();
    let catalog = format!(
        r#"[[events]]
id = "evt-gala"
title = "Harbor Lights Gala"
description = "An evening of music and fundraising by the water."
image = "https://picsum.photos/seed/gala/600/400"
location = "Harborview Hall"
date = "{gala_date}"
price = 120
seats = 40
category = "Music"
organizer = "Harbor Arts Trust"

[[events]]
id = "evt-meetup"
title = "Open Source Meetup"
description = "Lightning talks and hallway chats, free to attend."
image = "https://picsum.photos/seed/meetup/600/400"
location = "Dockside Commons"
date = "{meetup_date}"
price = 0
seats = 100
category = "Technology"
organizer = "Dockside Devs"
"#
    );
    std::fs::write(&catalog_path, catalog)?;

    let settings = Settings {
        data_dir: dir.path().join("data"),
        catalog_path,
        share_origin: "https://tiketa.test".to_string(),
    };
    let app = App::init(settings).await?;
    Ok((app, dir))
}

/// Share-surface double that records what it was asked to do.
/// Use this to assert which surface a share attempt went through.
pub struct RecordingSurface {
    native: bool,
    accepts: bool,
    /// Requests handed to the native share action.
    pub shared: Vec<ShareRequest>,
    /// Texts copied to the fake clipboard.
    pub copied: Vec<String>,
}

impl RecordingSurface {
    /// Creates a double that does or does not offer native share, and
    /// accepts or cancels whatever it is asked to present.
    #[must_use]
    pub fn new(native: bool, accepts: bool) -> Self {
        Self {
            native,
            accepts,
            shared: Vec::new(),
            copied: Vec::new(),
        }
    }
}

impl ShareSurface for RecordingSurface {
    fn supports_share(&self) -> bool {
        self.native
    }

    fn share(&mut self, request: &ShareRequest) -> bool {
        self.shared.push(request.clone());
        self.accepts
    }

    fn copy_to_clipboard(&mut self, text: &str) -> bool {
        self.copied.push(text.to_string());
        self.accepts
    }
}

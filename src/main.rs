use chrono::{Datelike, Utc};
use dotenvy::dotenv;
use tiketa::{
    app::App,
    config::settings::Settings,
    core::{
        applications::BookingDetails,
        artifact::{ShareRequest, ShareSurface, TicketDocument, format_event_date},
        payment::CardDetails,
    },
    errors::Result,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Share surface for a terminal session: no native share sheet, the
/// clipboard is the log.
struct ConsoleClipboard;

impl ShareSurface for ConsoleClipboard {
    fn supports_share(&self) -> bool {
        false
    }

    fn share(&mut self, _request: &ShareRequest) -> bool {
        false
    }

    fn copy_to_clipboard(&mut self, text: &str) -> bool {
        info!("Copied to clipboard: {}", text);
        true
    }
}

/// A card expiry that is always in the future.
fn demo_expiry() -> String {
    format!("12/{:02}", (Utc::now().year() + 1) % 100)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok();

    // 3. Settings from the environment, catalog and stores from disk
    let settings = Settings::from_env();
    let mut app = App::init(settings).await?;

    // 4. Browse the catalog
    let now = Utc::now();
    let upcoming: Vec<_> = app.catalog.upcoming(now).into_iter().cloned().collect();
    info!("{} upcoming event(s) in the catalog", upcoming.len());
    for event in &upcoming {
        let price = if event.is_free() {
            "free".to_string()
        } else {
            format!("{} per seat", event.price)
        };
        info!(
            "  {} | {} at {} ({}, {} seat(s) left)",
            format_event_date(event.date),
            event.title,
            event.location,
            price,
            app.catalog.available_seats(&event.id, &app.applications)
        );
    }

    // 5. Book two seats for the next paid event and pay for them
    let Some(event) = upcoming.iter().find(|e| !e.is_free()).cloned() else {
        info!("No paid upcoming events; nothing to demo");
        app.shutdown();
        return Ok(());
    };
    let application = app
        .book(
            &event.id,
            BookingDetails {
                user_name: "Alex Rivera".to_string(),
                email: "alex.rivera@example.com".to_string(),
                phone: "+1 555 0123".to_string(),
                quantity: 2,
            },
        )
        .await?;
    info!(
        "Booked \"{}\": application {} is {:?}",
        event.title, application.id, application.status
    );

    let card = CardDetails {
        number: "4242 4242 4242 4242".to_string(),
        expiry: demo_expiry(),
        cvv: "123".to_string(),
        holder_name: "Alex Rivera".to_string(),
    };
    if app.checkout(&application.id, &card).await? {
        let paid = app
            .applications
            .application_by_id(&application.id)
            .cloned();
        if let Some(paid) = paid {
            for ticket in &paid.tickets {
                info!(
                    "Ticket {} for {} ({})",
                    ticket.id, ticket.holder_name, ticket.qr_code
                );
            }
            // Compose the printable artifact and share the first ticket.
            if let Some(ticket) = paid.tickets.first() {
                let document = TicketDocument::compose(ticket, &event);
                info!(
                    "Composed {} with {} detail line(s)",
                    document.file_name(),
                    document.lines.len()
                );
                let mut clipboard = ConsoleClipboard;
                app.share_ticket(&mut clipboard, &ticket.id).await;
            }
        }
    } else {
        // The simulator declines around one attempt in twenty; a retry is
        // simply another checkout call.
        warn!(
            "Payment did not go through: {}",
            app.payments.last_error().unwrap_or("unknown reason")
        );
    }

    // 6. Inbox state and pending reminders
    {
        let inbox = app.notifications.lock().await;
        info!(
            "{} notification(s), {} unread",
            inbox.all().len(),
            inbox.unread_count()
        );
        for notification in inbox.all() {
            info!(
                "  [{:?}] {}: {}",
                notification.kind, notification.title, notification.message
            );
        }
    }
    info!(
        "{} reminder timer(s) pending",
        app.scheduler.pending_timer_count()
    );

    // 7. Teardown
    app.shutdown();
    Ok(())
}

//! Entity module - the plain-data model shared by every component.
//! These are serde structs, not behavior: all lifecycle rules live in
//! [`crate::core`], and the persisted shapes double as the storage layout.

pub mod application;
pub mod event;
pub mod notification;
pub mod ticket;

pub use application::{Application, ApplicationStatus};
pub use event::Event;
pub use notification::{Notification, NotificationType, Toast};
pub use ticket::Ticket;

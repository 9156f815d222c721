//! Core business logic for the ticketing system.
//!
//! Each submodule owns one concern: the application/ticket lifecycle, the
//! event catalog, the payment simulator, notification state, reminder
//! scheduling, and shareable ticket artifacts. Modules hold their state in
//! plain structs that are created once at startup and passed by reference,
//! so everything here is unit-testable without global state.

/// Application lifecycle - booking, payment completion, and ticket management
pub mod applications;
/// Shareable ticket artifacts - printable documents and share links
pub mod artifact;
/// Event catalog - read-only event listings and derived views
pub mod catalog;
/// Notification inbox and transient toast state
pub mod notifications;
/// Simulated payment processing with card validation
pub mod payment;
/// Background reminder scheduling for booked events
pub mod scheduler;

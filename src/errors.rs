//! Unified error types and result handling.
//!
//! Not-found outcomes are deliberately NOT errors in this crate: operations
//! addressed by an unknown id report `Ok(false)` or `None` so callers can
//! handle absent records without unwinding. Payment declines and card
//! validation failures have their own taxonomy in [`crate::core::payment`].

use thiserror::Error;

/// Crate-wide error type covering configuration, storage, and input
/// validation failures.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed configuration (environment or catalog file)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A collection snapshot could not be serialized or written
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Filesystem error while touching the data directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An application was requested with a ticket quantity below 1
    #[error("Invalid ticket quantity: {quantity} (must be at least 1)")]
    InvalidQuantity { quantity: u32 },

    /// A booking referenced an event id missing from the catalog
    #[error("Unknown event: {event_id}")]
    UnknownEvent { event_id: String },
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

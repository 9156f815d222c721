//! Payment simulation - Card validation and a mock processor with realistic
//! latency.
//!
//! No real payment provider is involved anywhere. The simulator validates
//! the card fields synchronously, then sleeps for a random delay inside its
//! latency window and approves with a configured probability. Both knobs are
//! plain fields so tests can collapse the delay and force either verdict.
//! Card details only ever live in memory for the duration of one attempt.

use rand::Rng;
use std::{ops::Range, time::Duration};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info};

/// Observable state of one payment attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaymentStatus {
    /// No attempt in flight; the initial and post-reset state.
    #[default]
    Idle,
    /// An attempt is in flight. Every call to
    /// [`PaymentSimulator::process_payment`] passes through this state and
    /// ends in Success or Failed before returning.
    Processing,
    /// The most recent attempt was approved.
    Success,
    /// The most recent attempt failed validation or was declined.
    Failed,
}

/// Why a payment attempt failed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// A card field failed validation; no processing delay was simulated.
    #[error("{reason}")]
    Validation { reason: String },
    /// The simulated processor rejected an otherwise valid card.
    #[error("Payment declined. Please try again.")]
    Declined,
}

/// Card fields as captured by a payment form. Never persisted or logged.
#[derive(Clone, Debug)]
pub struct CardDetails {
    /// Card number; whitespace and dashes are tolerated.
    pub number: String,
    /// Expiry in `MM/YY` form.
    pub expiry: String,
    /// Card verification value, 3 or 4 digits.
    pub cvv: String,
    /// Name on the card.
    pub holder_name: String,
}

/// Mock payment processor.
///
/// `process_payment` takes `&mut self`, so a second attempt on the same
/// simulator cannot start while one is in flight.
#[derive(Debug)]
pub struct PaymentSimulator {
    status: PaymentStatus,
    error: Option<String>,
    latency_ms: Range<u64>,
    success_rate: f64,
}

impl Default for PaymentSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentSimulator {
    /// Simulated processing delay window in milliseconds.
    pub const DEFAULT_LATENCY_MS: Range<u64> = 2000..3000;
    /// Approval probability for cards that pass validation.
    pub const DEFAULT_SUCCESS_RATE: f64 = 0.95;

    /// Creates a simulator with the default latency window and approval
    /// rate.
    #[must_use]
    pub fn new() -> Self {
        Self::with_profile(Self::DEFAULT_LATENCY_MS, Self::DEFAULT_SUCCESS_RATE)
    }

    /// Creates a simulator with a custom behavior profile.
    ///
    /// The latency range must be non-empty and the success rate must lie in
    /// `[0.0, 1.0]`. Tests shrink the window to keep simulated delays out of
    /// the test runtime and pin the rate to 0.0 or 1.0 to force a verdict.
    #[must_use]
    pub fn with_profile(latency_ms: Range<u64>, success_rate: f64) -> Self {
        Self {
            status: PaymentStatus::Idle,
            error: None,
            latency_ms,
            success_rate,
        }
    }

    /// Runs one simulated payment attempt.
    ///
    /// Validation happens before any simulated delay, so invalid cards fail
    /// fast. A valid card waits out a random latency inside the configured
    /// window and is then approved with the configured probability.
    ///
    /// # Arguments
    /// * `amount` - Total charge in whole currency units; zero is allowed.
    /// * `card` - Card details for this attempt.
    ///
    /// # Returns
    /// true on approval. On any failure the rendered reason is available via
    /// [`last_error`](Self::last_error) and a retry is simply another call.
    pub async fn process_payment(&mut self, amount: u64, card: &CardDetails) -> bool {
        self.status = PaymentStatus::Processing;
        self.error = None;

        if let Err(error) = validate_card(card) {
            debug!("Card validation failed: {}", error);
            self.status = PaymentStatus::Failed;
            self.error = Some(error.to_string());
            return false;
        }

        // Draw the delay and the verdict up front so the RNG handle does
        // not live across the await point.
        let (delay_ms, approved) = {
            let mut rng = rand::thread_rng();
            (
                rng.gen_range(self.latency_ms.clone()),
                rng.gen_bool(self.success_rate),
            )
        };

        info!("Processing payment of {} ({}ms simulated latency)", amount, delay_ms);
        sleep(Duration::from_millis(delay_ms)).await;

        if approved {
            info!("Payment of {} approved", amount);
            self.status = PaymentStatus::Success;
            true
        } else {
            info!("Payment of {} declined", amount);
            self.status = PaymentStatus::Failed;
            self.error = Some(PaymentError::Declined.to_string());
            false
        }
    }

    /// Returns the simulator to Idle and clears any recorded failure, ready
    /// for a fresh attempt.
    pub fn reset(&mut self) {
        self.status = PaymentStatus::Idle;
        self.error = None;
    }

    /// Current state of the attempt state machine.
    #[must_use]
    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    /// The rendered reason for the most recent failure, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Checks every card field in form order and reports the first failure.
pub fn validate_card(card: &CardDetails) -> Result<(), PaymentError> {
    if !validate_card_number(&card.number) {
        return Err(validation("Invalid card number"));
    }
    if !validate_expiry(&card.expiry) {
        return Err(validation("Invalid expiry date"));
    }
    if !validate_cvv(&card.cvv) {
        return Err(validation("Invalid CVV"));
    }
    if !validate_holder_name(&card.holder_name) {
        return Err(validation("Please enter cardholder name"));
    }
    Ok(())
}

/// Accepts 13 to 19 digits, ignoring whitespace and dashes. No checksum;
/// the processor is a simulation.
#[must_use]
pub fn validate_card_number(number: &str) -> bool {
    let digits: String = number
        .chars()
        .filter(|c| !(c.is_whitespace() || *c == '-'))
        .collect();
    (13..=19).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

/// Accepts `MM/YY` with a real month that is not in the past. The current
/// month still validates; cards expire at the end of their printed month.
#[must_use]
pub fn validate_expiry(expiry: &str) -> bool {
    let bytes = expiry.as_bytes();
    if bytes.len() != 5 || bytes[2] != b'/' {
        return false;
    }
    if ![0, 1, 3, 4].into_iter().all(|i| bytes[i].is_ascii_digit()) {
        return false;
    }

    let month = u32::from(bytes[0] - b'0') * 10 + u32::from(bytes[1] - b'0');
    if !(1..=12).contains(&month) {
        return false;
    }
    let year = 2000 + i32::from(bytes[3] - b'0') * 10 + i32::from(bytes[4] - b'0');

    use chrono::Datelike;
    let now = chrono::Utc::now();
    (year, month) >= (now.year(), now.month())
}

/// Accepts exactly 3 or 4 digits.
#[must_use]
pub fn validate_cvv(cvv: &str) -> bool {
    matches!(cvv.len(), 3 | 4) && cvv.bytes().all(|b| b.is_ascii_digit())
}

/// Accepts any name that is at least 3 characters after trimming.
#[must_use]
pub fn validate_holder_name(name: &str) -> bool {
    name.trim().chars().count() >= 3
}

/// Reformats a card number as the user types: digits only, grouped in
/// fours. Display helper with no validation authority, so overlong input
/// stays visible rather than being silently truncated.
#[must_use]
pub fn format_card_number(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(char::is_ascii_digit).collect();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 4);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && i % 4 == 0 {
            formatted.push(' ');
        }
        formatted.push(*digit);
    }
    formatted
}

/// Reformats an expiry as the user types: digits only, capped at 4, with
/// the slash appended as soon as the month is complete ("12" becomes
/// "12/").
#[must_use]
pub fn format_expiry(input: &str) -> String {
    let digits: String = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(4)
        .collect();
    if digits.len() >= 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

fn validation(reason: &str) -> PaymentError {
    PaymentError::Validation {
        reason: reason.to_string(),
    }
}

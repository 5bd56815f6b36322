//! `invtrack-alerts` — throttled low-stock notification.
//!
//! The actual delivery channel (email) is an external collaborator behind
//! [`AlertSender`]; this crate owns only the clock gate: a single stored
//! last-sent timestamp and a minimum resend interval. The clock is an
//! explicit argument — no background tasks or timers.

pub mod notifier;

pub use notifier::{
    AlertLog, AlertOutcome, AlertSender, LowStockAlerter, DEFAULT_RESEND_INTERVAL_HOURS,
};

//! Quitanda payment module
//!
//! A simulated gateway: an order whose total equals the configured failure
//! amount is declined, everything else goes through. `PaymentCompleted` has
//! no registered consumer; it is recorded nowhere and only logged here.

pub mod service;

pub use service::{DEFAULT_FAILURE_AMOUNT, PaymentDecision, PaymentService, decide};

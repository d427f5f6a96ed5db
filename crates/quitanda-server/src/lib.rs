//! Quitanda server library
//!
//! Configuration, startup wiring, metrics, and the HTTP surface over the
//! order, inventory, payment, and outbox crates.

pub mod api;
pub mod metrics;
pub mod model;
pub mod startup;

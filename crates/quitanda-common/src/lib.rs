//! Quitanda Common - shared kernel for the order-fulfillment modules
//!
//! This crate provides the foundational types used across all Quitanda
//! components:
//! - Error types and error codes
//! - Domain events exchanged between modules
//! - Shared field validators
//! - Shutdown signal plumbing

pub mod error;
pub mod event;
pub mod shutdown;
pub mod validation;

// Re-exports for convenience
pub use error::{ErrorCode, QuitandaError};
pub use event::DomainEvent;
pub use shutdown::{ShutdownSignal, wait_for_shutdown_signal};

/// Listener id of the order module
pub const ORDER_LISTENER: &str = "order";

/// Listener id of the inventory module
pub const INVENTORY_LISTENER: &str = "inventory";

/// Listener id of the payment module
pub const PAYMENT_LISTENER: &str = "payment";

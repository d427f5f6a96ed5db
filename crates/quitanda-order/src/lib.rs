//! Quitanda order module
//!
//! Owns the `orders` table: placement (with the `OrderPlaced` publication on
//! the same transaction), queries, and the reactions that complete or cancel
//! an order based on inventory and payment outcomes.

pub mod model;
pub mod service;

pub use model::{OrderStatus, OrderView, PlaceOrderRequest};
pub use service::OrderService;

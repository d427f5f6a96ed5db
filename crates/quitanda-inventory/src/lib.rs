//! Quitanda inventory module
//!
//! Stock lives in batches with a shelf life. Reservation deducts
//! first-expiring-first-out across non-expired batches; an idempotency
//! ledger keeps redelivered reservations from deducting twice.

pub mod model;
pub mod plan;
pub mod service;

pub use model::{AddBatchRequest, BatchStock, BatchView, ProductStockView};
pub use plan::{DeductionOutcome, plan_deduction};
pub use service::InventoryService;

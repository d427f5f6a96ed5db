//! SeaORM entity definitions for the Quitanda schema

pub mod event_publication;
pub mod inventory_batch;
pub mod inventory_processed_order;
pub mod orders;

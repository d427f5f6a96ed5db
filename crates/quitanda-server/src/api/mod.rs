//! HTTP API handlers

pub mod health;
pub mod inventory;
pub mod openapi;
pub mod ops;
pub mod order;

//! Inventory domain model and request/response shapes

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use quitanda_common::validation::{validate_expires_at, validate_product_id};
use quitanda_persistence::entity::inventory_batch;

/// Stock mutators on a batch row.
pub trait BatchStock {
    /// Deduct up to `amount`, clamped at the available quantity.
    /// Returns the amount actually deducted.
    fn decrease(&mut self, amount: i32) -> i32;

    /// Add stock back (payment-failure restock).
    fn increase(&mut self, amount: i32);
}

impl BatchStock for inventory_batch::Model {
    fn decrease(&mut self, amount: i32) -> i32 {
        let deducted = self.quantity.min(amount).max(0);
        self.quantity -= deducted;
        deducted
    }

    fn increase(&mut self, amount: i32) {
        self.quantity += amount;
    }
}

/// Request body for `POST /inventory/batches`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddBatchRequest {
    #[validate(custom(function = validate_product_id))]
    pub product_id: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
    /// RFC 3339 or `YYYY-MM-DDTHH:MM:SS`; already-expired stock is accepted
    #[validate(custom(function = validate_expires_at))]
    pub expires_at: String,
}

impl AddBatchRequest {
    /// Parse the expiry into a naive UTC datetime.
    pub fn parsed_expires_at(&self) -> Result<NaiveDateTime, String> {
        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&self.expires_at) {
            return Ok(dt.naive_utc());
        }
        NaiveDateTime::parse_from_str(&self.expires_at, "%Y-%m-%dT%H:%M:%S")
            .map_err(|e| format!("invalid expiresAt '{}': {}", self.expires_at, e))
    }
}

/// Batch as returned by the stock view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchView {
    pub id: String,
    pub quantity: i32,
    pub expires_at: String,
    pub expired: bool,
}

impl BatchView {
    pub fn from_model(model: &inventory_batch::Model, now: NaiveDateTime) -> Self {
        Self {
            id: model.id.clone(),
            quantity: model.quantity,
            expires_at: model.expires_at.and_utc().to_rfc3339(),
            expired: model.expires_at < now,
        }
    }
}

/// Stock view for a product: every batch plus the live total
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStockView {
    pub product_id: String,
    /// Sum of non-expired batch quantities
    pub available: i32,
    pub batches: Vec<BatchView>,
}

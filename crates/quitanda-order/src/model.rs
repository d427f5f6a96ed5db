//! Order domain model and request/response shapes

use serde::{Deserialize, Serialize};
use validator::Validate;

use quitanda_common::validation::validate_product_id;
use quitanda_persistence::entity::orders;

/// Order lifecycle. Transitions are unguarded: a payment compensation may
/// cancel an order that was already completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Placed, inventory not yet verified
    Pending,
    /// Inventory deducted
    Completed,
    /// Rejected by inventory or compensated after payment failure
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(OrderStatus::Pending),
            "COMPLETED" => Ok(OrderStatus::Completed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

/// Request body for `POST /orders`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[validate(custom(function = validate_product_id))]
    pub product_id: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
    /// Unit price in minor units
    #[validate(range(min = 0))]
    pub price: i64,
}

/// Order as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: String,
    pub product_id: String,
    pub quantity: i32,
    pub price: i64,
    pub total_amount: i64,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<orders::Model> for OrderView {
    fn from(model: orders::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            quantity: model.quantity,
            price: model.price,
            total_amount: total_amount(model.price, model.quantity),
            status: model.status,
            created_at: model.created_at.and_utc().to_rfc3339(),
            updated_at: model.updated_at.and_utc().to_rfc3339(),
        }
    }
}

/// Total order amount in minor units.
pub fn total_amount(price: i64, quantity: i32) -> i64 {
    price * quantity as i64
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert_eq!(
            OrderStatus::from_str("cancelled").unwrap(),
            OrderStatus::Cancelled
        );
        assert!(OrderStatus::from_str("SHIPPED").is_err());
    }

    #[test]
    fn total_amount_is_price_times_quantity() {
        assert_eq!(total_amount(100, 3), 300);
        assert_eq!(total_amount(0, 7), 0);
        assert_eq!(total_amount(3333, 3), 9999);
    }

    #[test]
    fn place_order_request_validation() {
        use validator::Validate;

        let ok = PlaceOrderRequest {
            product_id: "apple".to_string(),
            quantity: 1,
            price: 0,
        };
        assert!(ok.validate().is_ok());

        let blank_product = PlaceOrderRequest {
            product_id: "  ".to_string(),
            ..ok.clone()
        };
        assert!(blank_product.validate().is_err());

        let zero_quantity = PlaceOrderRequest {
            quantity: 0,
            ..ok.clone()
        };
        assert!(zero_quantity.validate().is_err());

        let negative_price = PlaceOrderRequest { price: -1, ..ok };
        assert!(negative_price.validate().is_err());
    }

    #[test]
    fn order_view_carries_total_amount() {
        let now = chrono::Utc::now().naive_utc();
        let model = orders::Model {
            id: "o-1".to_string(),
            product_id: "apple".to_string(),
            quantity: 3,
            price: 150,
            status: "PENDING".to_string(),
            created_at: now,
            updated_at: now,
        };
        let view = OrderView::from(model);
        assert_eq!(view.total_amount, 450);
        assert_eq!(view.status, "PENDING");
    }
}

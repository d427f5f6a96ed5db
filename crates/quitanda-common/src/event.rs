//! Domain events exchanged between the order, inventory, and payment modules
//!
//! Events are serialized as JSON into the outbox. The deduction map uses a
//! `BTreeMap` so serialized payloads are byte-stable across runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Events published through the transactional outbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum DomainEvent {
    /// A new order was persisted with status `Pending`.
    OrderPlaced {
        order_id: String,
        product_id: String,
        quantity: i32,
        total_amount: i64,
    },
    /// Inventory deducted stock for the order; carries the per-batch
    /// deduction map so a later compensation can restock exactly.
    InventoryVerified {
        order_id: String,
        total_amount: i64,
        product_id: String,
        quantity: i32,
        deducted: BTreeMap<String, i32>,
    },
    /// Inventory could not cover the order.
    InventoryRejected { order_id: String, reason: String },
    /// Payment went through.
    PaymentCompleted { order_id: String },
    /// Payment was declined; triggers restock and order cancellation.
    PaymentFailed {
        order_id: String,
        reason: String,
        product_id: String,
        quantity: i32,
        deducted: BTreeMap<String, i32>,
    },
}

impl DomainEvent {
    /// Stable event type name, stored on each publication row.
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::OrderPlaced { .. } => "OrderPlaced",
            DomainEvent::InventoryVerified { .. } => "InventoryVerified",
            DomainEvent::InventoryRejected { .. } => "InventoryRejected",
            DomainEvent::PaymentCompleted { .. } => "PaymentCompleted",
            DomainEvent::PaymentFailed { .. } => "PaymentFailed",
        }
    }

    /// Id of the order the event concerns.
    pub fn order_id(&self) -> &str {
        match self {
            DomainEvent::OrderPlaced { order_id, .. }
            | DomainEvent::InventoryVerified { order_id, .. }
            | DomainEvent::InventoryRejected { order_id, .. }
            | DomainEvent::PaymentCompleted { order_id }
            | DomainEvent::PaymentFailed { order_id, .. } => order_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_matches_variant() {
        let event = DomainEvent::OrderPlaced {
            order_id: "o-1".to_string(),
            product_id: "apple".to_string(),
            quantity: 3,
            total_amount: 300,
        };
        assert_eq!(event.event_type(), "OrderPlaced");
        assert_eq!(event.order_id(), "o-1");
    }

    #[test]
    fn serde_round_trip_preserves_deduction_map() {
        let mut deducted = BTreeMap::new();
        deducted.insert("batch-a".to_string(), 7);
        deducted.insert("batch-b".to_string(), 4);

        let event = DomainEvent::InventoryVerified {
            order_id: "o-2".to_string(),
            total_amount: 1100,
            product_id: "pear".to_string(),
            quantity: 11,
            deducted: deducted.clone(),
        };

        let json = serde_json::to_string(&event).unwrap();
        let back: DomainEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);

        match back {
            DomainEvent::InventoryVerified { deducted: map, .. } => assert_eq!(map, deducted),
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn payload_is_tagged_with_event_type() {
        let event = DomainEvent::PaymentCompleted {
            order_id: "o-3".to_string(),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "PaymentCompleted");
        assert_eq!(json["orderId"], "o-3");
    }
}

//! Payment service layer

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::info;

use quitanda_common::{DomainEvent, PAYMENT_LISTENER, error::classify_db_err};
use quitanda_outbox::{EventListener, EventPublisher};

/// Order totals equal to this amount are declined unless overridden by
/// `payment.failure-amount`.
pub const DEFAULT_FAILURE_AMOUNT: i64 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentDecision {
    Complete,
    Fail,
}

/// The simulated gateway's decision rule.
pub fn decide(total_amount: i64, failure_amount: i64) -> PaymentDecision {
    if total_amount == failure_amount {
        PaymentDecision::Fail
    } else {
        PaymentDecision::Complete
    }
}

pub struct PaymentService {
    db: DatabaseConnection,
    publisher: Arc<EventPublisher>,
    failure_amount: i64,
}

impl PaymentService {
    pub fn new(db: DatabaseConnection, publisher: Arc<EventPublisher>, failure_amount: i64) -> Self {
        Self {
            db,
            publisher,
            failure_amount,
        }
    }

    async fn process(&self, event: &DomainEvent) -> anyhow::Result<()> {
        let DomainEvent::InventoryVerified {
            order_id,
            total_amount,
            product_id,
            quantity,
            deducted,
        } = event
        else {
            return Ok(());
        };

        let follow_up = match decide(*total_amount, self.failure_amount) {
            PaymentDecision::Fail => {
                info!(order_id, total_amount, "Payment declined, compensating");
                metrics::counter!("payments_failed_total").increment(1);
                DomainEvent::PaymentFailed {
                    order_id: order_id.clone(),
                    reason: format!("payment declined: amount {}", total_amount),
                    product_id: product_id.clone(),
                    quantity: *quantity,
                    deducted: deducted.clone(),
                }
            }
            PaymentDecision::Complete => {
                info!(order_id, total_amount, "Payment completed");
                metrics::counter!("payments_completed_total").increment(1);
                DomainEvent::PaymentCompleted {
                    order_id: order_id.clone(),
                }
            }
        };

        let txn = self.db.begin().await.map_err(classify_db_err)?;
        self.publisher.publish(&txn, &follow_up).await?;
        txn.commit().await.map_err(classify_db_err)?;
        Ok(())
    }
}

#[async_trait]
impl EventListener for PaymentService {
    fn id(&self) -> &'static str {
        PAYMENT_LISTENER
    }

    fn handles(&self, event: &DomainEvent) -> bool {
        matches!(event, DomainEvent::InventoryVerified { .. })
    }

    async fn on_event(&self, event: &DomainEvent) -> anyhow::Result<()> {
        self.process(event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_amount_declines_payment() {
        assert_eq!(decide(9999, 9999), PaymentDecision::Fail);
        assert_eq!(decide(9998, 9999), PaymentDecision::Complete);
        assert_eq!(decide(0, 9999), PaymentDecision::Complete);
        assert_eq!(decide(500, 500), PaymentDecision::Fail);
    }
}

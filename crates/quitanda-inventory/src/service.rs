//! Inventory service layer
//!
//! Reservation runs as a reaction to `OrderPlaced`: the ledger check, the
//! FEFO deduction, and the follow-up publication all commit on one
//! transaction. Restock reverses a deduction map after a payment failure.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use quitanda_common::{
    DomainEvent, INVENTORY_LISTENER, QuitandaError,
    error::classify_db_err,
    validation::{validate_product_id, validate_quantity},
};
use quitanda_outbox::{EventListener, EventPublisher};
use quitanda_persistence::entity::{inventory_batch, inventory_processed_order};

use crate::model::{BatchView, ProductStockView};
use crate::plan::{DeductionOutcome, plan_deduction};

pub struct InventoryService {
    db: DatabaseConnection,
    publisher: Arc<EventPublisher>,
}

impl InventoryService {
    pub fn new(db: DatabaseConnection, publisher: Arc<EventPublisher>) -> Self {
        Self { db, publisher }
    }

    /// Insert a stock batch. Returns the generated batch id.
    pub async fn add_batch(
        &self,
        product_id: &str,
        quantity: i32,
        expires_at: NaiveDateTime,
    ) -> anyhow::Result<String> {
        validate_product_id(product_id)
            .map_err(|e| QuitandaError::IllegalArgument(e.to_string()))?;
        validate_quantity(quantity).map_err(|e| QuitandaError::IllegalArgument(e.to_string()))?;

        let batch_id = Uuid::new_v4().to_string();
        inventory_batch::Entity::insert(inventory_batch::ActiveModel {
            id: Set(batch_id.clone()),
            product_id: Set(product_id.to_string()),
            quantity: Set(quantity),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now().naive_utc()),
        })
        .exec(&self.db)
        .await
        .map_err(classify_db_err)?;

        info!(batch_id = %batch_id, product_id, quantity, "Inventory batch added");
        Ok(batch_id)
    }

    /// Every batch for the product plus the currently-available (non-expired)
    /// total. Errors with `ProductNotFound` when no batch exists at all.
    pub async fn product_stock(&self, product_id: &str) -> anyhow::Result<ProductStockView> {
        let batches = inventory_batch::Entity::find()
            .filter(inventory_batch::Column::ProductId.eq(product_id))
            .order_by_asc(inventory_batch::Column::ExpiresAt)
            .all(&self.db)
            .await
            .map_err(classify_db_err)?;

        if batches.is_empty() {
            return Err(QuitandaError::ProductNotFound(product_id.to_string()).into());
        }

        let now = Utc::now().naive_utc();
        let available = batches
            .iter()
            .filter(|b| b.expires_at >= now)
            .map(|b| b.quantity)
            .sum();

        Ok(ProductStockView {
            product_id: product_id.to_string(),
            available,
            batches: batches
                .iter()
                .map(|b| BatchView::from_model(b, now))
                .collect(),
        })
    }

    /// Reaction to `OrderPlaced`: deduct FEFO or reject, idempotently.
    async fn reserve(
        &self,
        order_id: &str,
        product_id: &str,
        quantity: i32,
        total_amount: i64,
    ) -> anyhow::Result<()> {
        let txn = self.db.begin().await.map_err(classify_db_err)?;

        let already_processed = inventory_processed_order::Entity::find_by_id(order_id)
            .one(&txn)
            .await
            .map_err(classify_db_err)?
            .is_some();
        if already_processed {
            info!(order_id, "Order already processed by inventory, skipping");
            txn.commit().await.map_err(classify_db_err)?;
            return Ok(());
        }

        // Row lock on backends that support it; SQLite serializes writers
        // at the database level instead.
        let mut batch_query = inventory_batch::Entity::find()
            .filter(inventory_batch::Column::ProductId.eq(product_id))
            .filter(inventory_batch::Column::Quantity.gt(0))
            .order_by_asc(inventory_batch::Column::ExpiresAt);
        if self.db.get_database_backend() == DbBackend::Postgres {
            batch_query = batch_query.lock_exclusive();
        }
        let batches = batch_query.all(&txn).await.map_err(classify_db_err)?;

        let now = Utc::now().naive_utc();
        let outcome = plan_deduction(&batches, now, quantity);

        match &outcome {
            DeductionOutcome::Insufficient { available } => {
                info!(
                    order_id,
                    product_id, requested = quantity, available, "Insufficient live stock"
                );
                metrics::counter!("inventory_reservations_rejected_total").increment(1);
                self.publisher
                    .publish(
                        &txn,
                        &DomainEvent::InventoryRejected {
                            order_id: order_id.to_string(),
                            reason: format!(
                                "insufficient live stock (requested: {}, available: {})",
                                quantity, available
                            ),
                        },
                    )
                    .await?;
            }
            DeductionOutcome::Deducted { per_batch } => {
                for batch in &batches {
                    let Some(deducted) = per_batch.get(&batch.id) else {
                        continue;
                    };
                    let mut active: inventory_batch::ActiveModel = batch.clone().into();
                    active.quantity = Set(batch.quantity - deducted);
                    inventory_batch::Entity::update(active)
                        .exec(&txn)
                        .await
                        .map_err(classify_db_err)?;
                }

                info!(order_id, product_id, quantity, "Stock deducted FEFO");
                metrics::counter!("inventory_reservations_verified_total").increment(1);
                self.publisher
                    .publish(
                        &txn,
                        &DomainEvent::InventoryVerified {
                            order_id: order_id.to_string(),
                            total_amount,
                            product_id: product_id.to_string(),
                            quantity,
                            deducted: per_batch.clone(),
                        },
                    )
                    .await?;
            }
        }

        // Ledger row regardless of outcome: the order has been handled.
        inventory_processed_order::Entity::insert(inventory_processed_order::ActiveModel {
            order_id: Set(order_id.to_string()),
            processed_at: Set(now),
        })
        .exec(&txn)
        .await
        .map_err(classify_db_err)?;

        txn.commit().await.map_err(classify_db_err)?;
        Ok(())
    }

    /// Reaction to `PaymentFailed`: add the deducted amounts back.
    /// Batches missing from the table are skipped.
    async fn restock(&self, order_id: &str, deducted: &BTreeMap<String, i32>) -> anyhow::Result<()> {
        let txn = self.db.begin().await.map_err(classify_db_err)?;

        for (batch_id, amount) in deducted {
            let Some(batch) = inventory_batch::Entity::find_by_id(batch_id)
                .one(&txn)
                .await
                .map_err(classify_db_err)?
            else {
                warn!(order_id, batch_id, "Restock target batch missing, skipping");
                continue;
            };

            let mut active: inventory_batch::ActiveModel = batch.clone().into();
            active.quantity = Set(batch.quantity + amount);
            inventory_batch::Entity::update(active)
                .exec(&txn)
                .await
                .map_err(classify_db_err)?;
        }

        txn.commit().await.map_err(classify_db_err)?;
        info!(order_id, batches = deducted.len(), "Stock restored after payment failure");
        Ok(())
    }
}

#[async_trait]
impl EventListener for InventoryService {
    fn id(&self) -> &'static str {
        INVENTORY_LISTENER
    }

    fn handles(&self, event: &DomainEvent) -> bool {
        matches!(
            event,
            DomainEvent::OrderPlaced { .. } | DomainEvent::PaymentFailed { .. }
        )
    }

    async fn on_event(&self, event: &DomainEvent) -> anyhow::Result<()> {
        match event {
            DomainEvent::OrderPlaced {
                order_id,
                product_id,
                quantity,
                total_amount,
            } => {
                self.reserve(order_id, product_id, *quantity, *total_amount)
                    .await
            }
            DomainEvent::PaymentFailed {
                order_id, deducted, ..
            } => self.restock(order_id, deducted).await,
            _ => Ok(()),
        }
    }
}

//! Order service layer
//!
//! Placement writes the order row and its `OrderPlaced` publication on one
//! transaction. Reactions run from the outbox relay, each in its own
//! transaction; reactions on missing orders are no-ops.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use quitanda_common::{
    DomainEvent, ORDER_LISTENER, QuitandaError,
    error::classify_db_err,
    validation::{validate_price, validate_product_id, validate_quantity},
};
use quitanda_outbox::{EventListener, EventPublisher};
use quitanda_persistence::{Page, entity::orders};

use crate::model::{OrderStatus, OrderView, total_amount};

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 200;

pub struct OrderService {
    db: DatabaseConnection,
    publisher: Arc<EventPublisher>,
}

impl OrderService {
    pub fn new(db: DatabaseConnection, publisher: Arc<EventPublisher>) -> Self {
        Self { db, publisher }
    }

    /// Insert a `Pending` order and record `OrderPlaced` for its listeners,
    /// all on one transaction. Returns the generated order id.
    pub async fn place(
        &self,
        product_id: &str,
        quantity: i32,
        price: i64,
    ) -> anyhow::Result<String> {
        validate_product_id(product_id)
            .map_err(|e| QuitandaError::IllegalArgument(e.to_string()))?;
        validate_quantity(quantity).map_err(|e| QuitandaError::IllegalArgument(e.to_string()))?;
        validate_price(price).map_err(|e| QuitandaError::IllegalArgument(e.to_string()))?;

        let order_id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        let txn = self.db.begin().await.map_err(classify_db_err)?;

        orders::Entity::insert(orders::ActiveModel {
            id: Set(order_id.clone()),
            product_id: Set(product_id.to_string()),
            quantity: Set(quantity),
            price: Set(price),
            status: Set(OrderStatus::Pending.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .exec(&txn)
        .await
        .map_err(classify_db_err)?;

        self.publisher
            .publish(
                &txn,
                &DomainEvent::OrderPlaced {
                    order_id: order_id.clone(),
                    product_id: product_id.to_string(),
                    quantity,
                    total_amount: total_amount(price, quantity),
                },
            )
            .await?;

        txn.commit().await.map_err(classify_db_err)?;

        metrics::counter!("orders_placed_total").increment(1);
        info!(order_id = %order_id, product_id, quantity, "Order placed");

        Ok(order_id)
    }

    pub async fn get(&self, order_id: &str) -> anyhow::Result<Option<OrderView>> {
        let order = orders::Entity::find_by_id(order_id)
            .one(&self.db)
            .await
            .map_err(classify_db_err)?;
        Ok(order.map(OrderView::from))
    }

    /// List orders with optional status filter, newest first.
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<OrderView>> {
        let page_no = page_no.max(1);
        let page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size.min(MAX_PAGE_SIZE)
        };

        let mut count_select = orders::Entity::find();
        let mut query_select = orders::Entity::find();
        if let Some(status) = status {
            count_select = count_select.filter(orders::Column::Status.eq(status.as_str()));
            query_select = query_select.filter(orders::Column::Status.eq(status.as_str()));
        }

        // Saturate: page_no is user-supplied and may be u64::MAX. Cap the
        // offset at i64::MAX, the widest OFFSET the backends accept.
        let offset = page_no
            .saturating_sub(1)
            .saturating_mul(page_size)
            .min(i64::MAX as u64);
        let (count_result, data_result) = tokio::join!(
            count_select.count(&self.db),
            query_select
                .order_by_desc(orders::Column::CreatedAt)
                .offset(offset)
                .limit(page_size)
                .all(&self.db)
        );

        let total_count = count_result.map_err(classify_db_err)?;
        let items = data_result
            .map_err(classify_db_err)?
            .into_iter()
            .map(OrderView::from)
            .collect();

        Ok(Page::new(total_count, page_no, page_size, items))
    }

    /// Move an order to a new status. Missing orders are a no-op.
    async fn transition(&self, order_id: &str, to: OrderStatus) -> anyhow::Result<()> {
        let Some(order) = orders::Entity::find_by_id(order_id)
            .one(&self.db)
            .await
            .map_err(classify_db_err)?
        else {
            debug!(order_id, status = %to, "Reaction on missing order, skipping");
            return Ok(());
        };

        let mut active: orders::ActiveModel = order.into();
        active.status = Set(to.as_str().to_string());
        active.updated_at = Set(Utc::now().naive_utc());
        orders::Entity::update(active)
            .exec(&self.db)
            .await
            .map_err(classify_db_err)?;

        info!(order_id, status = %to, "Order transitioned");
        Ok(())
    }
}

#[async_trait]
impl EventListener for OrderService {
    fn id(&self) -> &'static str {
        ORDER_LISTENER
    }

    fn handles(&self, event: &DomainEvent) -> bool {
        matches!(
            event,
            DomainEvent::InventoryVerified { .. }
                | DomainEvent::InventoryRejected { .. }
                | DomainEvent::PaymentFailed { .. }
        )
    }

    async fn on_event(&self, event: &DomainEvent) -> anyhow::Result<()> {
        match event {
            DomainEvent::InventoryVerified { order_id, .. } => {
                self.transition(order_id, OrderStatus::Completed).await
            }
            DomainEvent::InventoryRejected { order_id, reason } => {
                info!(order_id, reason, "Inventory rejected order, cancelling");
                self.transition(order_id, OrderStatus::Cancelled).await
            }
            DomainEvent::PaymentFailed { order_id, reason, .. } => {
                info!(order_id, reason, "Payment failed, cancelling order");
                self.transition(order_id, OrderStatus::Cancelled).await
            }
            _ => Ok(()),
        }
    }
}

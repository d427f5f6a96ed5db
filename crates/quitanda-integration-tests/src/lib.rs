//! Test harness that wires the order, inventory and payment modules onto a
//! shared outbox over an in-memory database.
//!
//! The harness drives the relay by hand (`drain`) so tests observe the event
//! flow deterministically, and can build a second relay over the same
//! database to exercise restart resubmission.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter,
};
use uuid::Uuid;

use quitanda_inventory::InventoryService;
use quitanda_order::OrderService;
use quitanda_outbox::{EventPublisher, ListenerRegistry, OutboxRelay, RetryPolicy};
use quitanda_payment::{DEFAULT_FAILURE_AMOUNT, PaymentService};
use quitanda_persistence::entity::{event_publication, inventory_batch, orders};

pub struct TestApp {
    pub db: DatabaseConnection,
    pub registry: Arc<ListenerRegistry>,
    pub publisher: Arc<EventPublisher>,
    pub order_service: Arc<OrderService>,
    pub inventory_service: Arc<InventoryService>,
    pub relay: Arc<OutboxRelay>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_failure_amount(DEFAULT_FAILURE_AMOUNT).await
    }

    pub async fn spawn_with_failure_amount(failure_amount: i64) -> Self {
        // One connection: a pooled in-memory SQLite would hand every pool
        // member its own empty database.
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1);
        let db = Database::connect(opt).await.expect("in-memory database");

        use quitanda_migration::{Migrator, MigratorTrait};
        Migrator::up(&db, None).await.expect("migrations");

        let registry = Arc::new(ListenerRegistry::new());
        let publisher = Arc::new(EventPublisher::new(registry.clone()));

        let order_service = Arc::new(OrderService::new(db.clone(), publisher.clone()));
        let inventory_service = Arc::new(InventoryService::new(db.clone(), publisher.clone()));
        let payment_service = Arc::new(PaymentService::new(
            db.clone(),
            publisher.clone(),
            failure_amount,
        ));

        registry.register(order_service.clone());
        registry.register(inventory_service.clone());
        registry.register(payment_service);

        let relay = Self::build_relay(&db, &registry);

        Self {
            db,
            registry,
            publisher,
            order_service,
            inventory_service,
            relay,
        }
    }

    fn build_relay(db: &DatabaseConnection, registry: &Arc<ListenerRegistry>) -> Arc<OutboxRelay> {
        Arc::new(OutboxRelay::new(
            db.clone(),
            registry.clone(),
            RetryPolicy::new(3, Duration::from_millis(1)),
            50,
            Duration::from_millis(10),
        ))
    }

    /// A new relay over the same database and listeners, as a restarted
    /// process would build. Its parked set starts empty.
    pub fn restarted_relay(&self) -> Arc<OutboxRelay> {
        Self::build_relay(&self.db, &self.registry)
    }

    /// Run the relay until the whole event cascade has settled.
    pub async fn drain(&self) -> usize {
        self.relay.run_until_idle().await.expect("relay drain")
    }

    /// Insert a stock batch expiring `expires_in_days` from now (negative
    /// for already-expired stock). Returns the batch id.
    pub async fn seed_batch(&self, product_id: &str, quantity: i32, expires_in_days: i64) -> String {
        let expires_at = (Utc::now() + ChronoDuration::days(expires_in_days)).naive_utc();
        self.inventory_service
            .add_batch(product_id, quantity, expires_at)
            .await
            .expect("seed batch")
    }

    pub async fn order_status(&self, order_id: &str) -> String {
        orders::Entity::find_by_id(order_id)
            .one(&self.db)
            .await
            .expect("order query")
            .expect("order row")
            .status
    }

    pub async fn batch_quantity(&self, batch_id: &str) -> i32 {
        inventory_batch::Entity::find_by_id(batch_id)
            .one(&self.db)
            .await
            .expect("batch query")
            .expect("batch row")
            .quantity
    }

    /// Total stored quantity across all batches, expired included.
    pub async fn product_quantity(&self, product_id: &str) -> i32 {
        inventory_batch::Entity::find()
            .filter(inventory_batch::Column::ProductId.eq(product_id))
            .all(&self.db)
            .await
            .expect("batch query")
            .iter()
            .map(|b| b.quantity)
            .sum()
    }

    pub async fn incomplete_count(&self) -> u64 {
        event_publication::Entity::find()
            .filter(event_publication::Column::CompletionDate.is_null())
            .count(&self.db)
            .await
            .expect("publication count")
    }

    /// Re-insert an incomplete copy of a completed publication, as a broker
    /// redelivery or crash between dispatch and completion would produce.
    pub async fn duplicate_publication(&self, listener_id: &str, event_type: &str) {
        let original = event_publication::Entity::find()
            .filter(event_publication::Column::ListenerId.eq(listener_id))
            .filter(event_publication::Column::EventType.eq(event_type))
            .one(&self.db)
            .await
            .expect("publication query")
            .expect("publication row");

        event_publication::Entity::insert(event_publication::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            listener_id: Set(original.listener_id),
            event_type: Set(original.event_type),
            payload: Set(original.payload),
            publication_date: Set(Utc::now().naive_utc()),
            completion_date: Set(None),
        })
        .exec(&self.db)
        .await
        .expect("duplicate publication");
    }

    /// Insert a publication no registered listener can dispatch.
    pub async fn orphan_publication(&self) -> String {
        let id = Uuid::new_v4().to_string();
        event_publication::Entity::insert(event_publication::ActiveModel {
            id: Set(id.clone()),
            listener_id: Set("shipping".to_string()),
            event_type: Set("OrderPlaced".to_string()),
            payload: Set(
                serde_json::json!({
                    "type": "OrderPlaced",
                    "orderId": "o-orphan",
                    "productId": "apple",
                    "quantity": 1,
                    "totalAmount": 100
                })
                .to_string(),
            ),
            publication_date: Set(Utc::now().naive_utc()),
            completion_date: Set(None),
        })
        .exec(&self.db)
        .await
        .expect("orphan publication");
        id
    }
}

//! Application startup utilities module.
//!
//! Shared initialization code: logging, HTTP server setup, and wiring of
//! the module services onto the outbox.

mod http;
pub mod logging;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use quitanda_inventory::InventoryService;
use quitanda_order::OrderService;
use quitanda_outbox::{EventPublisher, ListenerRegistry, OutboxRelay, RetryPolicy};
use quitanda_payment::PaymentService;

use crate::model::{AppState, Configuration};

pub use http::http_server;
pub use logging::{LoggingConfig, LoggingGuard, init_logging};

/// Wire the module services onto a shared listener registry and build the
/// application state.
///
/// Every service both publishes through the shared [`EventPublisher`] and
/// registers itself as a listener, so the event flow (order placed, stock
/// reserved, payment decided, compensation) runs entirely through the
/// outbox relay.
pub fn assemble_state(
    configuration: Configuration,
    database_connection: DatabaseConnection,
) -> Arc<AppState> {
    let registry = Arc::new(ListenerRegistry::new());
    let publisher = Arc::new(EventPublisher::new(registry.clone()));

    let order_service = Arc::new(OrderService::new(
        database_connection.clone(),
        publisher.clone(),
    ));
    let inventory_service = Arc::new(InventoryService::new(
        database_connection.clone(),
        publisher.clone(),
    ));
    let payment_service = Arc::new(PaymentService::new(
        database_connection.clone(),
        publisher.clone(),
        configuration.payment_failure_amount(),
    ));

    registry.register(order_service.clone());
    registry.register(inventory_service.clone());
    registry.register(payment_service);

    let relay = Arc::new(OutboxRelay::new(
        database_connection.clone(),
        registry,
        RetryPolicy::new(
            configuration.outbox_retry_max_attempts(),
            configuration.outbox_retry_backoff(),
        ),
        configuration.outbox_batch_size(),
        configuration.outbox_poll_interval(),
    ));

    Arc::new(AppState {
        configuration,
        database_connection,
        order_service,
        inventory_service,
        relay,
    })
}

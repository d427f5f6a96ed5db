//! Shared application state for HTTP handlers

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use quitanda_inventory::InventoryService;
use quitanda_order::OrderService;
use quitanda_outbox::OutboxRelay;

use super::config::Configuration;

pub struct AppState {
    pub configuration: Configuration,
    pub database_connection: DatabaseConnection,
    pub order_service: Arc<OrderService>,
    pub inventory_service: Arc<InventoryService>,
    pub relay: Arc<OutboxRelay>,
}

impl AppState {
    pub fn db(&self) -> &DatabaseConnection {
        &self.database_connection
    }
}

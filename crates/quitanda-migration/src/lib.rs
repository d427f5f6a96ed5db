//! Schema migrations for the Quitanda database
//!
//! Applied at startup when `db.auto-migrate` is on, and by the integration
//! test harness against its in-memory database.

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_orders;
mod m20250301_000002_create_inventory;
mod m20250301_000003_create_event_publication;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_orders::Migration),
            Box::new(m20250301_000002_create_inventory::Migration),
            Box::new(m20250301_000003_create_event_publication::Migration),
        ]
    }
}

//! `SeaORM` Entity for event_publication table
//!
//! The transactional outbox. One row per interested listener per published
//! event; `completion_date` is set once the relay has dispatched the row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "event_publication")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub listener_id: String,
    pub event_type: String,
    /// JSON-serialized `DomainEvent`
    #[sea_orm(column_type = "Text")]
    pub payload: String,
    pub publication_date: DateTime,
    pub completion_date: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

//! Transactional event publisher
//!
//! Writes publication rows on the caller's open transaction so the state
//! change and its events commit or roll back together.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveValue::Set, ConnectionTrait, EntityTrait};
use uuid::Uuid;

use quitanda_common::{DomainEvent, QuitandaError, error::classify_db_err};
use quitanda_persistence::entity::event_publication;

use crate::listener::ListenerRegistry;

pub struct EventPublisher {
    registry: Arc<ListenerRegistry>,
}

impl EventPublisher {
    pub fn new(registry: Arc<ListenerRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ListenerRegistry> {
        &self.registry
    }

    /// Record the event for every registered listener that handles it,
    /// using the caller's connection or open transaction.
    ///
    /// Returns the number of publication rows written. Events nobody
    /// handles produce no rows.
    pub async fn publish<C: ConnectionTrait>(
        &self,
        conn: &C,
        event: &DomainEvent,
    ) -> anyhow::Result<usize> {
        let listener_ids = self.registry.interested_ids(event);
        if listener_ids.is_empty() {
            tracing::debug!(
                event_type = event.event_type(),
                order_id = event.order_id(),
                "No listener registered for event, nothing recorded"
            );
            return Ok(0);
        }

        let payload = serde_json::to_string(event)
            .map_err(|e| QuitandaError::SerializationError(e.to_string()))?;
        let now = Utc::now().naive_utc();

        let rows: Vec<event_publication::ActiveModel> = listener_ids
            .iter()
            .map(|listener_id| event_publication::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                listener_id: Set(listener_id.to_string()),
                event_type: Set(event.event_type().to_string()),
                payload: Set(payload.clone()),
                publication_date: Set(now),
                completion_date: Set(None),
            })
            .collect();

        let count = rows.len();
        event_publication::Entity::insert_many(rows)
            .exec(conn)
            .await
            .map_err(classify_db_err)?;

        metrics::counter!("outbox_publications_recorded_total",
            "event_type" => event.event_type())
        .increment(count as u64);

        tracing::debug!(
            event_type = event.event_type(),
            order_id = event.order_id(),
            listeners = count,
            "Recorded event publication"
        );

        Ok(count)
    }
}

//! Outbox relay: polls incomplete publications and dispatches them
//!
//! Failed publications are parked in memory for the rest of the process
//! lifetime so a poisoned event cannot hot-loop; they stay incomplete in
//! the table and are naturally resubmitted when the process restarts.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::Mutex;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use tracing::{debug, error, info, warn};

use quitanda_common::{DomainEvent, ShutdownSignal, error::classify_db_err};
use quitanda_persistence::entity::event_publication;

use crate::listener::ListenerRegistry;
use crate::retry::RetryPolicy;

pub struct OutboxRelay {
    db: DatabaseConnection,
    registry: Arc<ListenerRegistry>,
    retry: RetryPolicy,
    batch_size: u64,
    poll_interval: Duration,
    parked: Mutex<HashSet<String>>,
}

impl OutboxRelay {
    pub fn new(
        db: DatabaseConnection,
        registry: Arc<ListenerRegistry>,
        retry: RetryPolicy,
        batch_size: u64,
        poll_interval: Duration,
    ) -> Self {
        Self {
            db,
            registry,
            retry,
            batch_size: batch_size.max(1),
            poll_interval,
            parked: Mutex::new(HashSet::new()),
        }
    }

    /// Fetch one batch of incomplete publications (oldest first) and
    /// dispatch each to its listener. Returns the number completed.
    pub async fn run_once(&self) -> anyhow::Result<usize> {
        let parked: Vec<String> = self.parked.lock().iter().cloned().collect();

        let mut query = event_publication::Entity::find()
            .filter(event_publication::Column::CompletionDate.is_null());
        if !parked.is_empty() {
            query = query.filter(event_publication::Column::Id.is_not_in(parked));
        }
        let rows = query
            .order_by_asc(event_publication::Column::PublicationDate)
            .limit(self.batch_size)
            .all(&self.db)
            .await
            .map_err(classify_db_err)?;

        let mut completed = 0;
        for row in rows {
            if self.dispatch(&row).await {
                completed += 1;
            }
        }
        Ok(completed)
    }

    /// Drain the outbox until a pass completes nothing. Parked publications
    /// do not keep the loop alive, which makes this deterministic for tests.
    pub async fn run_until_idle(&self) -> anyhow::Result<usize> {
        let mut total = 0;
        loop {
            let completed = self.run_once().await?;
            if completed == 0 {
                return Ok(total);
            }
            total += completed;
        }
    }

    /// Background polling loop until shutdown.
    pub fn start(self: Arc<Self>, shutdown: ShutdownSignal) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut shutdown_rx = shutdown.subscribe();
            let mut ticker = tokio::time::interval(self.poll_interval);
            info!(
                poll_interval_ms = self.poll_interval.as_millis() as u64,
                batch_size = self.batch_size,
                "Outbox relay started"
            );
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = self.run_once().await {
                            error!("Outbox relay pass failed: {}", e);
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        info!("Outbox relay stopped");
                        break;
                    }
                }
            }
        })
    }

    /// Incomplete publications, oldest first (ops surface).
    pub async fn incomplete_publications(
        &self,
    ) -> anyhow::Result<Vec<event_publication::Model>> {
        event_publication::Entity::find()
            .filter(event_publication::Column::CompletionDate.is_null())
            .order_by_asc(event_publication::Column::PublicationDate)
            .all(&self.db)
            .await
            .map_err(|e| classify_db_err(e).into())
    }

    /// Number of incomplete publications.
    pub async fn backlog(&self) -> anyhow::Result<u64> {
        event_publication::Entity::find()
            .filter(event_publication::Column::CompletionDate.is_null())
            .count(&self.db)
            .await
            .map_err(|e| classify_db_err(e).into())
    }

    /// Publications parked in this process after exhausting their retries.
    pub fn parked_count(&self) -> usize {
        self.parked.lock().len()
    }

    pub fn is_parked(&self, publication_id: &str) -> bool {
        self.parked.lock().contains(publication_id)
    }

    fn park(&self, publication_id: &str) {
        self.parked.lock().insert(publication_id.to_string());
    }

    /// Dispatch a single publication. Returns true when it was completed.
    async fn dispatch(&self, publication: &event_publication::Model) -> bool {
        let event: DomainEvent = match serde_json::from_str(&publication.payload) {
            Ok(event) => event,
            Err(e) => {
                error!(
                    publication_id = %publication.id,
                    event_type = %publication.event_type,
                    "Undeserializable publication payload, parking: {}", e
                );
                self.park(&publication.id);
                return false;
            }
        };

        let Some(listener) = self.registry.by_id(&publication.listener_id) else {
            warn!(
                publication_id = %publication.id,
                listener = %publication.listener_id,
                "No listener registered for publication, parking"
            );
            self.park(&publication.id);
            return false;
        };

        let started = Instant::now();
        let result = self.retry.run(|| listener.on_event(&event)).await;
        metrics::histogram!("outbox_dispatch_duration_seconds",
            "listener" => publication.listener_id.clone())
        .record(started.elapsed().as_secs_f64());

        match result {
            Ok(()) => {
                let update = event_publication::ActiveModel {
                    id: Set(publication.id.clone()),
                    completion_date: Set(Some(Utc::now().naive_utc())),
                    ..Default::default()
                };
                if let Err(e) = event_publication::Entity::update(update).exec(&self.db).await {
                    error!(
                        publication_id = %publication.id,
                        "Dispatched but failed to mark complete, parking: {}", e
                    );
                    self.park(&publication.id);
                    return false;
                }
                metrics::counter!("outbox_publications_dispatched_total",
                    "listener" => publication.listener_id.clone())
                .increment(1);
                debug!(
                    publication_id = %publication.id,
                    listener = %publication.listener_id,
                    event_type = %publication.event_type,
                    "Publication dispatched"
                );
                true
            }
            Err(e) => {
                metrics::counter!("outbox_dispatch_failures_total",
                    "listener" => publication.listener_id.clone())
                .increment(1);
                warn!(
                    publication_id = %publication.id,
                    listener = %publication.listener_id,
                    event_type = %publication.event_type,
                    "Dispatch failed after retries, parking until restart: {:#}", e
                );
                self.park(&publication.id);
                false
            }
        }
    }
}

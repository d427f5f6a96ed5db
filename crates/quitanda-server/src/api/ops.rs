//! Operational endpoints for the outbox

use actix_web::{Responder, Scope, get, web};
use serde::Serialize;

use crate::model::{AppState, Result, response};

/// Incomplete publication as exposed by the ops surface
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationView {
    pub id: String,
    pub listener_id: String,
    pub event_type: String,
    pub publication_date: String,
    pub parked: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboxView {
    pub backlog: u64,
    pub parked: usize,
    pub publications: Vec<PublicationView>,
}

#[get("/outbox")]
async fn outbox(data: web::Data<AppState>) -> impl Responder {
    let publications = match data.relay.incomplete_publications().await {
        Ok(rows) => rows,
        Err(e) => return response::http_error(&e),
    };

    let view = OutboxView {
        backlog: publications.len() as u64,
        parked: data.relay.parked_count(),
        publications: publications
            .into_iter()
            .map(|row| {
                let parked = data.relay.is_parked(&row.id);
                PublicationView {
                    id: row.id,
                    listener_id: row.listener_id,
                    event_type: row.event_type,
                    publication_date: row.publication_date.and_utc().to_rfc3339(),
                    parked,
                }
            })
            .collect(),
    };

    Result::<OutboxView>::http_success(view)
}

pub fn routes() -> Scope {
    web::scope("/ops").service(outbox)
}

//! HTTP server setup

use std::sync::Arc;

use actix_web::{App, HttpServer, dev::Server, middleware::Logger, web};

use crate::{
    api::{self, openapi::configure_swagger},
    model::AppState,
};

/// Creates and binds the HTTP server.
///
/// Routes: `/orders`, `/inventory`, `/ops`, `/health`, plus Swagger UI when
/// the `swagger` feature is enabled.
pub fn http_server(
    app_state: Arc<AppState>,
    address: String,
    port: u16,
) -> Result<Server, std::io::Error> {
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::from(app_state.clone()))
            .service(api::order::routes())
            .service(api::inventory::routes())
            .service(api::ops::routes())
            .service(api::health::routes())
            .configure(configure_swagger)
    })
    .bind((address, port))?
    .run())
}

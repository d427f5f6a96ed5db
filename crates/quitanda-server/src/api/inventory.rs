//! Inventory endpoints

use actix_web::{Responder, Scope, get, post, web};
use validator::Validate;

use quitanda_inventory::{AddBatchRequest, ProductStockView};

use crate::model::{AppState, Result, response};

#[post("/batches")]
async fn add_batch(data: web::Data<AppState>, body: web::Json<AddBatchRequest>) -> impl Responder {
    if let Err(e) = body.validate() {
        return response::http_validation_error(e.to_string());
    }
    let expires_at = match body.parsed_expires_at() {
        Ok(dt) => dt,
        Err(e) => return response::http_validation_error(e),
    };

    match data
        .inventory_service
        .add_batch(&body.product_id, body.quantity, expires_at)
        .await
    {
        Ok(batch_id) => Result::<String>::http_success(batch_id),
        Err(e) => response::http_error(&e),
    }
}

#[get("/{product_id}")]
async fn product_stock(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match data.inventory_service.product_stock(&path.into_inner()).await {
        Ok(stock) => Result::<ProductStockView>::http_success(stock),
        Err(e) => response::http_error(&e),
    }
}

pub fn routes() -> Scope {
    // batches before the catch-all product segment
    web::scope("/inventory")
        .service(add_batch)
        .service(product_stock)
}

//! Order endpoints

use actix_web::{Responder, Scope, get, post, web};
use serde::Deserialize;
use validator::Validate;

use quitanda_order::{OrderStatus, OrderView, PlaceOrderRequest};
use quitanda_persistence::Page;

use crate::model::{AppState, Result, response};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersParam {
    pub status: Option<String>,
    pub page_no: Option<u64>,
    pub page_size: Option<u64>,
}

#[post("")]
async fn place_order(
    data: web::Data<AppState>,
    body: web::Json<PlaceOrderRequest>,
) -> impl Responder {
    if let Err(e) = body.validate() {
        return response::http_validation_error(e.to_string());
    }

    match data
        .order_service
        .place(&body.product_id, body.quantity, body.price)
        .await
    {
        Ok(order_id) => match data.order_service.get(&order_id).await {
            Ok(Some(order)) => Result::<OrderView>::http_success(order),
            Ok(None) => Result::<String>::http_success(order_id),
            Err(e) => response::http_error(&e),
        },
        Err(e) => response::http_error(&e),
    }
}

#[get("/{id}")]
async fn get_order(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let order_id = path.into_inner();
    match data.order_service.get(&order_id).await {
        Ok(Some(order)) => Result::<OrderView>::http_success(order),
        Ok(None) => response::http_error(
            &quitanda_common::QuitandaError::OrderNotFound(order_id).into(),
        ),
        Err(e) => response::http_error(&e),
    }
}

#[get("")]
async fn list_orders(
    data: web::Data<AppState>,
    param: web::Query<ListOrdersParam>,
) -> impl Responder {
    let status = match param.status.as_deref() {
        None | Some("") => None,
        Some(s) => match s.parse::<OrderStatus>() {
            Ok(status) => Some(status),
            Err(e) => return response::http_validation_error(e),
        },
    };

    match data
        .order_service
        .list(status, param.page_no.unwrap_or(1), param.page_size.unwrap_or(0))
        .await
    {
        Ok(page) => Result::<Page<OrderView>>::http_success(page),
        Err(e) => response::http_error(&e),
    }
}

pub fn routes() -> Scope {
    web::scope("/orders")
        .service(place_order)
        .service(get_order)
        .service(list_orders)
}

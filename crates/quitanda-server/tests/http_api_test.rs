//! HTTP surface tests against an in-memory database

use std::sync::Arc;

use actix_web::{App, test, web};
use serde_json::{Value, json};

use quitanda_migration::{Migrator, MigratorTrait};
use quitanda_server::{api, model::AppState, model::Configuration, startup::assemble_state};

async fn test_state() -> Arc<AppState> {
    let config = config::Config::builder()
        .set_override("db.url", "sqlite::memory:")
        .unwrap()
        .build()
        .unwrap();
    let configuration = Configuration { config };

    let db = configuration
        .database_connection()
        .await
        .expect("in-memory database");
    Migrator::up(&db, None).await.expect("migrations");

    assemble_state(configuration, db)
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::from($state.clone()))
                .service(api::order::routes())
                .service(api::inventory::routes())
                .service(api::ops::routes())
                .service(api::health::routes()),
        )
        .await
    };
}

#[actix_web::test]
async fn place_order_returns_envelope_with_pending_order() {
    let state = test_state().await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/orders")
        .set_json(json!({"productId": "apple", "quantity": 3, "price": 150}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["status"], "PENDING");
    assert_eq!(body["data"]["totalAmount"], 450);
    assert!(body["data"]["id"].as_str().is_some());
}

#[actix_web::test]
async fn invalid_order_request_is_rejected_with_400() {
    let state = test_state().await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/orders")
        .set_json(json!({"productId": "apple", "quantity": 0, "price": 150}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 20002);
}

#[actix_web::test]
async fn missing_order_returns_404() {
    let state = test_state().await;
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri("/orders/no-such-order")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 20004);
}

#[actix_web::test]
async fn order_without_stock_is_cancelled_after_relay_pass() {
    let state = test_state().await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/orders")
        .set_json(json!({"productId": "apple", "quantity": 2, "price": 100}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();

    state.relay.run_until_idle().await.expect("relay drain");

    let req = test::TestRequest::get()
        .uri(&format!("/orders/{}", order_id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], "CANCELLED");
}

#[actix_web::test]
async fn stock_batch_and_product_stock_round_trip() {
    let state = test_state().await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/inventory/batches")
        .set_json(json!({
            "productId": "banana",
            "quantity": 10,
            "expiresAt": "2099-01-01T00:00:00Z"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], 0);

    let req = test::TestRequest::get().uri("/inventory/banana").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["available"], 10);
    assert_eq!(body["data"]["batches"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn unknown_product_stock_returns_404() {
    let state = test_state().await;
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/inventory/durian").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[actix_web::test]
async fn liveness_always_up() {
    let state = test_state().await;
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/health/liveness").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"], "ok");
}

#[actix_web::test]
async fn readiness_reports_outbox_backlog() {
    let state = test_state().await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/orders")
        .set_json(json!({"productId": "apple", "quantity": 1, "price": 100}))
        .to_request();
    let _: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get().uri("/health/readiness").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "UP");
    assert!(body["outbox"]["backlog"].as_u64().unwrap() >= 1);
}

#[actix_web::test]
async fn ops_outbox_lists_incomplete_publications() {
    let state = test_state().await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/orders")
        .set_json(json!({"productId": "apple", "quantity": 1, "price": 100}))
        .to_request();
    let _: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get().uri("/ops/outbox").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    // One OrderPlaced publication row, for the inventory listener
    assert_eq!(body["data"]["backlog"], 1);
    assert_eq!(body["data"]["parked"], 0);
    let publications = body["data"]["publications"].as_array().unwrap();
    assert_eq!(publications[0]["listenerId"], "inventory");
    assert_eq!(publications[0]["eventType"], "OrderPlaced");
}

//! End-to-end event flow: order placement through inventory reservation and
//! payment, including compensation and redelivery scenarios.

use quitanda_common::{INVENTORY_LISTENER, ORDER_LISTENER};
use quitanda_integration_tests::TestApp;
use quitanda_order::OrderStatus;

#[tokio::test]
async fn placed_order_completes_and_deducts_stock() {
    let app = TestApp::spawn().await;
    app.seed_batch("apple", 10, 30).await;

    let order_id = app.order_service.place("apple", 3, 150).await.unwrap();
    assert_eq!(app.order_status(&order_id).await, "PENDING");

    app.drain().await;

    assert_eq!(app.order_status(&order_id).await, "COMPLETED");
    assert_eq!(app.product_quantity("apple").await, 7);
    assert_eq!(app.incomplete_count().await, 0);
}

#[tokio::test]
async fn insufficient_stock_cancels_the_order() {
    let app = TestApp::spawn().await;
    app.seed_batch("apple", 1, 30).await;

    let order_id = app.order_service.place("apple", 2, 150).await.unwrap();
    app.drain().await;

    assert_eq!(app.order_status(&order_id).await, "CANCELLED");
    assert_eq!(app.product_quantity("apple").await, 1);
}

#[tokio::test]
async fn expired_stock_never_covers_an_order() {
    let app = TestApp::spawn().await;
    app.seed_batch("apple", 10, -1).await;

    let order_id = app.order_service.place("apple", 3, 150).await.unwrap();
    app.drain().await;

    assert_eq!(app.order_status(&order_id).await, "CANCELLED");
    assert_eq!(app.product_quantity("apple").await, 10);
}

#[tokio::test]
async fn deduction_runs_first_expiring_first_out_across_batches() {
    let app = TestApp::spawn().await;
    let expired = app.seed_batch("apple", 10, -1).await;
    let soon = app.seed_batch("apple", 10, 1).await;
    let later = app.seed_batch("apple", 10, 30).await;

    let order_id = app.order_service.place("apple", 11, 100).await.unwrap();
    app.drain().await;

    assert_eq!(app.order_status(&order_id).await, "COMPLETED");
    assert_eq!(app.batch_quantity(&expired).await, 10);
    assert_eq!(app.batch_quantity(&soon).await, 0);
    assert_eq!(app.batch_quantity(&later).await, 9);
    assert_eq!(app.product_quantity("apple").await, 19);
}

#[tokio::test]
async fn declined_payment_restocks_and_cancels() {
    let app = TestApp::spawn().await;
    app.seed_batch("apple", 10, 30).await;

    // 3333 * 3 hits the gateway's failure amount of 9999
    let order_id = app.order_service.place("apple", 3, 3333).await.unwrap();
    app.drain().await;

    assert_eq!(app.order_status(&order_id).await, "CANCELLED");
    assert_eq!(app.product_quantity("apple").await, 10);
    assert_eq!(app.incomplete_count().await, 0);
}

#[tokio::test]
async fn configured_failure_amount_overrides_the_default() {
    let app = TestApp::spawn_with_failure_amount(500).await;
    app.seed_batch("apple", 10, 30).await;

    let declined = app.order_service.place("apple", 5, 100).await.unwrap();
    let completed = app.order_service.place("apple", 3, 3333).await.unwrap();
    app.drain().await;

    assert_eq!(app.order_status(&declined).await, "CANCELLED");
    assert_eq!(app.order_status(&completed).await, "COMPLETED");
}

#[tokio::test]
async fn redelivered_order_placed_event_deducts_only_once() {
    let app = TestApp::spawn().await;
    app.seed_batch("apple", 10, 30).await;

    let order_id = app.order_service.place("apple", 3, 150).await.unwrap();
    app.drain().await;
    assert_eq!(app.product_quantity("apple").await, 7);

    app.duplicate_publication(INVENTORY_LISTENER, "OrderPlaced")
        .await;
    app.drain().await;

    assert_eq!(app.product_quantity("apple").await, 7);
    assert_eq!(app.order_status(&order_id).await, "COMPLETED");
    assert_eq!(app.incomplete_count().await, 0);
}

#[tokio::test]
async fn restarted_relay_resubmits_incomplete_publications() {
    let app = TestApp::spawn().await;
    app.seed_batch("apple", 10, 30).await;

    let order_id = app.order_service.place("apple", 3, 150).await.unwrap();
    assert_eq!(app.incomplete_count().await, 1);

    // The first relay never ran; a fresh one picks the work up from the table.
    let relay = app.restarted_relay();
    relay.run_until_idle().await.unwrap();

    assert_eq!(app.order_status(&order_id).await, "COMPLETED");
    assert_eq!(app.incomplete_count().await, 0);
}

#[tokio::test]
async fn orphaned_publication_is_parked_and_stays_incomplete() {
    let app = TestApp::spawn().await;
    app.orphan_publication().await;

    app.drain().await;

    assert_eq!(app.relay.parked_count(), 1);
    assert_eq!(app.incomplete_count().await, 1);

    // Parked rows do not block later work.
    app.seed_batch("apple", 10, 30).await;
    let order_id = app.order_service.place("apple", 1, 100).await.unwrap();
    app.drain().await;
    assert_eq!(app.order_status(&order_id).await, "COMPLETED");
    assert_eq!(app.incomplete_count().await, 1);
}

#[tokio::test]
async fn order_listing_filters_and_paginates() {
    let app = TestApp::spawn().await;
    app.seed_batch("apple", 100, 30).await;

    for _ in 0..5 {
        app.order_service.place("apple", 1, 100).await.unwrap();
    }
    app.drain().await;
    // No stock for pears, these cancel
    app.order_service.place("pear", 1, 100).await.unwrap();
    app.drain().await;

    let all = app.order_service.list(None, 1, 0).await.unwrap();
    assert_eq!(all.total_count, 6);

    let completed = app
        .order_service
        .list(Some(OrderStatus::Completed), 1, 0)
        .await
        .unwrap();
    assert_eq!(completed.total_count, 5);

    let cancelled = app
        .order_service
        .list(Some(OrderStatus::Cancelled), 1, 0)
        .await
        .unwrap();
    assert_eq!(cancelled.total_count, 1);

    let page = app
        .order_service
        .list(Some(OrderStatus::Completed), 2, 2)
        .await
        .unwrap();
    assert_eq!(page.page_items.len(), 2);
    assert_eq!(page.pages_available, 3);
}

#[tokio::test]
async fn listing_tolerates_extreme_page_numbers() {
    let app = TestApp::spawn().await;
    app.seed_batch("apple", 10, 30).await;
    app.order_service.place("apple", 1, 100).await.unwrap();
    app.drain().await;

    let page = app.order_service.list(None, u64::MAX, 200).await.unwrap();
    assert_eq!(page.total_count, 1);
    assert!(page.page_items.is_empty());
}

#[tokio::test]
async fn payment_completed_has_no_consumer_and_leaves_no_backlog() {
    let app = TestApp::spawn().await;
    app.seed_batch("apple", 10, 30).await;

    app.order_service.place("apple", 2, 100).await.unwrap();
    app.drain().await;

    assert_eq!(app.incomplete_count().await, 0);
    assert_eq!(app.relay.parked_count(), 0);
}

#[tokio::test]
async fn listener_ids_are_stable() {
    assert_eq!(ORDER_LISTENER, "order");
    assert_eq!(INVENTORY_LISTENER, "inventory");
}

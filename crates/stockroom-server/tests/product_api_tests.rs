//! HTTP tests for product CRUD, sales orders and health

use axum::http::StatusCode;
use serde_json::json;

mod common;

use common::TestApp;

async fn create_widget(app: &TestApp) {
    let (status, _) = app
        .post_json(
            "/api/v1/products",
            json!({ "pid": "A1", "name": "Widget", "quantity": 5, "price": 9.99 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_route() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/v1/nothing-here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_create_and_get_product() {
    let app = TestApp::new();
    create_widget(&app).await;

    let (status, body) = app.get("/api/v1/products/A1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Widget");
    assert_eq!(body["data"]["quantity"], 5);
}

#[tokio::test]
async fn test_create_duplicate_product() {
    let app = TestApp::new();
    create_widget(&app).await;

    let (status, body) = app
        .post_json("/api/v1/products", json!({ "pid": "A1", "name": "Other" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Product with this SKU already exists.");
    assert_eq!(app.store.product_count().await, 1);
}

#[tokio::test]
async fn test_create_product_with_blank_name() {
    let app = TestApp::new();
    let (status, body) = app
        .post_json("/api/v1/products", json!({ "pid": "A1", "name": " " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_get_missing_product() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/v1/products/Z9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");
}

#[tokio::test]
async fn test_update_product() {
    let app = TestApp::new();
    create_widget(&app).await;

    let (status, body) = app
        .put_json("/api/v1/products/A1", json!({ "name": "Widget Pro", "price": 19.5 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Widget Pro");
    assert_eq!(body["data"]["price"], 19.5);
    assert_eq!(body["data"]["quantity"], 5);
}

#[tokio::test]
async fn test_update_quantity() {
    let app = TestApp::new();
    create_widget(&app).await;

    let (status, body) = app
        .put_json("/api/v1/products/A1/quantity", json!({ "quantity": 12 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["quantity"], 12);

    let (status, _) = app
        .put_json("/api/v1/products/Z9/quantity", json!({ "quantity": 1 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_product() {
    let app = TestApp::new();
    create_widget(&app).await;

    let (status, body) = app.delete("/api/v1/products/A1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Product deleted successfully");
    assert_eq!(body["data"]["product"]["pid"], "A1");

    let (status, _) = app.delete("/api/v1/products/A1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sales_orders() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json(
            "/api/v1/sales-orders",
            json!({
                "product_id": "A1",
                "product_name": "Widget",
                "quantity_sold": 2,
                "selling_price": 19.98
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["quantity_sold"], 2);
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["date"].is_string());

    let (status, body) = app
        .post_json(
            "/api/v1/sales-orders",
            json!({ "product_id": "A1", "quantity_sold": 0, "selling_price": 1.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app.get("/api/v1/sales-orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["product_id"], "A1");
}

//! Ordering microservice endpoint tests

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use pizza_assistant::PizzaVendor;
use pizza_assistant::api::{ApiState, router};
use pizza_assistant::vendor::DemoVendor;
use tower::ServiceExt;

mod common;
use common::{FailingVendor, RecordingVendor};

fn build_test_router(vendor: Arc<dyn PizzaVendor>) -> axum::Router {
    router(Arc::new(ApiState { vendor }))
}

async fn post_json(
    app: axum::Router,
    uri: &str,
    body: &str,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = build_test_router(Arc::new(DemoVendor::new()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_store_lookup_found() {
    let app = build_test_router(Arc::new(DemoVendor::new()));

    let (status, json) = post_json(app, "/store-lookup", r#"{"address":"10 Main St"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert!(json["storeId"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn test_store_lookup_no_store_is_business_failure() {
    let app = build_test_router(Arc::new(DemoVendor::new()));

    let (status, json) =
        post_json(app, "/store-lookup", r#"{"address":"Nowhere Lane"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "no nearby store found");
    assert!(json.get("storeId").is_none());
}

#[tokio::test]
async fn test_store_lookup_blank_address_rejected() {
    let app = build_test_router(Arc::new(DemoVendor::new()));

    let (status, json) = post_json(app, "/store-lookup", r#"{"address":"   "}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("address"));
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let app = build_test_router(Arc::new(DemoVendor::new()));

    let (status, json) = post_json(app, "/place-order", r#"{"address":"10 Main St"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_place_order_success() {
    let vendor = RecordingVendor::new();
    let app = build_test_router(vendor.clone());

    let (status, json) = post_json(
        app,
        "/place-order",
        r#"{"address":"10 Main St","pizzaType":"pepperoni","size":"large"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "order placed");

    let orders = vendor.accepted();
    assert_eq!(orders.len(), 1);
    assert_eq!(json["orderId"], orders[0].order_id.as_str());
    assert_eq!(orders[0].store_id, "30212");
    assert_eq!(orders[0].order.item_description, "pepperoni");
}

#[tokio::test]
async fn test_repeated_orders_get_distinct_ids() {
    let app = build_test_router(Arc::new(DemoVendor::new()));
    let body = r#"{"address":"10 Main St","pizzaType":"cheese","size":"medium"}"#;

    let (_, first) = post_json(app.clone(), "/place-order", body).await;
    let (_, second) = post_json(app, "/place-order", body).await;

    assert_eq!(first["success"], true);
    assert_eq!(second["success"], true);
    assert_ne!(first["orderId"], second["orderId"]);
}

#[tokio::test]
async fn test_place_order_without_store() {
    let vendor = RecordingVendor::new();
    let app = build_test_router(vendor.clone());

    let (status, json) = post_json(
        app,
        "/place-order",
        r#"{"address":"Main St","pizzaType":"cheese","size":"small"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "no nearby store found");
    assert!(vendor.accepted().is_empty());
}

#[tokio::test]
async fn test_place_order_vendor_rejection_is_500() {
    let app = build_test_router(Arc::new(DemoVendor::new()));

    let (status, json) = post_json(
        app,
        "/place-order",
        r#"{"address":"10 Main St","pizzaType":"cheese","size":"gigantic"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("gigantic"));
}

#[tokio::test]
async fn test_vendor_outage_is_500() {
    let app = build_test_router(Arc::new(FailingVendor));

    let (status, json) = post_json(app, "/store-lookup", r#"{"address":"10 Main St"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("vendor unreachable"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = build_test_router(Arc::new(DemoVendor::new()));

    let (status, _) = post_json(app, "/checkout", "{}").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

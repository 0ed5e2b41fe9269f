//! Store lookup and order placement endpoints

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};

use super::ApiState;
use crate::order::OrderRequest;
use crate::order::wire::{
    NO_STORE_ERROR, PlaceOrderBody, PlaceOrderReply, StoreLookupBody, StoreLookupReply,
};

/// Build order router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/store-lookup", post(store_lookup))
        .route("/place-order", post(place_order))
        .with_state(state)
}

/// Find the store serving an address
///
/// No store is a business outcome (200, `success:false`); vendor failures
/// are 500.
async fn store_lookup(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<StoreLookupBody>, JsonRejection>,
) -> Result<Json<StoreLookupReply>, OrderApiError> {
    let Json(body) = body.map_err(|e| OrderApiError::BadRequest(e.body_text()))?;
    let address = required("address", &body.address)?;

    let store = state.vendor.find_store(address).await.map_err(|e| {
        tracing::error!(error = %e, vendor = state.vendor.name(), "store lookup failed");
        OrderApiError::Vendor(e.to_string())
    })?;

    Ok(Json(match store {
        Some(store_id) => {
            tracing::info!(store_id, "store found");
            StoreLookupReply {
                success: true,
                store_id: Some(store_id),
                error: None,
            }
        }
        None => {
            tracing::info!(address, "no store for address");
            StoreLookupReply {
                success: false,
                store_id: None,
                error: Some(NO_STORE_ERROR.to_string()),
            }
        }
    }))
}

/// Look up the serving store and place the order there
async fn place_order(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<PlaceOrderBody>, JsonRejection>,
) -> Result<Json<PlaceOrderReply>, OrderApiError> {
    let Json(body) = body.map_err(|e| OrderApiError::BadRequest(e.body_text()))?;
    let order = OrderRequest::new(
        required("address", &body.address)?,
        required("pizzaType", &body.pizza_type)?,
        required("size", &body.size)?,
    );

    let vendor_error = |e: crate::Error| {
        tracing::error!(error = %e, vendor = state.vendor.name(), "order placement failed");
        OrderApiError::Vendor(e.to_string())
    };

    let Some(store_id) = state
        .vendor
        .find_store(&order.delivery_address)
        .await
        .map_err(vendor_error)?
    else {
        return Ok(Json(PlaceOrderReply {
            success: false,
            error: Some(NO_STORE_ERROR.to_string()),
            ..PlaceOrderReply::default()
        }));
    };

    let order_id = state
        .vendor
        .place_order(&store_id, &order)
        .await
        .map_err(vendor_error)?;

    tracing::info!(order_id, store_id, "order placed");
    Ok(Json(PlaceOrderReply {
        success: true,
        message: Some("order placed".to_string()),
        order_id: Some(order_id),
        error: None,
    }))
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, OrderApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(OrderApiError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(value)
}

/// Order API errors
#[derive(Debug)]
pub enum OrderApiError {
    BadRequest(String),
    Vendor(String),
}

impl IntoResponse for OrderApiError {
    fn into_response(self) -> Response {
        #[derive(serde::Serialize)]
        struct ErrorResponse {
            success: bool,
            error: String,
        }

        let (status, error) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Vendor(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                error,
            }),
        )
            .into_response()
    }
}

//! Order gateway client
//!
//! Transport errors, error statuses and undecodable bodies are logged and
//! folded into unsuccessful results; nothing propagates to the caller.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::wire::{PlaceOrderBody, PlaceOrderReply, StoreLookupBody, StoreLookupReply};
use super::{OrderRequest, OrderResult, StoreLookupResult};
use crate::config::Config;
use crate::{Error, Result};

/// Access to the ordering microservice
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Find a store delivering to `address`
    async fn lookup_store(&self, address: &str) -> StoreLookupResult;

    /// Submit a complete order
    async fn place_order(&self, order: &OrderRequest) -> OrderResult;
}

/// HTTP client for the ordering microservice
#[derive(Clone)]
pub struct HttpOrderGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOrderGateway {
    /// Create a gateway client from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.http_client()?, &config.order.gateway_url))
    }

    /// Create a gateway client with an explicit HTTP client
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// POST a JSON body and decode the JSON reply, whatever the status
    async fn post<B, R>(&self, path: &str, body: &B) -> Result<(StatusCode, R)>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        match serde_json::from_slice(&bytes) {
            Ok(reply) => Ok((status, reply)),
            Err(e) if status.is_success() => Err(e.into()),
            Err(_) => Err(Error::Order(format!(
                "{path} returned {status}: {}",
                String::from_utf8_lossy(&bytes)
            ))),
        }
    }
}

#[async_trait]
impl OrderGateway for HttpOrderGateway {
    async fn lookup_store(&self, address: &str) -> StoreLookupResult {
        let body = StoreLookupBody {
            address: address.to_string(),
        };

        match self.post::<_, StoreLookupReply>("/store-lookup", &body).await {
            Ok((status, reply)) => {
                let store_id = reply.store_id.filter(|id| !id.trim().is_empty());
                match store_id {
                    Some(id) if reply.success && status.is_success() => {
                        tracing::info!(store_id = %id, "store found");
                        StoreLookupResult::found(id)
                    }
                    _ => {
                        let message = reply
                            .error
                            .unwrap_or_else(|| "no store id in reply".to_string());
                        tracing::warn!(
                            status = %status,
                            error = %message,
                            "store lookup unsuccessful"
                        );
                        StoreLookupResult::failed(message)
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "store lookup request failed");
                StoreLookupResult::failed(e.to_string())
            }
        }
    }

    async fn place_order(&self, order: &OrderRequest) -> OrderResult {
        let body = PlaceOrderBody {
            address: order.delivery_address.clone(),
            pizza_type: order.item_description.clone(),
            size: order.size.clone(),
        };

        match self.post::<_, PlaceOrderReply>("/place-order", &body).await {
            Ok((status, reply)) => {
                let order_id = reply.order_id.filter(|id| !id.trim().is_empty());
                match order_id {
                    Some(id) if reply.success && status.is_success() => {
                        tracing::info!(order_id = %id, "order placed");
                        OrderResult::placed(id)
                    }
                    _ => {
                        let message = reply
                            .error
                            .unwrap_or_else(|| "no order id in reply".to_string());
                        tracing::warn!(
                            status = %status,
                            error = %message,
                            "order placement unsuccessful"
                        );
                        OrderResult::failed(message)
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "place order request failed");
                OrderResult::failed(e.to_string())
            }
        }
    }
}

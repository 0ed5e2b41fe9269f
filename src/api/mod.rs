//! HTTP API of the ordering microservice
//!
//! Stateless bridge between the assistant and a [`PizzaVendor`]:
//! `POST /store-lookup`, `POST /place-order`, `GET /health`.

pub mod health;
pub mod orders;

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::vendor::PizzaVendor;
use crate::{Error, Result};

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub vendor: Arc<dyn PizzaVendor>,
}

/// Build the full service router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(orders::router(state))
        .merge(health::router())
        .layer(TraceLayer::new_for_http())
}

/// Ordering microservice
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    /// Create a server for a vendor
    #[must_use]
    pub fn new(vendor: Arc<dyn PizzaVendor>, port: u16) -> Self {
        Self {
            state: Arc::new(ApiState { vendor }),
            port,
        }
    }

    /// Run until Ctrl-C
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Config(format!("failed to bind ordering service: {e}")))?;

        self.run_on(listener, shutdown_signal()).await
    }

    /// Run on an already bound listener until `shutdown` resolves
    ///
    /// # Errors
    ///
    /// Returns error if the server fails while running
    pub async fn run_on(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let local = listener.local_addr()?;
        tracing::info!(
            addr = %local,
            vendor = self.state.vendor.name(),
            "ordering service listening"
        );

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| Error::Config(format!("ordering service error: {e}")))?;

        tracing::info!("ordering service stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

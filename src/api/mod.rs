//! HTTP API server for the attribute gateway

pub mod attributes;
mod auth;
pub mod health;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::attributes::AttributeWriter;

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub writer: AttributeWriter,
    /// Accepted API keys; empty allows every key
    pub api_keys: Vec<String>,
}

/// Configuration for building an API server
pub struct ApiServerBuilder {
    writer: AttributeWriter,
    api_keys: Vec<String>,
    port: u16,
}

impl ApiServerBuilder {
    /// Create a new API server builder
    #[must_use]
    pub const fn new(writer: AttributeWriter, port: u16) -> Self {
        Self {
            writer,
            api_keys: Vec::new(),
            port,
        }
    }

    /// Set the accepted API keys
    #[must_use]
    pub fn api_keys(mut self, keys: Vec<String>) -> Self {
        self.api_keys = keys;
        self
    }

    /// Build the API server
    #[must_use]
    pub fn build(self) -> ApiServer {
        let state = Arc::new(ApiState {
            writer: self.writer,
            api_keys: self.api_keys,
        });

        ApiServer {
            state,
            port: self.port,
        }
    }
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    /// Build the router with all routes
    pub fn router(&self) -> Router {
        let router = Router::new()
            .merge(attributes::router(self.state.clone()))
            .merge(health::router());

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        router.layer(cors).layer(TraceLayer::new_for_http())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        if self.state.api_keys.is_empty() {
            tracing::warn!("no API keys configured - accepting any key");
        }

        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Server(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| crate::Error::Server(format!("API server error: {e}")))?;

        Ok(())
    }

    /// Run the API server in a background task
    #[must_use]
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}

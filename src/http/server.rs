//! HTTP server hosting a router.
//!
//! # Responsibilities
//! - Mount a frozen router as the service's only handler
//! - Wire up middleware (tracing, request ID, timeout)
//! - Serve until the shutdown future resolves

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ConfigError, ServerConfig};
use crate::routing::Router;

/// Errors from starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// HTTP server for a [`Router`].
pub struct HttpServer {
    app: axum::Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Freeze `router` and build the middleware stack around it.
    pub fn new(router: Router, config: ServerConfig) -> Self {
        let app = Self::build_app(router, &config);
        Self { app, config }
    }

    #[allow(deprecated)]
    fn build_app(router: Router, config: &ServerConfig) -> axum::Router {
        axum::Router::new()
            .fallback_service(router.into_service())
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Bind the configured listener address.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let address = &self.config.listener.bind_address;
        TcpListener::bind(address)
            .await
            .map_err(|source| ServerError::Bind {
                address: address.clone(),
                source,
            })
    }

    /// Serve on `listener` until Ctrl+C.
    pub async fn run(self, listener: TcpListener) -> Result<(), ServerError> {
        self.run_until(listener, shutdown_signal()).await
    }

    /// Serve on `listener` until `shutdown` resolves, then drain.
    pub async fn run_until<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Wait for Ctrl+C.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(err) => {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}

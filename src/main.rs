//! Demo server for the segment router.
//!
//! Registers a handful of routes and serves them with the configured
//! listener, logging and metrics settings.

use std::path::PathBuf;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Json,
};
use clap::Parser;
use serde::Serialize;

use segment_router::config::{load_config, validate_config, ConfigError, ServerConfig};
use segment_router::observability::{logging, metrics};
use segment_router::{path_params, HttpServer, Router};

#[derive(Parser)]
#[command(name = "segment-router")]
#[command(about = "Serve a demo route table through the segment router", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[derive(Serialize)]
struct RouteSummary {
    method: String,
    pattern: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability);
    tracing::info!("segment-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(err) = metrics::init_metrics(addr) {
                    tracing::error!(error = %err, "Failed to install metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let router = demo_router();
    tracing::debug!(tree = %router.describe(), "Route table built");

    let server = HttpServer::new(router, config);
    let listener = server.bind().await?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn demo_router() -> Router {
    let mut router = Router::new();
    router
        .get("/", |_req: Request<Body>| async { "You called the root endpoint." })
        .get("/items", |_req: Request<Body>| async { "I am /items" })
        .get("/items/:itemID", |req: Request<Body>| async move {
            Json(path_params(&req).as_map().clone())
        })
        .post("/items", |_req: Request<Body>| async {
            (StatusCode::CREATED, "created")
        })
        .get("/users/:userID/edit/:status", |req: Request<Body>| async move {
            Json(path_params(&req).as_map().clone())
        });

    let summary: Vec<RouteSummary> = router
        .routes()
        .iter()
        .map(|route| RouteSummary {
            method: route.method().to_string(),
            pattern: route.pattern().to_string(),
        })
        .collect();
    let summary = std::sync::Arc::new(summary);
    router.get("/routes", move |_req: Request<Body>| {
        let summary = summary.clone();
        async move { Json(serde_json::to_value(&*summary).unwrap_or_default()) }
    });

    router
}

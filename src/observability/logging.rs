//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` takes precedence over the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Default filter directive for `level`.
pub fn default_filter(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    format!("segment_router={level},tower_http={level}")
}

/// Install the global tracing subscriber.
///
/// Call once, from the binary, before any router is built.
pub fn init_logging(config: &ObservabilityConfig) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(&config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

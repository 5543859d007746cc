//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_dispatch_total` (counter): dispatched requests by `outcome`
//!   (`matched` or `not_found`)

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const DISPATCH_TOTAL: &str = "router_dispatch_total";

/// How a dispatched request was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Matched,
    NotFound,
}

impl DispatchOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            DispatchOutcome::Matched => "matched",
            DispatchOutcome::NotFound => "not_found",
        }
    }
}

/// Count one dispatch.
pub fn record_dispatch(outcome: DispatchOutcome) {
    metrics::counter!(DISPATCH_TOTAL, "outcome" => outcome.as_str()).increment(1);
}

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registration and dispatch produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (dispatch counters)
//!
//! Consumers:
//!     → stdout via tracing-subscriber
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - The library only emits events; the binary installs subscribers
//! - Metrics are cheap no-ops until a recorder is installed

pub mod logging;
pub mod metrics;

//! HTTP integration subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum::serve, tracing, request id, timeout layers)
//!     → service.rs (RouterService: tower::Service over the frozen Router)
//!     → routing::Router::dispatch
//!     → handler.rs (registered Handler or NotFound)
//!     → Send response to client
//! ```

pub mod handler;
pub mod server;
pub mod service;

pub use handler::{Handler, HandlerRef, NotFound, NOT_FOUND_BODY};
pub use server::{HttpServer, ServerError};
pub use service::RouterService;

//! Error types for route registration and lookup.

use axum::http::Method;
use thiserror::Error;

/// Errors produced by the routing subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The exact (method, pattern) pair already has a handler.
    #[error("path already exists: {method} {pattern}")]
    Duplicate { method: Method, pattern: String },

    /// No endpoint matched the request method and path.
    ///
    /// Dispatch turns this into the not-found handler; it never reaches
    /// the caller of `serve_http`.
    #[error("route not found")]
    NotFound,

    /// Registration pattern does not begin with `/`.
    #[error("invalid route pattern {pattern:?}: must begin with '/'")]
    InvalidPattern { pattern: String },
}

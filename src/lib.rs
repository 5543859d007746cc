//! Segment-trie HTTP request router.
//!
//! Routes are registered per (method, pattern) where a pattern segment of
//! the form `:name` captures one path component. A populated router is
//! frozen into a `tower::Service` and mounted into `axum`.

pub mod config;
pub mod http;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use http::{Handler, HandlerRef, HttpServer, NotFound, RouterService};
pub use routing::{path_params, try_path_params, PathParams, Route, RouteError, Router};

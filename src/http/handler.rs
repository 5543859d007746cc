//! The handler capability consumed by the router.
//!
//! # Responsibilities
//! - Define what the router can invoke for a matched route
//! - Adapt plain async closures into handlers
//! - Provide the default not-found responder
//!
//! # Design Decisions
//! - Handlers are shared behind `Arc<dyn Handler>` so lookups hand out clones
//! - Handler futures are `'static` and own the request
//! - The not-found responder is a stateless value, not process-wide state

use std::future::Future;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;

/// Body written by [`NotFound`].
pub const NOT_FOUND_BODY: &str = "Not Found.";

/// Something the router can invoke with a request to produce a response.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request<Body>) -> BoxFuture<'static, Response>;
}

/// Shared handle to a registered handler.
pub type HandlerRef = Arc<dyn Handler>;

impl<F, Fut, R> Handler for F
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn call(&self, req: Request<Body>) -> BoxFuture<'static, Response> {
        let fut = self(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// Default responder for requests no route matched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFound;

impl Handler for NotFound {
    fn call(&self, _req: Request<Body>) -> BoxFuture<'static, Response> {
        Box::pin(async { (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response() })
    }
}

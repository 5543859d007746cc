//! Mounting the router into the HTTP stack.

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{body::Body, http::Request, response::Response};
use futures_util::future::BoxFuture;
use tower::Service;

use crate::routing::Router;

/// A frozen [`Router`] usable as a `tower::Service`.
///
/// Cloning is cheap; every clone dispatches against the same trie. Because
/// the router sits behind an `Arc`, no routes can be added once it is
/// serving.
#[derive(Debug, Clone)]
pub struct RouterService {
    router: Arc<Router>,
}

impl RouterService {
    pub fn new(router: Router) -> Self {
        Self {
            router: Arc::new(router),
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }
}

impl Service<Request<Body>> for RouterService {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let response = self.router.dispatch(req);
        Box::pin(async move { Ok(response.await) })
    }
}

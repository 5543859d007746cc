//! Route registration and dispatch.
//!
//! # Responsibilities
//! - Own the segment trie and the flat route list
//! - Register handlers per (method, pattern)
//! - Resolve requests to a handler plus captured parameters
//! - Fall back to the not-found handler on a miss
//!
//! # Design Decisions
//! - Registration takes `&mut self`, dispatch takes `&self`
//! - Methods and patterns are used verbatim (no case or slash normalization)
//! - Wrong method and unknown path are the same outcome
//! - Dispatch never fails: a miss is answered by the not-found handler

use std::fmt;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
};
use futures_util::future::BoxFuture;

use crate::http::handler::{Handler, HandlerRef, NotFound};
use crate::http::service::RouterService;
use crate::observability::metrics::{self, DispatchOutcome};
use crate::routing::error::RouteError;
use crate::routing::params::PathParams;
use crate::routing::segment::{Endpoint, Match, Segment};

/// A successful registration, kept for enumeration.
#[derive(Clone)]
pub struct Route {
    method: Method,
    pattern: String,
    handler: HandlerRef,
}

impl Route {
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Pattern exactly as it was registered.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn handler(&self) -> &HandlerRef {
        &self.handler
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// HTTP request router backed by a segment trie.
///
/// Patterns are `/`-separated; a segment written as `:name` matches any
/// single non-empty path component and binds it to `name`. Literal
/// segments take precedence over a parameter at the same position.
///
/// ```
/// use axum::{body::Body, http::Request};
/// use segment_router::{path_params, Router};
///
/// let mut router = Router::new();
/// router.get("/items/:id", |req: Request<Body>| async move {
///     format!("item {}", path_params(&req).get("id").unwrap_or_default())
/// });
/// ```
pub struct Router {
    root: Option<Segment>,
    routes: Vec<Route>,
    not_found: HandlerRef,
}

impl Router {
    /// Create an empty router answering every request with [`NotFound`].
    pub fn new() -> Self {
        Self {
            root: None,
            routes: Vec::new(),
            not_found: Arc::new(NotFound),
        }
    }

    /// Register `handler` for `method` requests matching `pattern`.
    ///
    /// Fails with [`RouteError::Duplicate`] if the pair already has a
    /// handler; the existing one is kept.
    pub fn add_route<H: Handler>(
        &mut self,
        method: Method,
        pattern: &str,
        handler: H,
    ) -> Result<(), RouteError> {
        if !pattern.starts_with('/') {
            return Err(RouteError::InvalidPattern {
                pattern: pattern.to_string(),
            });
        }

        let handler: HandlerRef = Arc::new(handler);
        let endpoint = Endpoint {
            handler: handler.clone(),
            pattern: pattern.to_string(),
        };

        self.root
            .get_or_insert_with(Segment::root)
            .insert(pattern, method.clone(), endpoint)?;

        tracing::debug!(method = %method, pattern = %pattern, "Route registered");
        self.routes.push(Route {
            method,
            pattern: pattern.to_string(),
            handler,
        });
        Ok(())
    }

    /// Register a `GET` route. See [`Router::register`] for error handling.
    pub fn get<H: Handler>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.register(Method::GET, pattern, handler)
    }

    pub fn post<H: Handler>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.register(Method::POST, pattern, handler)
    }

    pub fn put<H: Handler>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.register(Method::PUT, pattern, handler)
    }

    pub fn patch<H: Handler>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.register(Method::PATCH, pattern, handler)
    }

    pub fn delete<H: Handler>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.register(Method::DELETE, pattern, handler)
    }

    pub fn head<H: Handler>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.register(Method::HEAD, pattern, handler)
    }

    pub fn options<H: Handler>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.register(Method::OPTIONS, pattern, handler)
    }

    /// Infallible registration used by the per-method helpers.
    ///
    /// A failed [`Router::add_route`] is logged at `warn` and otherwise
    /// discarded. Conflicts are configuration bugs that should surface
    /// while the application starts; use `add_route` to handle them.
    pub fn register<H: Handler>(&mut self, method: Method, pattern: &str, handler: H) -> &mut Self {
        if let Err(err) = self.add_route(method, pattern, handler) {
            tracing::warn!(error = %err, "Route registration ignored");
        }
        self
    }

    /// Replace the handler used when no route matches.
    pub fn not_found<H: Handler>(&mut self, handler: H) -> &mut Self {
        self.not_found = Arc::new(handler);
        self
    }

    /// Successful registrations in the order they were made.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// True until the first registration creates the trie.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Handler for `req` and the pattern it was registered under.
    ///
    /// Returns the not-found handler and an empty pattern when nothing
    /// matches.
    pub fn handler<B>(&self, req: &Request<B>) -> (HandlerRef, &str) {
        match self.lookup(req.method(), req.uri().path()) {
            Ok(found) => (found.endpoint.handler.clone(), found.endpoint.pattern.as_str()),
            Err(_) => (self.not_found.clone(), ""),
        }
    }

    /// Resolve `req` and start its handler.
    ///
    /// The request carries a [`PathParams`] extension readable with
    /// [`path_params`](crate::path_params) from inside the handler.
    pub fn dispatch(&self, mut req: Request<Body>) -> BoxFuture<'static, Response> {
        let (handler, params) = match self.lookup(req.method(), req.uri().path()) {
            Ok(found) => {
                tracing::trace!(
                    method = %req.method(),
                    path = %req.uri().path(),
                    pattern = %found.endpoint.pattern,
                    params = found.params.len(),
                    "Route matched"
                );
                metrics::record_dispatch(DispatchOutcome::Matched);
                (found.endpoint.handler.clone(), found.params)
            }
            Err(_) => {
                tracing::trace!(
                    method = %req.method(),
                    path = %req.uri().path(),
                    "No route matched"
                );
                metrics::record_dispatch(DispatchOutcome::NotFound);
                (self.not_found.clone(), PathParams::new())
            }
        };

        req.extensions_mut().insert(params);
        handler.call(req)
    }

    /// Dispatch `req` and wait for the response.
    pub async fn serve_http(&self, req: Request<Body>) -> Response {
        self.dispatch(req).await
    }

    /// Methods registered for the path `path` resolves to.
    ///
    /// Diagnostic only; dispatch still treats a wrong method as not found.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        self.root
            .as_ref()
            .map(|root| root.methods_at(path))
            .unwrap_or_default()
    }

    /// Indented dump of the trie, one node per line.
    pub fn describe(&self) -> String {
        self.root.as_ref().map(Segment::render).unwrap_or_default()
    }

    /// Freeze the router into a cloneable service for the HTTP stack.
    pub fn into_service(self) -> RouterService {
        RouterService::new(self)
    }

    fn lookup(&self, method: &Method, path: &str) -> Result<Match<'_>, RouteError> {
        self.root
            .as_ref()
            .ok_or(RouteError::NotFound)?
            .lookup(method, path)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("root", &self.root)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::params::path_params;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_string(res: Response) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn noop(_req: Request<Body>) -> std::future::Ready<StatusCode> {
        std::future::ready(StatusCode::OK)
    }

    #[test]
    fn test_add_route_records_routes() {
        let mut router = Router::new();
        assert!(router.is_empty());

        let cases = [
            (Method::GET, "/"),
            (Method::POST, "/"),
            (Method::PATCH, "/items"),
            (Method::DELETE, "/items/thing/man/bird/horse"),
            (Method::DELETE, "/items/thing/man/bird/cat"),
        ];

        for (idx, (method, pattern)) in cases.iter().enumerate() {
            router.add_route(method.clone(), pattern, noop).unwrap();

            assert_eq!(router.routes().len(), idx + 1);
            let route = &router.routes()[idx];
            assert_eq!(route.method(), method);
            assert_eq!(route.pattern(), *pattern);
        }
        assert!(!router.is_empty());
    }

    #[test]
    fn test_duplicate_leaves_route_count() {
        let mut router = Router::new();
        router.add_route(Method::GET, "/items", noop).unwrap();

        let err = router.add_route(Method::GET, "/items", noop).unwrap_err();
        assert!(matches!(err, RouteError::Duplicate { .. }));
        assert_eq!(err.to_string(), "path already exists: GET /items");
        assert_eq!(router.routes().len(), 1);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let mut router = Router::new();
        let err = router.add_route(Method::GET, "items", noop).unwrap_err();

        assert_eq!(err, RouteError::InvalidPattern { pattern: "items".into() });
        assert!(router.routes().is_empty());
        assert!(router.is_empty());
    }

    #[test]
    fn test_helpers_swallow_conflicts() {
        let mut router = Router::new();
        router
            .get("/items", noop)
            .get("/items", noop)
            .post("/items", noop)
            .put("/items/:id", noop)
            .patch("/items/:id", noop)
            .delete("/items/:id", noop)
            .head("/items", noop)
            .options("/items", noop);

        assert_eq!(router.routes().len(), 7);
    }

    #[test]
    fn test_handler_returns_pattern() {
        let mut router = Router::new();
        router.get("/", noop).get("/users/:userID", noop);

        let (_, pattern) = router.handler(&request(Method::GET, "http://example.com/"));
        assert_eq!(pattern, "/");

        let (_, pattern) = router.handler(&request(Method::GET, "/users/46"));
        assert_eq!(pattern, "/users/:userID");

        let (_, pattern) = router.handler(&request(Method::POST, "/users/46"));
        assert_eq!(pattern, "");
    }

    #[tokio::test]
    async fn test_handler_invocation() {
        let mut router = Router::new();
        router.get("/items", |_req: Request<Body>| async {
            (StatusCode::OK, "I am /items")
        });

        let req = request(Method::GET, "http://example.com/items");
        let (handler, pattern) = router.handler(&req);
        assert_eq!(pattern, "/items");

        let res = handler.call(req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_string(res).await, "I am /items");
    }

    #[tokio::test]
    async fn test_empty_router_not_found() {
        let router = Router::new();
        let (_, pattern) = router.handler(&request(Method::GET, "/"));
        assert_eq!(pattern, "");

        let res = router.serve_http(request(Method::GET, "/")).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(res).await, "Not Found.");
    }

    #[tokio::test]
    async fn test_serve_http_attaches_params() {
        let mut router = Router::new();
        router.get("/users/:userID/edit/:status", |req: Request<Body>| async move {
            let params = path_params(&req);
            format!(
                "{} {} {}",
                params.len(),
                params.get("userID").unwrap_or_default(),
                params.get("status").unwrap_or_default()
            )
        });

        let res = router
            .serve_http(request(Method::GET, "/users/46/edit/inactive"))
            .await;
        assert_eq!(body_string(res).await, "2 46 inactive");
    }

    #[tokio::test]
    async fn test_static_route_sees_empty_params() {
        let mut router = Router::new();
        router.get("/health", |req: Request<Body>| async move {
            path_params(&req).len().to_string()
        });

        let res = router.serve_http(request(Method::GET, "/health")).await;
        assert_eq!(body_string(res).await, "0");
    }

    #[tokio::test]
    async fn test_custom_not_found() {
        let mut router = Router::new();
        router.get("/items", noop).not_found(|_req: Request<Body>| async {
            (StatusCode::GONE, "nothing here").into_response()
        });

        let res = router.serve_http(request(Method::GET, "/people")).await;
        assert_eq!(res.status(), StatusCode::GONE);
        assert_eq!(body_string(res).await, "nothing here");
    }

    #[test]
    fn test_allowed_methods() {
        let mut router = Router::new();
        assert!(router.allowed_methods("/items").is_empty());

        router.get("/items", noop).post("/items", noop);
        assert_eq!(router.allowed_methods("/items"), vec![Method::GET, Method::POST]);
        assert!(router.allowed_methods("/items/1").is_empty());
    }

    #[test]
    fn test_describe() {
        let mut router = Router::new();
        assert_eq!(router.describe(), "");

        router.get("/items/:id", noop);
        assert_eq!(router.describe(), "/\n  /items\n    /:id [GET]\n");
    }
}

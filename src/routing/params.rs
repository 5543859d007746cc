//! Path parameters captured during dispatch.
//!
//! The router attaches a [`PathParams`] to every request it dispatches as
//! an `http` extension, the same side channel the access-control layer
//! uses for per-request context.

use std::collections::hash_map;
use std::collections::HashMap;

use axum::http::Request;

/// Parameter name to captured segment value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    inner: HashMap<String, String>,
}

impl PathParams {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: &str, value: &str) {
        self.inner.insert(name.to_string(), value.to_string());
    }

    /// Value bound to `name`, if that parameter was captured.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over `(name, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.inner
    }

    pub fn into_map(self) -> HashMap<String, String> {
        self.inner
    }
}

impl IntoIterator for PathParams {
    type Item = (String, String);
    type IntoIter = hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

/// Parameters captured for a request dispatched by a [`Router`](crate::Router).
///
/// Only call this from within a handler invoked by the router.
///
/// # Panics
///
/// Panics if the request was not dispatched through a router, since no
/// parameters were ever attached to it. Use [`try_path_params`] when the
/// request origin is not known.
pub fn path_params<B>(req: &Request<B>) -> &PathParams {
    match try_path_params(req) {
        Some(params) => params,
        None => panic!("path_params called on a request that was not dispatched by a Router"),
    }
}

/// Non-panicking variant of [`path_params`].
pub fn try_path_params<B>(req: &Request<B>) -> Option<&PathParams> {
    req.extensions().get::<PathParams>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_get_and_len() {
        let mut params = PathParams::new();
        params.insert("userID", "46");
        params.insert("status", "inactive");

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("userID"), Some("46"));
        assert_eq!(params.get("status"), Some("inactive"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn test_extension_roundtrip() {
        let mut params = PathParams::new();
        params.insert("id", "7");

        let mut req = Request::builder().uri("/items/7").body(Body::empty()).unwrap();
        assert!(try_path_params(&req).is_none());

        req.extensions_mut().insert(params.clone());
        assert_eq!(path_params(&req), &params);
    }

    #[test]
    #[should_panic(expected = "not dispatched by a Router")]
    fn test_path_params_outside_dispatch_panics() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let _ = path_params(&req);
    }
}

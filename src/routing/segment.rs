//! Segment trie used for path matching.
//!
//! # Responsibilities
//! - Split paths into `/`-prefixed segments
//! - Insert (method, pattern) endpoints, rejecting duplicates
//! - Resolve request paths, capturing parameter values
//!
//! # Design Decisions
//! - The root node stands for `/` itself
//! - Literal children always win over the parameter child
//! - One parameter child per node; the first registered name is kept
//! - Lookups take `&self` and never change the tree

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::{self, Write as _};

use axum::http::Method;

use crate::routing::error::RouteError;
use crate::http::handler::HandlerRef;
use crate::routing::params::PathParams;

/// Two-character prefix marking a parameter segment.
pub(crate) const PARAM_MARKER: &str = "/:";

/// A handler registered for one method at a node, plus the pattern it was
/// registered under.
#[derive(Clone)]
pub(crate) struct Endpoint {
    pub(crate) handler: HandlerRef,
    pub(crate) pattern: String,
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// Result of a successful lookup.
#[derive(Debug)]
pub(crate) struct Match<'a> {
    pub(crate) endpoint: &'a Endpoint,
    pub(crate) params: PathParams,
}

/// A trie node.
#[derive(Debug, Default)]
pub(crate) struct Segment {
    /// Literal text of this node, empty for parameter nodes.
    key: String,
    children: HashMap<String, Segment>,
    param: Option<Box<ParamChild>>,
    endpoints: HashMap<Method, Endpoint>,
}

#[derive(Debug)]
struct ParamChild {
    name: String,
    node: Segment,
}

impl Segment {
    /// Create the root node, which represents `/`.
    pub(crate) fn root() -> Self {
        Self::literal("/")
    }

    fn literal(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Self::default()
        }
    }

    /// Register `endpoint` for `method` at the node `pattern` leads to.
    pub(crate) fn insert(
        &mut self,
        pattern: &str,
        method: Method,
        endpoint: Endpoint,
    ) -> Result<(), RouteError> {
        let mut node = self;
        for segment in split_path(pattern) {
            node = node.descend_or_insert(segment);
        }

        match node.endpoints.entry(method) {
            Entry::Occupied(existing) => Err(RouteError::Duplicate {
                method: existing.key().clone(),
                pattern: pattern.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(endpoint);
                Ok(())
            }
        }
    }

    fn descend_or_insert(&mut self, segment: &str) -> &mut Segment {
        if !self.children.contains_key(segment) {
            if let Some(name) = param_name(segment) {
                let param = self.param.get_or_insert_with(|| {
                    Box::new(ParamChild {
                        name: name.to_string(),
                        node: Segment::default(),
                    })
                });
                return &mut param.node;
            }
        }

        self.children
            .entry(segment.to_string())
            .or_insert_with(|| Segment::literal(segment))
    }

    /// Resolve `path` for `method`.
    ///
    /// A path that matches but has no endpoint for `method` is reported as
    /// [`RouteError::NotFound`] as well.
    pub(crate) fn lookup(&self, method: &Method, path: &str) -> Result<Match<'_>, RouteError> {
        let mut params = PathParams::new();
        let node = self.find(path, &mut params).ok_or(RouteError::NotFound)?;
        let endpoint = node.endpoints.get(method).ok_or(RouteError::NotFound)?;

        Ok(Match { endpoint, params })
    }

    /// Methods registered at the node `path` resolves to.
    pub(crate) fn methods_at(&self, path: &str) -> Vec<Method> {
        let mut scratch = PathParams::new();
        let Some(node) = self.find(path, &mut scratch) else {
            return Vec::new();
        };

        let mut methods: Vec<Method> = node.endpoints.keys().cloned().collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods
    }

    fn find(&self, path: &str, params: &mut PathParams) -> Option<&Segment> {
        if !path.starts_with('/') {
            return None;
        }

        let mut node = self;
        for segment in split_path(path) {
            node = match node.children.get(segment) {
                Some(child) => child,
                None => {
                    let param = node.param.as_deref()?;
                    let value = &segment[1..];
                    // An empty trailing component never binds a parameter.
                    if value.is_empty() {
                        return None;
                    }
                    params.insert(&param.name, value);
                    &param.node
                }
            };
        }

        Some(node)
    }

    /// Render the subtree rooted here, one node per line with the methods
    /// registered on it.
    pub(crate) fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&self.key, 0, &mut out);
        out
    }

    fn render_into(&self, label: &str, depth: usize, out: &mut String) {
        let _ = write!(out, "{:indent$}{label}", "", indent = depth * 2);
        if !self.endpoints.is_empty() {
            let mut methods: Vec<&str> = self.endpoints.keys().map(Method::as_str).collect();
            methods.sort_unstable();
            let _ = write!(out, " [{}]", methods.join(", "));
        }
        out.push('\n');

        let mut children: Vec<&Segment> = self.children.values().collect();
        children.sort_by(|a, b| a.key.cmp(&b.key));
        for child in children {
            child.render_into(&child.key, depth + 1, out);
        }
        if let Some(param) = &self.param {
            let label = format!("{PARAM_MARKER}{}", param.name);
            param.node.render_into(&label, depth + 1, out);
        }
    }
}

/// Name declared by a parameter segment such as `/:id`.
pub(crate) fn param_name(segment: &str) -> Option<&str> {
    segment
        .strip_prefix(PARAM_MARKER)
        .filter(|name| !name.is_empty())
}

/// Split a path into segments, each keeping its leading `/`.
///
/// `/` itself yields nothing since the root represents it.
pub(crate) fn split_path(path: &str) -> Segments<'_> {
    let rest = if path == "/" || !path.starts_with('/') { "" } else { path };
    Segments { rest }
}

/// Iterator returned by [`split_path`].
#[derive(Debug, Clone)]
pub(crate) struct Segments<'a> {
    /// Remaining input; empty or starting with `/`.
    rest: &'a str,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let end = self.rest[1..]
            .find('/')
            .map_or(self.rest.len(), |idx| idx + 1);
        let (segment, tail) = self.rest.split_at(end);
        self.rest = tail;
        Some(segment)
    }
}

//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     (method, pattern, handler)
//!     → router.rs (validate pattern, record Route)
//!     → segment.rs (split into segments, extend trie)
//!
//! Incoming Request (method, path)
//!     → router.rs (dispatch)
//!     → segment.rs (walk trie, literal before parameter)
//!     → Return: handler + PathParams, or the not-found handler
//! ```
//!
//! # Design Decisions
//! - Trie built once at startup, read-only while serving
//! - No regex or globs: a parameter matches exactly one segment
//! - Deterministic: same request always resolves to the same handler

pub mod error;
pub mod params;
pub mod router;
pub(crate) mod segment;

pub use error::RouteError;
pub use params::{path_params, try_path_params, PathParams};
pub use router::{Route, Router};

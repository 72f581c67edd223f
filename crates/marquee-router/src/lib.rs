//! Request routing for Marquee.
//!
//! Routes are declared as path patterns with static and `{name}` segments,
//! each carrying a [`MethodRouter`] that maps HTTP methods to operation ids.
//! Matching walks the route table and prefers candidates with more static
//! segments, so `/api/movies/favorites` always beats `/api/movies/{id}`.
//!
//! # Example
//!
//! ```rust
//! use marquee_router::{MethodRouter, Router};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.insert("/api/movies/search", MethodRouter::new().get("searchMovies"));
//! router.insert(
//!     "/api/movies/{id}/detail",
//!     MethodRouter::new().get("getMovieDetail"),
//! );
//!
//! let m = router.match_route(&Method::GET, "/api/movies/603/detail").unwrap();
//! assert_eq!(m.operation_id, "getMovieDetail");
//! assert_eq!(m.params.get("id"), Some("603"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod method_router;
mod params;
mod pattern;
mod router;

pub use method_router::MethodRouter;
pub use params::Params;
pub use pattern::RoutePattern;
pub use router::Router;

/// A matched route with its operation id and extracted parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// The operation id registered for the matched route and method.
    pub operation_id: &'a str,
    /// Extracted path parameters.
    pub params: Params,
}

impl<'a> RouteMatch<'a> {
    /// Creates a new route match.
    #[must_use]
    pub fn new(operation_id: &'a str, params: Params) -> Self {
        Self {
            operation_id,
            params,
        }
    }
}

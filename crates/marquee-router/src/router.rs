//! Route table and matching.

use crate::{MethodRouter, RouteMatch, RoutePattern};
use http::Method;

/// The route table.
///
/// Holds every registered pattern with its method router. Matching scans the
/// table and, among patterns that match the path, prefers the one with the
/// most static segments so literal routes always win over parameterized ones.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<(RoutePattern, MethodRouter)>,
}

impl Router {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pattern with its method router.
    pub fn insert(&mut self, pattern: &str, methods: MethodRouter) {
        self.routes.push((RoutePattern::parse(pattern), methods));
    }

    /// Matches a method and path against the route table.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .filter_map(|(pattern, methods)| {
                let params = pattern.match_path(path)?;
                let operation_id = methods.route(method)?;
                Some((pattern.static_count(), operation_id, params))
            })
            .max_by_key(|(static_count, _, _)| *static_count)
            .map(|(_, operation_id, params)| RouteMatch::new(operation_id, params))
    }
}

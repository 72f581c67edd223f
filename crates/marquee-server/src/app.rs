//! The application route table.
//!
//! Maps (method, path) to a compiled [`Pipeline`] via operation ids, the
//! same indirection the router itself uses. Unmatched requests get the
//! uniform 404 envelope.

use http::{Method, StatusCode};
use marquee_core::{RequestParts, Response, ResponseExt};
use marquee_middleware::Pipeline;
use marquee_router::{MethodRouter, Router};
use std::collections::HashMap;
use std::sync::Arc;

/// The route table: patterns to operation ids to pipelines.
#[derive(Default)]
pub struct App {
    router: Router,
    endpoints: HashMap<String, Arc<Pipeline>>,
}

impl App {
    /// Creates an empty app.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route: one method on one pattern, handled by `pipeline`.
    ///
    /// The `operation_id` names the route in logs and must be unique.
    pub fn register(
        &mut self,
        method: Method,
        pattern: &str,
        operation_id: &str,
        pipeline: Pipeline,
    ) {
        let methods = match method {
            Method::GET => MethodRouter::new().get(operation_id),
            Method::POST => MethodRouter::new().post(operation_id),
            Method::PATCH => MethodRouter::new().patch(operation_id),
            Method::DELETE => MethodRouter::new().delete(operation_id),
            other => {
                // The route table is built at startup from literal code;
                // an unroutable method there is a programming error.
                panic!("unsupported route method: {other}");
            }
        };

        self.router.insert(pattern, methods);
        self.endpoints
            .insert(operation_id.to_string(), Arc::new(pipeline));
    }

    /// Dispatches one buffered request to its pipeline.
    pub async fn dispatch(&self, parts: RequestParts) -> Response {
        let Some(route_match) = self
            .router
            .match_route(parts.method(), parts.uri().path())
        else {
            return Response::json_error(StatusCode::NOT_FOUND, "Not Found");
        };

        let Some(pipeline) = self.endpoints.get(route_match.operation_id) else {
            tracing::error!(
                operation_id = route_match.operation_id,
                "route matched but no pipeline is registered"
            );
            return Response::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
            );
        };

        tracing::debug!(
            operation_id = route_match.operation_id,
            method = %parts.method(),
            path = parts.uri().path(),
            "dispatching request"
        );
        pipeline
            .handle(Arc::new(parts), route_match.params)
            .await
    }
}

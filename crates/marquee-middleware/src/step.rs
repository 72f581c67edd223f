//! The pipeline step trait and handler type.

use crate::context::RequestContext;
use marquee_core::{MarqueeResult, RequestParts, Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed future, the return type of step and handler invocations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a step decided about the request.
#[derive(Debug)]
pub enum StepOutcome {
    /// The step finished its work; run the next step (or the handler).
    Continue,
    /// The step produced the final response; skip everything downstream.
    Respond(Response),
}

/// A composable unit of request processing run before the route handler.
///
/// Steps receive the buffered request and the mutable per-request context.
/// They enrich the context (validated payloads, resolved identity), produce
/// a short-circuit response, or fail, in which case the pipeline translates
/// the error and ends the request.
///
/// # Example
///
/// ```ignore
/// struct RequireJson;
///
/// impl Step for RequireJson {
///     fn name(&self) -> &'static str {
///         "require_json"
///     }
///
///     fn run<'a>(
///         &'a self,
///         req: &'a RequestParts,
///         _ctx: &'a mut RequestContext,
///     ) -> BoxFuture<'a, MarqueeResult<StepOutcome>> {
///         Box::pin(async move {
///             if req.header("content-type") == Some("application/json") {
///                 Ok(StepOutcome::Continue)
///             } else {
///                 Err(MarqueeError::validation("expected application/json"))
///             }
///         })
///     }
/// }
/// ```
pub trait Step: Send + Sync + 'static {
    /// Returns the unique name of this step, used in logs.
    fn name(&self) -> &'static str;

    /// Runs the step against the request.
    fn run<'a>(
        &'a self,
        req: &'a RequestParts,
        ctx: &'a mut RequestContext,
    ) -> BoxFuture<'a, MarqueeResult<StepOutcome>>;
}

/// The route handler invoked after every step continued.
///
/// Handlers take ownership of the context: they run last, and owning the
/// value keeps closure-based handlers free of higher-ranked lifetimes.
pub type Handler = Arc<
    dyn Fn(Arc<RequestParts>, RequestContext) -> BoxFuture<'static, MarqueeResult<Response>>
        + Send
        + Sync,
>;

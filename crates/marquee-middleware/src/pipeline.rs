//! The pipeline runner.
//!
//! A [`Pipeline`] is an ordered list of steps and a final handler, compiled
//! once per route and shared by every request that hits it. Per request it
//! builds a fresh context, runs the steps in declared order, short-circuits
//! on the first produced response, and feeds every failure (step, handler,
//! or panic) through one error-translation path.

use crate::context::RequestContext;
use crate::step::{Handler, Step, StepOutcome};
use futures_util::FutureExt;
use marquee_core::{MarqueeError, MarqueeResult, RequestParts, Response, ResponseExt};
use marquee_router::Params;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// A compiled route endpoint: steps in declared order plus the handler.
///
/// # Example
///
/// ```ignore
/// let pipeline = Pipeline::builder()
///     .step(Validate::new(spec))
///     .step(Identify::new(false, store))
///     .handler(move |req, ctx| Box::pin(list_comments(state.clone(), req, ctx)));
///
/// let response = pipeline.handle(req, params).await;
/// ```
pub struct Pipeline {
    steps: Vec<Arc<dyn Step>>,
    handler: Handler,
}

impl Pipeline {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Handles one request, always producing exactly one response.
    ///
    /// This is the pipeline boundary of the error-handling design: no
    /// failure raised below here escapes to the caller.
    pub async fn handle(&self, req: Arc<RequestParts>, params: Params) -> Response {
        let ctx = RequestContext::new(params);

        match AssertUnwindSafe(self.run(&req, ctx)).catch_unwind().await {
            Ok(Ok(response)) => response,
            Ok(Err(error)) => translate_error(&error),
            Err(panic) => {
                let detail = panic_message(panic.as_ref());
                tracing::error!(panic = %detail, "request handler panicked");
                Response::json_error(
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                )
            }
        }
    }

    async fn run(
        &self,
        req: &Arc<RequestParts>,
        mut ctx: RequestContext,
    ) -> MarqueeResult<Response> {
        for step in &self.steps {
            tracing::trace!(step = step.name(), "running pipeline step");
            match step.run(req, &mut ctx).await? {
                StepOutcome::Continue => {}
                StepOutcome::Respond(response) => {
                    tracing::debug!(step = step.name(), "pipeline short-circuited");
                    return Ok(response);
                }
            }
        }

        (self.handler)(Arc::clone(req), ctx).await
    }

    /// Returns the names of the configured steps in order.
    #[must_use]
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }
}

/// The single error-translation path.
///
/// Client errors surface their message verbatim; anything 500 and above
/// collapses to a generic body after the raw failure is logged.
fn translate_error(error: &MarqueeError) -> Response {
    let status = error.status_code();

    if status.is_server_error() {
        tracing::error!(error = ?error, status = status.as_u16(), "request failed");
    } else {
        tracing::debug!(error = %error, status = status.as_u16(), "request rejected");
    }

    Response::json_error(status, &error.client_message())
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

/// Builder for a [`Pipeline`].
pub struct PipelineBuilder {
    steps: Vec<Arc<dyn Step>>,
}

impl PipelineBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Appends a step. Steps run in the order they were added.
    #[must_use]
    pub fn step<S: Step>(mut self, step: S) -> Self {
        self.steps.push(Arc::new(step));
        self
    }

    /// Sets the handler and finishes the pipeline.
    #[must_use]
    pub fn handler<F>(self, handler: F) -> Pipeline
    where
        F: Fn(
                Arc<RequestParts>,
                RequestContext,
            ) -> crate::step::BoxFuture<'static, MarqueeResult<Response>>
            + Send
            + Sync
            + 'static,
    {
        Pipeline {
            steps: self.steps,
            handler: Arc::new(handler),
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

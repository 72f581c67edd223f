//! Per-request context.
//!
//! The [`RequestContext`] is created fresh by the pipeline for each request
//! and destroyed when the response is returned. Steps enrich it; the handler
//! consumes it.

use marquee_core::{GuestIdentity, MarqueeError, MarqueeResult};
use marquee_router::Params;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// The guest resolved for this request.
#[derive(Debug, Clone)]
pub struct ResolvedGuest {
    /// The identity attached to the request.
    pub guest: GuestIdentity,
    /// True when the identity stage provisioned this guest during the
    /// current request. Handlers set the credential cookie exactly then.
    pub fresh: bool,
}

/// The three validated payloads, committed to the context as one unit.
///
/// The validation stage builds all three before attaching any of them, so a
/// failing source never leaves partial state behind.
#[derive(Debug, Default, Clone)]
pub struct ValidatedPayloads {
    /// Validated (and coerced) query parameters.
    pub query: Map<String, Value>,
    /// Validated request body.
    pub body: Map<String, Value>,
    /// Validated (and coerced) path parameters.
    pub params: Map<String, Value>,
}

/// State owned by a single request's trip through the pipeline.
///
/// Invariants: [`RequestContext::validated`] is `None` until the validation
/// stage ran to completion without error; [`RequestContext::guest`] is
/// `None` until the identity stage ran.
#[derive(Debug)]
pub struct RequestContext {
    params: Params,
    validated: Option<ValidatedPayloads>,
    guest: Option<ResolvedGuest>,
}

impl RequestContext {
    /// Creates a context seeded with the route's raw path parameters.
    #[must_use]
    pub fn new(params: Params) -> Self {
        Self {
            params,
            validated: None,
            guest: None,
        }
    }

    /// Returns the raw path parameters extracted by the router.
    #[must_use]
    pub fn route_params(&self) -> &Params {
        &self.params
    }

    /// Attaches the validated payloads.
    ///
    /// This should only be called by the validation stage, once, after all
    /// three sources passed.
    pub fn commit_validated(&mut self, payloads: ValidatedPayloads) {
        self.validated = Some(payloads);
    }

    /// Returns the validated payloads, if validation has run.
    #[must_use]
    pub fn validated(&self) -> Option<&ValidatedPayloads> {
        self.validated.as_ref()
    }

    /// Deserializes the validated query payload into a typed value.
    ///
    /// Fails as an internal error when validation has not run: a handler
    /// on a route without a validation step has no validated payloads.
    pub fn validated_query<T: DeserializeOwned>(&self) -> MarqueeResult<T> {
        self.typed(|v| &v.query, "query")
    }

    /// Deserializes the validated body payload into a typed value.
    pub fn validated_body<T: DeserializeOwned>(&self) -> MarqueeResult<T> {
        self.typed(|v| &v.body, "body")
    }

    /// Deserializes the validated path-parameter payload into a typed value.
    pub fn validated_params<T: DeserializeOwned>(&self) -> MarqueeResult<T> {
        self.typed(|v| &v.params, "params")
    }

    fn typed<T: DeserializeOwned>(
        &self,
        select: impl Fn(&ValidatedPayloads) -> &Map<String, Value>,
        source: &'static str,
    ) -> MarqueeResult<T> {
        let payloads = self.validated.as_ref().ok_or_else(|| {
            MarqueeError::unexpected(anyhow::anyhow!(
                "validated {source} requested but the validation stage never ran"
            ))
        })?;

        serde_json::from_value(Value::Object(select(payloads).clone())).map_err(Into::into)
    }

    /// Attaches the resolved guest.
    ///
    /// This should only be called by the identity stage.
    pub fn set_guest(&mut self, guest: ResolvedGuest) {
        self.guest = Some(guest);
    }

    /// Returns the resolved guest, if the identity stage has run.
    #[must_use]
    pub fn guest(&self) -> Option<&ResolvedGuest> {
        self.guest.as_ref()
    }

    /// Returns the resolved guest or an internal error.
    ///
    /// For handlers on routes that declare an identity step: the guest is
    /// always present there, so its absence is a wiring defect, not a
    /// client error.
    pub fn require_guest(&self) -> MarqueeResult<&ResolvedGuest> {
        self.guest.as_ref().ok_or_else(|| {
            MarqueeError::unexpected(anyhow::anyhow!(
                "guest requested but the identity stage never ran"
            ))
        })
    }
}

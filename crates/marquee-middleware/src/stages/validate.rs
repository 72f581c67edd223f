//! Payload validation stage.
//!
//! Validates the three payload sources independently, in a fixed order:
//! query parameters, then the body, then path parameters. A source with no
//! declared schema must be a strict empty object, so endpoints that declare
//! no input reject smuggled fields.
//!
//! All three validated payloads are committed to the context in one
//! operation after every source passed; a failure leaves the context
//! untouched.

use crate::context::{RequestContext, ValidatedPayloads};
use crate::schema::{join_messages, json_type_name, Schema, Violation};
use crate::step::{BoxFuture, Step, StepOutcome};
use marquee_core::{MarqueeError, MarqueeResult, RequestParts};
use marquee_extract::query_pairs;
use serde_json::{Map, Value};

/// Declared shapes for a route's payload sources.
///
/// Every source is optional; an undeclared source defaults to "must carry
/// no fields".
#[derive(Debug, Default, Clone)]
pub struct ValidationSpec {
    query: Option<Schema>,
    body: Option<Schema>,
    params: Option<Schema>,
}

impl ValidationSpec {
    /// Creates a spec with no declared sources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the query-parameter schema.
    #[must_use]
    pub fn query(mut self, schema: Schema) -> Self {
        self.query = Some(schema);
        self
    }

    /// Declares the body schema.
    #[must_use]
    pub fn body(mut self, schema: Schema) -> Self {
        self.body = Some(schema);
        self
    }

    /// Declares the path-parameter schema.
    #[must_use]
    pub fn params(mut self, schema: Schema) -> Self {
        self.params = Some(schema);
        self
    }
}

/// The validation step.
#[derive(Debug, Clone)]
pub struct Validate {
    spec: ValidationSpec,
}

impl Validate {
    /// Creates a validation step for the given spec.
    #[must_use]
    pub fn new(spec: ValidationSpec) -> Self {
        Self { spec }
    }

    fn validate_source(
        schema: Option<&Schema>,
        payload: &Map<String, Value>,
    ) -> MarqueeResult<Map<String, Value>> {
        let strict_empty = Schema::object();
        schema
            .unwrap_or(&strict_empty)
            .validate(payload)
            .map_err(|violations| MarqueeError::validation(join_messages(&violations)))
    }

    fn query_payload(req: &RequestParts) -> MarqueeResult<Map<String, Value>> {
        let pairs = query_pairs(req.query_string().unwrap_or(""))
            .map_err(|e| MarqueeError::validation(e.to_string()))?;

        // Later occurrences of a repeated key win, like URLSearchParams
        // collapsed into an object.
        Ok(pairs
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect())
    }

    fn body_payload(req: &RequestParts) -> MarqueeResult<Map<String, Value>> {
        if req.body().is_empty() {
            return Ok(Map::new());
        }

        let value: Value = serde_json::from_slice(req.body())
            .map_err(|_| MarqueeError::validation("Invalid JSON in request body"))?;

        match value {
            Value::Object(map) => Ok(map),
            other => Err(MarqueeError::validation(
                Violation::InvalidType {
                    path: "input".to_string(),
                    expected: "object",
                    received: json_type_name(&other),
                }
                .message(),
            )),
        }
    }

    fn params_payload(ctx: &RequestContext) -> Map<String, Value> {
        ctx.route_params()
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }
}

impl Step for Validate {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn run<'a>(
        &'a self,
        req: &'a RequestParts,
        ctx: &'a mut RequestContext,
    ) -> BoxFuture<'a, MarqueeResult<StepOutcome>> {
        Box::pin(async move {
            let query = Self::validate_source(self.spec.query.as_ref(), &Self::query_payload(req)?)?;
            let body = Self::validate_source(self.spec.body.as_ref(), &Self::body_payload(req)?)?;
            let params =
                Self::validate_source(self.spec.params.as_ref(), &Self::params_payload(ctx))?;

            ctx.commit_validated(ValidatedPayloads {
                query,
                body,
                params,
            });
            Ok(StepOutcome::Continue)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSpec;
    use bytes::Bytes;
    use http::{HeaderMap, Method, Uri};
    use marquee_router::Params;
    use serde::Deserialize;

    fn request(uri: &'static str, body: &str) -> RequestParts {
        RequestParts::new(
            Method::POST,
            Uri::from_static(uri),
            HeaderMap::new(),
            Bytes::from(body.to_string()),
        )
    }

    fn search_spec() -> ValidationSpec {
        ValidationSpec::new().query(
            Schema::object()
                .field(FieldSpec::string("title").min_length(1).message("Title is required"))
                .field(FieldSpec::integer("page").range(1, 1000).optional().coercing()),
        )
    }

    fn comment_spec() -> ValidationSpec {
        ValidationSpec::new()
            .params(Schema::object().field(
                FieldSpec::integer("id").range(1, 2_147_483_647).coercing(),
            ))
            .body(
                Schema::object()
                    .field(FieldSpec::string("content").length(1, 1000))
                    .field(FieldSpec::integer("rating").range(1, 5)),
            )
    }

    async fn run(spec: ValidationSpec, req: &RequestParts, params: Params) -> (MarqueeResult<StepOutcome>, RequestContext) {
        let mut ctx = RequestContext::new(params);
        let result = Validate::new(spec).run(req, &mut ctx).await;
        (result, ctx)
    }

    #[tokio::test]
    async fn test_valid_query_is_typed_and_coerced() {
        #[derive(Deserialize)]
        struct Search {
            title: String,
            page: Option<i64>,
        }

        let req = request("/api/movies/search?title=Alien&page=2", "");
        let (result, ctx) = run(search_spec(), &req, Params::new()).await;

        assert!(matches!(result, Ok(StepOutcome::Continue)));
        let search: Search = ctx.validated_query().expect("typed");
        assert_eq!(search.title, "Alien");
        assert_eq!(search.page, Some(2));
    }

    #[tokio::test]
    async fn test_missing_title_fails_400() {
        let req = request("/api/movies/search?page=2", "");
        let (result, ctx) = run(search_spec(), &req, Params::new()).await;

        let err = result.expect_err("must fail");
        assert_eq!(err.status_code().as_u16(), 400);
        assert_eq!(err.client_message(), "Missing required field: 'title'");
        assert!(ctx.validated().is_none());
    }

    #[tokio::test]
    async fn test_invalid_json_body_fails_before_schema() {
        // The body schema would also reject this payload, but the JSON
        // parse failure must win.
        let req = request("/api/movies/550/comments", "{not json");
        let mut params = Params::new();
        params.push("id", "550");
        let (result, _ctx) = run(comment_spec(), &req, params).await;

        let err = result.expect_err("must fail");
        assert_eq!(err.status_code().as_u16(), 400);
        assert_eq!(err.client_message(), "Invalid JSON in request body");
    }

    #[tokio::test]
    async fn test_empty_body_is_an_empty_object() {
        let req = request("/api/movies/550/comments", "");
        let mut params = Params::new();
        params.push("id", "550");
        let (result, _ctx) = run(comment_spec(), &req, params).await;

        // {} fails the schema with missing fields, not a JSON error.
        let err = result.expect_err("must fail");
        assert_eq!(
            err.client_message(),
            "Missing required field: 'content'; Missing required field: 'rating'"
        );
    }

    #[tokio::test]
    async fn test_empty_content_cites_constraint() {
        let req = request("/api/movies/550/comments", r#"{"content":"","rating":3}"#);
        let mut params = Params::new();
        params.push("id", "550");
        let (result, _ctx) = run(comment_spec(), &req, params).await;

        let err = result.expect_err("must fail");
        assert!(err.client_message().contains("content"));
        assert!(err.client_message().contains("at least 1"));
    }

    #[tokio::test]
    async fn test_rating_out_of_range_cites_rating() {
        let req = request("/api/movies/550/comments", r#"{"content":"ok","rating":7}"#);
        let mut params = Params::new();
        params.push("id", "550");
        let (result, _ctx) = run(comment_spec(), &req, params).await;

        let err = result.expect_err("must fail");
        assert!(err.client_message().contains("rating"));
    }

    #[tokio::test]
    async fn test_zero_path_id_fails_before_handler() {
        let req = request("/api/movies/0/comments", r#"{"content":"ok","rating":3}"#);
        let mut params = Params::new();
        params.push("id", "0");
        let (result, ctx) = run(comment_spec(), &req, params).await;

        let err = result.expect_err("must fail");
        assert_eq!(err.status_code().as_u16(), 400);
        assert_eq!(err.client_message(), "id: must be at least 1");
        assert!(ctx.validated().is_none());
    }

    #[tokio::test]
    async fn test_undeclared_sources_must_be_empty() {
        // Spec declares nothing; a query key is field smuggling.
        let req = request("/api/movies/favorites?sneaky=1", "");
        let (result, _ctx) = run(ValidationSpec::new(), &req, Params::new()).await;

        let err = result.expect_err("must fail");
        assert_eq!(err.client_message(), "sneaky: unrecognized field");
    }

    #[tokio::test]
    async fn test_no_sources_no_problem() {
        let req = request("/api/movies/favorites", "");
        let (result, ctx) = run(ValidationSpec::new(), &req, Params::new()).await;

        assert!(matches!(result, Ok(StepOutcome::Continue)));
        let validated = ctx.validated().expect("committed");
        assert!(validated.query.is_empty());
        assert!(validated.body.is_empty());
        assert!(validated.params.is_empty());
    }

    #[tokio::test]
    async fn test_non_object_body_rejected() {
        let req = request("/api/movies/favorites", "[1,2,3]");
        let (result, _ctx) = run(ValidationSpec::new(), &req, Params::new()).await;

        let err = result.expect_err("must fail");
        assert_eq!(
            err.client_message(),
            "Invalid type for 'input': expected object, received array"
        );
    }

    #[tokio::test]
    async fn test_query_failure_aborts_before_body() {
        // Both query and body are invalid; only the query failure is
        // reported because sources validate in order.
        let req = request("/api/movies/search?bogus=1", "{not json");
        let (result, ctx) = run(search_spec(), &req, Params::new()).await;

        let err = result.expect_err("must fail");
        assert!(err.client_message().contains("title"));
        assert!(!err.client_message().contains("JSON"));
        assert!(ctx.validated().is_none());
    }
}

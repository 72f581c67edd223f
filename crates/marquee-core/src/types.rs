//! HTTP types used throughout the request pipeline.
//!
//! Request bodies are buffered before the pipeline runs, so steps and
//! handlers see a [`RequestParts`] value with the body already collected.

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode, Uri};
use http_body_util::Full;
use serde::Serialize;

/// The HTTP response type produced by handlers and the pipeline.
pub type Response = http::Response<Full<Bytes>>;

/// A buffered, read-only view of an incoming request.
///
/// The server collects the body to [`Bytes`] before the pipeline starts, so
/// the validation stage can parse it without touching the transport.
#[derive(Debug, Clone)]
pub struct RequestParts {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
}

impl RequestParts {
    /// Creates a request view from its components.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
        }
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the buffered request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the raw query string, if any.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns a header value as a string, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Extension trait for building JSON responses.
pub trait ResponseExt {
    /// Builds a JSON response with the given status and serialized body.
    fn json<T: Serialize>(status: StatusCode, body: &T) -> Response;

    /// Builds the uniform failure envelope `{"error": "<message>"}`.
    fn json_error(status: StatusCode, message: &str) -> Response;
}

impl ResponseExt for Response {
    fn json<T: Serialize>(status: StatusCode, body: &T) -> Response {
        let bytes = serde_json::to_vec(body).unwrap_or_else(|_| b"null".to_vec());

        http::Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(bytes)))
            .expect("failed to build JSON response")
    }

    fn json_error(status: StatusCode, message: &str) -> Response {
        let body = serde_json::json!({ "error": message });

        http::Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body.to_string())))
            .expect("failed to build JSON error response")
    }
}

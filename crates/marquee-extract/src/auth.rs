//! Authorization header helpers.

use http::header::AUTHORIZATION;
use http::HeaderMap;

/// Extracts a bearer token from the `Authorization` header.
///
/// Returns `None` when the header is absent, not valid UTF-8, or does not
/// use the `Bearer` scheme.
///
/// # Example
///
/// ```rust
/// use http::{HeaderMap, HeaderValue};
/// use marquee_extract::bearer_token;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(
///     http::header::AUTHORIZATION,
///     HeaderValue::from_static("Bearer abc123"),
/// );
/// assert_eq!(bearer_token(&headers), Some("abc123"));
/// ```
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ")
}

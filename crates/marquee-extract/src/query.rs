//! Query string parsing.
//!
//! Query parameters arrive as flat string key/value pairs; any numeric
//! coercion happens later, driven by the validation schema.

use thiserror::Error;

/// Failure to decode a query string.
#[derive(Debug, Error)]
#[error("invalid query string: {0}")]
pub struct QueryParseError(String);

/// Parses a raw query string into ordered string key/value pairs.
///
/// # Example
///
/// ```rust
/// use marquee_extract::query_pairs;
///
/// let pairs = query_pairs("title=Alien&page=2").unwrap();
/// assert_eq!(pairs[0], ("title".to_string(), "Alien".to_string()));
/// assert_eq!(pairs[1], ("page".to_string(), "2".to_string()));
/// ```
pub fn query_pairs(query: &str) -> Result<Vec<(String, String)>, QueryParseError> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(query)
        .map_err(|e| QueryParseError(e.to_string()))
}

//! Cookie extraction and response helpers.
//!
//! [`Cookies`] parses the request `Cookie` header; [`SetCookie`] builds
//! `Set-Cookie` response header values.

use http::header;
use http::HeaderMap;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Parsed request cookies.
///
/// # Example
///
/// ```rust
/// use http::{HeaderMap, HeaderValue};
/// use marquee_extract::Cookies;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(
///     http::header::COOKIE,
///     HeaderValue::from_static("access_token=abc123; theme=dark"),
/// );
///
/// let cookies = Cookies::from_headers(&headers);
/// assert_eq!(cookies.get("access_token"), Some("abc123"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Cookies {
    cookies: HashMap<String, String>,
}

impl Cookies {
    /// Creates an empty cookie set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses cookies from request headers.
    ///
    /// A missing or non-UTF-8 `Cookie` header yields an empty set.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .map_or_else(Self::new, Self::parse)
    }

    fn parse(header_value: &str) -> Self {
        let mut cookies = HashMap::new();

        for cookie in header_value.split(';') {
            if let Some((name, value)) = cookie.trim().split_once('=') {
                let value = value.trim().trim_matches('"');
                cookies.insert(name.trim().to_string(), value.to_string());
            }
        }

        Self { cookies }
    }

    /// Returns a cookie value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Returns true if no cookies were sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    /// Cookie is sent with cross-site requests.
    None,
    /// Cookie is sent with same-site and top-level cross-site navigations.
    #[default]
    Lax,
    /// Cookie is only sent with same-site requests.
    Strict,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Lax => write!(f, "Lax"),
            Self::Strict => write!(f, "Strict"),
        }
    }
}

/// Builder for a `Set-Cookie` response header value.
///
/// # Example
///
/// ```rust
/// use marquee_extract::{SameSite, SetCookie};
///
/// let header = SetCookie::new("access_token", "abc123")
///     .path("/")
///     .http_only(true)
///     .same_site(SameSite::Strict)
///     .max_age_secs(31_536_000)
///     .to_header_value();
///
/// assert!(header.contains("access_token=abc123"));
/// assert!(header.contains("HttpOnly"));
/// assert!(header.contains("SameSite=Strict"));
/// ```
#[derive(Debug, Clone)]
pub struct SetCookie {
    name: String,
    value: String,
    path: Option<String>,
    max_age: Option<Duration>,
    secure: bool,
    http_only: bool,
    same_site: Option<SameSite>,
}

impl SetCookie {
    /// Creates a new `Set-Cookie` builder.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            max_age: None,
            secure: false,
            http_only: false,
            same_site: None,
        }
    }

    /// Sets the Path attribute.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the Max-Age attribute in seconds.
    #[must_use]
    pub fn max_age_secs(mut self, seconds: u64) -> Self {
        self.max_age = Some(Duration::from_secs(seconds));
        self
    }

    /// Sets the Secure attribute.
    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Sets the `HttpOnly` attribute.
    #[must_use]
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Sets the `SameSite` attribute.
    #[must_use]
    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    /// Renders the `Set-Cookie` header value.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        let mut parts = vec![format!("{}={}", self.name, self.value)];

        if let Some(ref path) = self.path {
            parts.push(format!("Path={path}"));
        }

        if let Some(max_age) = self.max_age {
            parts.push(format!("Max-Age={}", max_age.as_secs()));
        }

        if self.secure {
            parts.push("Secure".to_string());
        }

        if self.http_only {
            parts.push("HttpOnly".to_string());
        }

        if let Some(same_site) = self.same_site {
            parts.push(format!("SameSite={same_site}"));
        }

        parts.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers_with_cookie(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_parse_single_cookie() {
        let cookies = Cookies::from_headers(&headers_with_cookie("access_token=abc123"));
        assert_eq!(cookies.get("access_token"), Some("abc123"));
    }

    #[test]
    fn test_parse_multiple_cookies() {
        let cookies =
            Cookies::from_headers(&headers_with_cookie("access_token=abc; theme=dark; lang=en"));
        assert_eq!(cookies.get("access_token"), Some("abc"));
        assert_eq!(cookies.get("theme"), Some("dark"));
        assert_eq!(cookies.get("lang"), Some("en"));
    }

    #[test]
    fn test_parse_with_spaces_and_quotes() {
        let cookies = Cookies::from_headers(&headers_with_cookie("  name = \"John Doe\"  "));
        assert_eq!(cookies.get("name"), Some("John Doe"));
    }

    #[test]
    fn test_missing_cookie_header() {
        let cookies = Cookies::from_headers(&HeaderMap::new());
        assert!(cookies.is_empty());
    }

    #[test]
    fn test_set_cookie_simple() {
        let cookie = SetCookie::new("session", "abc123");
        assert_eq!(cookie.to_header_value(), "session=abc123");
    }

    #[test]
    fn test_set_cookie_credential_shape() {
        let header = SetCookie::new("access_token", "tok")
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .max_age_secs(31_536_000)
            .to_header_value();

        assert_eq!(
            header,
            "access_token=tok; Path=/; Max-Age=31536000; HttpOnly; SameSite=Strict"
        );
    }

    #[test]
    fn test_same_site_display() {
        assert_eq!(SameSite::None.to_string(), "None");
        assert_eq!(SameSite::Lax.to_string(), "Lax");
        assert_eq!(SameSite::Strict.to_string(), "Strict");
    }
}

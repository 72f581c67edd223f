//! Route handlers.
//!
//! One module per resource, mirroring the API surface:
//!
//! - [`search`] - `GET /api/movies/search`
//! - [`detail`] - `GET /api/movies/{id}/detail`
//! - [`comments`] - `GET`/`POST`/`PATCH`/`DELETE /api/movies/{id}/comments`
//! - [`favorites`] - `GET`/`POST`/`DELETE /api/movies/favorites`

pub mod comments;
pub mod detail;
pub mod favorites;
pub mod search;

use http::header::SET_COOKIE;
use http::HeaderValue;
use marquee_core::Response;
use marquee_extract::{SameSite, SetCookie};
use marquee_middleware::stages::ACCESS_TOKEN_COOKIE;
use marquee_middleware::ResolvedGuest;

/// One year, the credential cookie lifetime.
const COOKIE_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 365;

/// Attaches the credential cookie when the guest was provisioned during
/// this request, so the client persists the identity it was just issued.
/// Returning guests presented the cookie themselves and get nothing new.
pub fn with_guest_cookie(mut response: Response, resolved: &ResolvedGuest) -> Response {
    if !resolved.fresh {
        return response;
    }

    let cookie = SetCookie::new(ACCESS_TOKEN_COOKIE, &resolved.guest.access_token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age_secs(COOKIE_MAX_AGE_SECS);

    match HeaderValue::from_str(&cookie.to_header_value()) {
        Ok(value) => {
            response.headers_mut().insert(SET_COOKIE, value);
        }
        Err(e) => {
            // Tokens are hex, so this cannot happen; do not fail the
            // request over a cookie either way.
            tracing::error!(error = %e, "failed to encode credential cookie");
        }
    }
    response
}

//! Request extraction helpers for Marquee.
//!
//! Small, transport-level parsers used by the pipeline stages: cookies,
//! bearer credentials, and query strings. Payload *validation* lives in
//! the middleware crate; this crate only turns wire data into values.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod cookie;
pub mod query;

pub use auth::bearer_token;
pub use cookie::{Cookies, SameSite, SetCookie};
pub use query::{query_pairs, QueryParseError};

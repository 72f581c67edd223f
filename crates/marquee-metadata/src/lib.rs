//! # Marquee Metadata
//!
//! The movie metadata capability: search and per-movie detail, returned as
//! raw JSON from the upstream catalog. [`TmdbClient`] is the production
//! provider; [`StaticCatalog`] serves fixture data in tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod error;
pub mod tmdb;

pub use catalog::StaticCatalog;
pub use error::MetadataError;
pub use tmdb::TmdbClient;

use serde_json::Value;

/// Read access to the third-party movie catalog.
///
/// Both operations return the upstream response body as opaque JSON; the
/// service stores and forwards it without interpreting the shape.
#[async_trait::async_trait]
pub trait MovieProvider: Send + Sync + 'static {
    /// Searches movies by title. Pages are 1-based.
    async fn search(&self, title: &str, page: i64) -> Result<Value, MetadataError>;

    /// Fetches one movie's detail by id.
    async fn detail(&self, movie_id: i64) -> Result<Value, MetadataError>;
}

//! Store error types.

use marquee_core::MarqueeError;
use thiserror::Error;

/// Failure raised by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying database failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An ownership-checked mutation affected no rows: the record does not
    /// exist or belongs to a different guest. The two cases are deliberately
    /// indistinguishable.
    #[error("{entity} not found or unauthorized")]
    NotFoundOrUnauthorized {
        /// The kind of record ("Comment", "Favorite").
        entity: &'static str,
    },

    /// A uniqueness constraint was violated (e.g. favoriting the same movie
    /// twice).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored value failed to decode (e.g. a favorite's movie snapshot is
    /// no longer valid JSON).
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl From<StoreError> for MarqueeError {
    /// Store failures carry no client-facing status, so the pipeline treats
    /// them as unexpected: generic 500 body, full detail in the logs.
    fn from(err: StoreError) -> Self {
        Self::unexpected(err)
    }
}

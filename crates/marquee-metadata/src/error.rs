//! Metadata provider errors.

use http::StatusCode;
use marquee_core::MarqueeError;
use thiserror::Error;

/// Failure talking to the movie catalog.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The transport failed (DNS, TLS, timeout).
    #[error("metadata request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("metadata upstream returned {status}: {detail}")]
    UpstreamStatus {
        /// The upstream's HTTP status.
        status: u16,
        /// Status line detail for the logs.
        detail: String,
    },

    /// The movie requested for detail does not exist upstream.
    #[error("movie {movie_id} not found upstream")]
    NotFound {
        /// The movie id that was requested.
        movie_id: i64,
    },
}

impl From<MetadataError> for MarqueeError {
    /// Provider failures are tagged 502: the status records that the
    /// trouble is upstream while the ≥ 500 rule keeps the response body
    /// generic. The exception is a missing movie, which is the client's
    /// mistake and surfaces as 404.
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::NotFound { movie_id } => Self::upstream(
                StatusCode::NOT_FOUND,
                format!("Movie {movie_id} not found"),
            ),
            other => Self::upstream(StatusCode::BAD_GATEWAY, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_maps_to_generic_502() {
        let err: MarqueeError = MetadataError::UpstreamStatus {
            status: 503,
            detail: "Service Unavailable".to_string(),
        }
        .into();

        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.client_message(), "Internal Server Error");
    }

    #[test]
    fn test_not_found_surfaces_404() {
        let err: MarqueeError = MetadataError::NotFound { movie_id: 99 }.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.client_message(), "Movie 99 not found");
    }
}

//! Error types for Marquee.
//!
//! [`MarqueeError`] is the single failure type carried through the request
//! pipeline. Every variant knows its HTTP status code, and the pipeline's
//! translator decides, from the status alone, whether the message is safe
//! to surface to the client.

use http::StatusCode;
use thiserror::Error;

/// Result type alias using [`MarqueeError`].
pub type MarqueeResult<T> = Result<T, MarqueeError>;

/// Failure raised by a pipeline step, a handler, or a collaborator.
///
/// The variants form a closed taxonomy: the translator matches exhaustively
/// instead of probing for `message`/`code` fields on arbitrary objects.
///
/// # Example
///
/// ```
/// use marquee_core::MarqueeError;
/// use http::StatusCode;
///
/// let err = MarqueeError::validation("Missing required field: 'title'");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert!(err.client_message().contains("title"));
/// ```
#[derive(Error, Debug)]
pub enum MarqueeError {
    /// Request payload failed validation.
    #[error("Validation error: {message}")]
    Validation {
        /// Field-qualified, client-safe description of the violations.
        message: String,
    },

    /// A required credential was missing or unknown.
    #[error("Authentication error: {message}")]
    Authentication {
        /// Client-safe message.
        message: String,
    },

    /// A collaborator failed and tagged the failure with a client-facing
    /// status of its own choosing.
    #[error("Upstream error ({status}): {message}")]
    Upstream {
        /// Status the collaborator chose for this failure.
        status: StatusCode,
        /// Description of the upstream failure. Only surfaced to clients
        /// when `status` is below 500.
        message: String,
    },

    /// Anything else: a defect, an I/O failure, a collaborator error with
    /// no client-facing status. Never surfaced verbatim.
    #[error("Internal error")]
    Unexpected {
        /// The underlying cause, for operator logs only.
        #[source]
        source: anyhow::Error,
    },
}

impl MarqueeError {
    /// Creates a validation error with a client-safe message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates an upstream error with an explicit client-facing status.
    #[must_use]
    pub fn upstream(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Wraps an arbitrary failure as unexpected.
    pub fn unexpected(source: impl Into<anyhow::Error>) -> Self {
        Self::Unexpected {
            source: source.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Authentication { .. } => StatusCode::UNAUTHORIZED,
            Self::Upstream { status, .. } => *status,
            Self::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the message a client is allowed to see.
    ///
    /// Statuses of 500 and above always collapse to a generic body so no
    /// internal detail leaks; below 500 the original message is returned.
    #[must_use]
    pub fn client_message(&self) -> String {
        if self.status_code().is_server_error() {
            return "Internal Server Error".to_string();
        }

        match self {
            Self::Validation { message } | Self::Authentication { message } => message.clone(),
            Self::Upstream { message, .. } => message.clone(),
            Self::Unexpected { .. } => "Internal Server Error".to_string(),
        }
    }
}

impl From<serde_json::Error> for MarqueeError {
    fn from(err: serde_json::Error) -> Self {
        Self::unexpected(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = MarqueeError::validation("Missing required field: 'title'");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.client_message(), "Missing required field: 'title'");
    }

    #[test]
    fn test_authentication_error() {
        let err = MarqueeError::authentication("Authentication required");
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.client_message(), "Authentication required");
    }

    #[test]
    fn test_upstream_client_status_surfaces_message() {
        let err = MarqueeError::upstream(StatusCode::CONFLICT, "already favorited");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.client_message(), "already favorited");
    }

    #[test]
    fn test_upstream_server_status_is_generic() {
        let err = MarqueeError::upstream(
            StatusCode::BAD_GATEWAY,
            "tmdb returned 503 Service Unavailable",
        );
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.client_message(), "Internal Server Error");
    }

    #[test]
    fn test_unexpected_never_leaks() {
        let err = MarqueeError::unexpected(anyhow::anyhow!("connection refused (db at /tmp)"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "Internal Server Error");
        // The cause stays reachable for operator logging.
        assert!(format!("{err:?}").contains("connection refused"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = MarqueeError::from(parse_err);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

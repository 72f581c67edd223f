//! Stored record types.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A comment as stored, without the author's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    /// Store-assigned identifier.
    pub id: i64,
    /// The authoring guest.
    pub guest_id: i64,
    /// The movie the comment is about.
    pub movie_id: i64,
    /// Comment text, 1 to 1000 characters.
    pub content: String,
    /// Star rating, 1 to 5.
    pub rating: i64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A comment joined with its author's display name, the shape handlers
/// return to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentWithAuthor {
    /// Store-assigned identifier.
    pub id: i64,
    /// The authoring guest.
    pub guest_id: i64,
    /// The author's generated display name.
    pub guest_name: String,
    /// The movie the comment is about.
    pub movie_id: i64,
    /// Comment text.
    pub content: String,
    /// Star rating, 1 to 5.
    pub rating: i64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A favorited movie with its metadata snapshot.
///
/// The movie JSON is captured at favoriting time so listing favorites never
/// needs the metadata provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Favorite {
    /// Store-assigned identifier.
    pub id: i64,
    /// The owning guest.
    pub guest_id: i64,
    /// The favorited movie.
    pub movie_id: i64,
    /// Movie metadata as returned by the provider when favorited.
    pub movie: serde_json::Value,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

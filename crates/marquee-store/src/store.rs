//! The store capability trait.

use crate::records::{Comment, CommentWithAuthor, Favorite};
use crate::StoreError;
use marquee_core::GuestIdentity;

/// Persistence operations for guests, comments, and favorites.
///
/// Implementations enforce their own integrity constraints: access tokens
/// are globally unique, a guest holds at most one favorite per movie, and
/// comment/favorite mutations only touch rows owned by the acting guest
/// (the ownership check lives in the mutation itself so there is no
/// read-then-write race).
#[async_trait::async_trait]
pub trait Store: Send + Sync + 'static {
    /// Looks up a guest by access token.
    async fn guest_by_token(&self, token: &str) -> Result<Option<GuestIdentity>, StoreError>;

    /// Creates a new guest with a generated name and credential.
    async fn create_guest(&self) -> Result<GuestIdentity, StoreError>;

    /// Returns all comments for a movie, newest first, with author names.
    async fn comments_for_movie(&self, movie_id: i64)
        -> Result<Vec<CommentWithAuthor>, StoreError>;

    /// Returns the given guest's comment on a movie, if any.
    async fn comment_for_guest(
        &self,
        movie_id: i64,
        guest_id: i64,
    ) -> Result<Option<CommentWithAuthor>, StoreError>;

    /// Returns a comment by id with its author name.
    async fn comment_by_id(&self, comment_id: i64)
        -> Result<Option<CommentWithAuthor>, StoreError>;

    /// Creates a comment.
    async fn create_comment(
        &self,
        guest_id: i64,
        movie_id: i64,
        content: &str,
        rating: i64,
    ) -> Result<Comment, StoreError>;

    /// Updates a comment owned by the guest.
    ///
    /// Fails with [`StoreError::NotFoundOrUnauthorized`] when the comment
    /// does not exist or belongs to someone else.
    async fn update_comment(
        &self,
        guest_id: i64,
        comment_id: i64,
        content: &str,
        rating: i64,
    ) -> Result<(), StoreError>;

    /// Deletes a comment owned by the guest, with the same ownership rule
    /// as [`Store::update_comment`].
    async fn delete_comment(&self, guest_id: i64, comment_id: i64) -> Result<(), StoreError>;

    /// Returns the guest's favorites, newest first.
    async fn favorites_for_guest(&self, guest_id: i64) -> Result<Vec<Favorite>, StoreError>;

    /// Adds a favorite with a snapshot of the movie's metadata.
    async fn add_favorite(
        &self,
        guest_id: i64,
        movie_id: i64,
        movie: &serde_json::Value,
    ) -> Result<Favorite, StoreError>;

    /// Removes a favorite; fails with [`StoreError::NotFoundOrUnauthorized`]
    /// when the guest has no favorite for the movie.
    async fn remove_favorite(&self, guest_id: i64, movie_id: i64) -> Result<(), StoreError>;
}

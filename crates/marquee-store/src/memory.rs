//! In-memory store.
//!
//! Implements the same contract as [`crate::SqliteStore`] over plain
//! vectors behind a mutex. Used by the test suites, where a real database
//! file would only add noise.

use crate::credential;
use crate::records::{Comment, CommentWithAuthor, Favorite};
use crate::{Store, StoreError};
use chrono::Utc;
use marquee_core::GuestIdentity;
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct Tables {
    guests: Vec<GuestIdentity>,
    comments: Vec<Comment>,
    favorites: Vec<Favorite>,
    next_guest_id: i64,
    next_comment_id: i64,
    next_favorite_id: i64,
}

/// Store keeping everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tables {
    fn guest_name(&self, guest_id: i64) -> String {
        self.guests
            .iter()
            .find(|g| g.id == guest_id)
            .map(|g| g.name.clone())
            .unwrap_or_default()
    }

    fn with_author(&self, comment: &Comment) -> CommentWithAuthor {
        CommentWithAuthor {
            id: comment.id,
            guest_id: comment.guest_id,
            guest_name: self.guest_name(comment.guest_id),
            movie_id: comment.movie_id,
            content: comment.content.clone(),
            rating: comment.rating,
            created_at: comment.created_at,
        }
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn guest_by_token(&self, token: &str) -> Result<Option<GuestIdentity>, StoreError> {
        let tables = self.tables.lock();
        Ok(tables
            .guests
            .iter()
            .find(|g| g.access_token == token)
            .cloned())
    }

    async fn create_guest(&self) -> Result<GuestIdentity, StoreError> {
        let mut tables = self.tables.lock();
        tables.next_guest_id += 1;

        let guest = GuestIdentity {
            id: tables.next_guest_id,
            name: credential::generate_guest_name(),
            access_token: credential::generate_access_token(),
        };
        tables.guests.push(guest.clone());
        Ok(guest)
    }

    async fn comments_for_movie(
        &self,
        movie_id: i64,
    ) -> Result<Vec<CommentWithAuthor>, StoreError> {
        let tables = self.tables.lock();
        let mut comments: Vec<CommentWithAuthor> = tables
            .comments
            .iter()
            .filter(|c| c.movie_id == movie_id)
            .map(|c| tables.with_author(c))
            .collect();
        comments.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(comments)
    }

    async fn comment_for_guest(
        &self,
        movie_id: i64,
        guest_id: i64,
    ) -> Result<Option<CommentWithAuthor>, StoreError> {
        let tables = self.tables.lock();
        Ok(tables
            .comments
            .iter()
            .find(|c| c.movie_id == movie_id && c.guest_id == guest_id)
            .map(|c| tables.with_author(c)))
    }

    async fn comment_by_id(
        &self,
        comment_id: i64,
    ) -> Result<Option<CommentWithAuthor>, StoreError> {
        let tables = self.tables.lock();
        Ok(tables
            .comments
            .iter()
            .find(|c| c.id == comment_id)
            .map(|c| tables.with_author(c)))
    }

    async fn create_comment(
        &self,
        guest_id: i64,
        movie_id: i64,
        content: &str,
        rating: i64,
    ) -> Result<Comment, StoreError> {
        let mut tables = self.tables.lock();
        tables.next_comment_id += 1;

        let comment = Comment {
            id: tables.next_comment_id,
            guest_id,
            movie_id,
            content: content.to_string(),
            rating,
            created_at: Utc::now(),
        };
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn update_comment(
        &self,
        guest_id: i64,
        comment_id: i64,
        content: &str,
        rating: i64,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();
        let comment = tables
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id && c.guest_id == guest_id)
            .ok_or(StoreError::NotFoundOrUnauthorized { entity: "Comment" })?;

        comment.content = content.to_string();
        comment.rating = rating;
        Ok(())
    }

    async fn delete_comment(&self, guest_id: i64, comment_id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();
        let before = tables.comments.len();
        tables
            .comments
            .retain(|c| !(c.id == comment_id && c.guest_id == guest_id));

        if tables.comments.len() == before {
            return Err(StoreError::NotFoundOrUnauthorized { entity: "Comment" });
        }
        Ok(())
    }

    async fn favorites_for_guest(&self, guest_id: i64) -> Result<Vec<Favorite>, StoreError> {
        let tables = self.tables.lock();
        let mut favorites: Vec<Favorite> = tables
            .favorites
            .iter()
            .filter(|f| f.guest_id == guest_id)
            .cloned()
            .collect();
        favorites.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(favorites)
    }

    async fn add_favorite(
        &self,
        guest_id: i64,
        movie_id: i64,
        movie: &serde_json::Value,
    ) -> Result<Favorite, StoreError> {
        let mut tables = self.tables.lock();

        // Mirror the unique (guest_id, movie_id) constraint.
        if tables
            .favorites
            .iter()
            .any(|f| f.guest_id == guest_id && f.movie_id == movie_id)
        {
            return Err(StoreError::Conflict(format!(
                "guest {guest_id} already favorited movie {movie_id}"
            )));
        }

        tables.next_favorite_id += 1;
        let favorite = Favorite {
            id: tables.next_favorite_id,
            guest_id,
            movie_id,
            movie: movie.clone(),
            created_at: Utc::now(),
        };
        tables.favorites.push(favorite.clone());
        Ok(favorite)
    }

    async fn remove_favorite(&self, guest_id: i64, movie_id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();
        let before = tables.favorites.len();
        tables
            .favorites
            .retain(|f| !(f.guest_id == guest_id && f.movie_id == movie_id));

        if tables.favorites.len() == before {
            return Err(StoreError::NotFoundOrUnauthorized { entity: "Favorite" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_guest_lookup_matches_created() {
        let store = MemoryStore::new();
        let guest = store.create_guest().await.expect("create");

        let found = store
            .guest_by_token(&guest.access_token)
            .await
            .expect("lookup")
            .expect("exists");
        assert_eq!(found.id, guest.id);
    }

    #[tokio::test]
    async fn test_guest_ids_are_sequential() {
        let store = MemoryStore::new();
        let a = store.create_guest().await.expect("a");
        let b = store.create_guest().await.expect("b");
        assert_eq!(b.id, a.id + 1);
    }

    #[tokio::test]
    async fn test_comment_join_carries_author_name() {
        let store = MemoryStore::new();
        let guest = store.create_guest().await.expect("guest");
        store
            .create_comment(guest.id, 550, "First!", 5)
            .await
            .expect("create");

        let comments = store.comments_for_movie(550).await.expect("list");
        assert_eq!(comments[0].guest_name, guest.name);
    }

    #[tokio::test]
    async fn test_ownership_enforced() {
        let store = MemoryStore::new();
        let author = store.create_guest().await.expect("author");
        let other = store.create_guest().await.expect("other");
        let comment = store
            .create_comment(author.id, 550, "Mine", 3)
            .await
            .expect("create");

        assert!(store
            .update_comment(other.id, comment.id, "Stolen", 1)
            .await
            .is_err());
        assert!(store.delete_comment(other.id, comment.id).await.is_err());
        assert!(store
            .delete_comment(author.id, comment.id)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_favorite_rejected() {
        let store = MemoryStore::new();
        let guest = store.create_guest().await.expect("guest");
        let movie = serde_json::json!({ "id": 1 });

        store
            .add_favorite(guest.id, 1, &movie)
            .await
            .expect("first");
        assert!(store.add_favorite(guest.id, 1, &movie).await.is_err());
    }
}

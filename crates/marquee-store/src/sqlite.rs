//! SQLite-backed store.
//!
//! The production store. The schema is bootstrapped on open with
//! `CREATE TABLE IF NOT EXISTS`, so pointing the service at an empty file
//! is all the setup there is.

use crate::credential;
use crate::records::{Comment, CommentWithAuthor, Favorite};
use crate::{Store, StoreError};
use chrono::{DateTime, Utc};
use marquee_core::GuestIdentity;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;

const COMMENT_COLUMNS: &str = "c.id, c.guest_id, g.name AS guest_name, c.movie_id, \
                               c.content, c.rating, c.created_at";

/// Store backed by a SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) the database at `path` and bootstraps
    /// the schema.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Opens an in-memory database, for tests.
    ///
    /// Uses a single connection: each SQLite in-memory database is private
    /// to its connection.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new().in_memory(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS guests (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                access_token TEXT NOT NULL UNIQUE,
                created_at DATETIME NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                guest_id INTEGER NOT NULL,
                movie_id INTEGER NOT NULL,
                content TEXT NOT NULL,
                rating INTEGER CHECK(rating >= 1 AND rating <= 5),
                created_at DATETIME NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS favorites (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                guest_id INTEGER NOT NULL,
                movie_id INTEGER NOT NULL,
                movie_data TEXT NOT NULL,
                created_at DATETIME NOT NULL,
                UNIQUE(guest_id, movie_id)
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn comment_from_row(row: &SqliteRow) -> CommentWithAuthor {
    CommentWithAuthor {
        id: row.get("id"),
        guest_id: row.get("guest_id"),
        guest_name: row.get("guest_name"),
        movie_id: row.get("movie_id"),
        content: row.get("content"),
        rating: row.get("rating"),
        created_at: row.get("created_at"),
    }
}

fn favorite_from_row(row: &SqliteRow) -> Result<Favorite, StoreError> {
    let raw: String = row.get("movie_data");
    let movie = serde_json::from_str(&raw)
        .map_err(|e| StoreError::Corrupt(format!("favorite movie snapshot: {e}")))?;

    Ok(Favorite {
        id: row.get("id"),
        guest_id: row.get("guest_id"),
        movie_id: row.get("movie_id"),
        movie,
        created_at: row.get("created_at"),
    })
}

#[async_trait::async_trait]
impl Store for SqliteStore {
    async fn guest_by_token(&self, token: &str) -> Result<Option<GuestIdentity>, StoreError> {
        let row = sqlx::query("SELECT id, name, access_token FROM guests WHERE access_token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| GuestIdentity {
            id: r.get("id"),
            name: r.get("name"),
            access_token: r.get("access_token"),
        }))
    }

    async fn create_guest(&self) -> Result<GuestIdentity, StoreError> {
        let name = credential::generate_guest_name();
        let access_token = credential::generate_access_token();
        let now: DateTime<Utc> = Utc::now();

        let result = sqlx::query("INSERT INTO guests (name, access_token, created_at) VALUES (?, ?, ?)")
            .bind(&name)
            .bind(&access_token)
            .bind(now)
            .execute(&self.pool)
            .await?;

        let guest = GuestIdentity {
            id: result.last_insert_rowid(),
            name,
            access_token,
        };
        tracing::debug!(guest = %guest.log_id(), "provisioned new guest");
        Ok(guest)
    }

    async fn comments_for_movie(
        &self,
        movie_id: i64,
    ) -> Result<Vec<CommentWithAuthor>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {COMMENT_COLUMNS}
             FROM comments c JOIN guests g ON c.guest_id = g.id
             WHERE c.movie_id = ?
             ORDER BY c.created_at DESC, c.id DESC"
        ))
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(comment_from_row).collect())
    }

    async fn comment_for_guest(
        &self,
        movie_id: i64,
        guest_id: i64,
    ) -> Result<Option<CommentWithAuthor>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {COMMENT_COLUMNS}
             FROM comments c JOIN guests g ON c.guest_id = g.id
             WHERE c.movie_id = ? AND c.guest_id = ?"
        ))
        .bind(movie_id)
        .bind(guest_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(comment_from_row))
    }

    async fn comment_by_id(
        &self,
        comment_id: i64,
    ) -> Result<Option<CommentWithAuthor>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {COMMENT_COLUMNS}
             FROM comments c JOIN guests g ON c.guest_id = g.id
             WHERE c.id = ?"
        ))
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(comment_from_row))
    }

    async fn create_comment(
        &self,
        guest_id: i64,
        movie_id: i64,
        content: &str,
        rating: i64,
    ) -> Result<Comment, StoreError> {
        let now: DateTime<Utc> = Utc::now();

        let result = sqlx::query(
            "INSERT INTO comments (guest_id, movie_id, content, rating, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(guest_id)
        .bind(movie_id)
        .bind(content)
        .bind(rating)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Comment {
            id: result.last_insert_rowid(),
            guest_id,
            movie_id,
            content: content.to_string(),
            rating,
            created_at: now,
        })
    }

    async fn update_comment(
        &self,
        guest_id: i64,
        comment_id: i64,
        content: &str,
        rating: i64,
    ) -> Result<(), StoreError> {
        let result =
            sqlx::query("UPDATE comments SET content = ?, rating = ? WHERE id = ? AND guest_id = ?")
                .bind(content)
                .bind(rating)
                .bind(comment_id)
                .bind(guest_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFoundOrUnauthorized { entity: "Comment" });
        }
        Ok(())
    }

    async fn delete_comment(&self, guest_id: i64, comment_id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ? AND guest_id = ?")
            .bind(comment_id)
            .bind(guest_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFoundOrUnauthorized { entity: "Comment" });
        }
        Ok(())
    }

    async fn favorites_for_guest(&self, guest_id: i64) -> Result<Vec<Favorite>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, guest_id, movie_id, movie_data, created_at
             FROM favorites
             WHERE guest_id = ?
             ORDER BY created_at DESC, id DESC",
        )
        .bind(guest_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(favorite_from_row).collect()
    }

    async fn add_favorite(
        &self,
        guest_id: i64,
        movie_id: i64,
        movie: &serde_json::Value,
    ) -> Result<Favorite, StoreError> {
        let now: DateTime<Utc> = Utc::now();

        let result = sqlx::query(
            "INSERT INTO favorites (guest_id, movie_id, movie_data, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(guest_id)
        .bind(movie_id)
        .bind(movie.to_string())
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Favorite {
            id: result.last_insert_rowid(),
            guest_id,
            movie_id,
            movie: movie.clone(),
            created_at: now,
        })
    }

    async fn remove_favorite(&self, guest_id: i64, movie_id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM favorites WHERE guest_id = ? AND movie_id = ?")
            .bind(guest_id)
            .bind(movie_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFoundOrUnauthorized { entity: "Favorite" });
        }
        Ok(())
    }
}

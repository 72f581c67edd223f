//! Static in-memory movie catalog.
//!
//! Serves a fixed set of movies with TMDB-shaped responses. The test
//! suites use it so no test ever talks to the network.

use crate::{MetadataError, MovieProvider};
use serde_json::{json, Value};
use std::collections::HashMap;

/// A movie provider over a fixed list of movies.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    movies: HashMap<i64, Value>,
}

impl StaticCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog from movie JSON objects carrying `id` and `title`.
    #[must_use]
    pub fn with_movies(movies: Vec<Value>) -> Self {
        let movies = movies
            .into_iter()
            .filter_map(|movie| movie.get("id").and_then(Value::as_i64).map(|id| (id, movie)))
            .collect();
        Self { movies }
    }
}

#[async_trait::async_trait]
impl MovieProvider for StaticCatalog {
    async fn search(&self, title: &str, page: i64) -> Result<Value, MetadataError> {
        let needle = title.to_lowercase();
        let mut results: Vec<&Value> = self
            .movies
            .values()
            .filter(|movie| {
                movie
                    .get("title")
                    .and_then(Value::as_str)
                    .is_some_and(|t| t.to_lowercase().contains(&needle))
            })
            .collect();
        results.sort_by_key(|movie| movie.get("id").and_then(Value::as_i64));
        let total = results.len();

        Ok(json!({
            "page": page,
            "results": results,
            "total_pages": 1,
            "total_results": total,
        }))
    }

    async fn detail(&self, movie_id: i64) -> Result<Value, MetadataError> {
        self.movies
            .get(&movie_id)
            .cloned()
            .ok_or(MetadataError::NotFound { movie_id })
    }
}

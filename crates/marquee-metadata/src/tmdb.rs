//! TMDB-backed movie provider.

use crate::{MetadataError, MovieProvider};
use serde_json::Value;

/// The public TMDB v3 API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Movie provider backed by The Movie Database HTTP API.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    /// Creates a client for the given API base URL and bearer key.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Creates a client against the public TMDB API.
    #[must_use]
    pub fn with_default_base_url(api_key: impl Into<String>) -> Self {
        Self::new(DEFAULT_BASE_URL, api_key)
    }

    async fn fetch(&self, url: String, query: &[(&str, String)]) -> Result<reqwest::Response, MetadataError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Ok(response)
    }
}

#[async_trait::async_trait]
impl MovieProvider for TmdbClient {
    async fn search(&self, title: &str, page: i64) -> Result<Value, MetadataError> {
        let response = self
            .fetch(
                format!("{}/search/movie", self.base_url),
                &[
                    ("query", title.to_string()),
                    ("language", "en-US".to_string()),
                    ("page", page.to_string()),
                    ("include_adult", "false".to_string()),
                ],
            )
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), title, "movie search failed upstream");
            return Err(MetadataError::UpstreamStatus {
                status: status.as_u16(),
                detail: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            });
        }

        Ok(response.json().await?)
    }

    async fn detail(&self, movie_id: i64) -> Result<Value, MetadataError> {
        let response = self
            .fetch(
                format!("{}/movie/{movie_id}", self.base_url),
                &[("language", "en-US".to_string())],
            )
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(MetadataError::NotFound { movie_id });
        }
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), movie_id, "movie detail failed upstream");
            return Err(MetadataError::UpstreamStatus {
                status: status.as_u16(),
                detail: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            });
        }

        Ok(response.json().await?)
    }
}

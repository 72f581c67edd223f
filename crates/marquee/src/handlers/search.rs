//! Movie search.

use crate::state::AppState;
use http::{HeaderValue, Method, StatusCode};
use marquee_core::{MarqueeResult, RequestParts, Response, ResponseExt};
use marquee_middleware::context::RequestContext;
use marquee_middleware::stages::{Validate, ValidationSpec};
use marquee_middleware::{FieldSpec, Pipeline, Schema};
use marquee_server::App;
use serde::Deserialize;
use std::sync::Arc;

fn search_schema() -> Schema {
    Schema::object()
        .field(FieldSpec::string("title").min_length(1).message("Title is required"))
        .field(FieldSpec::integer("page").range(1, 1000).optional().coercing())
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    title: String,
    page: Option<i64>,
}

/// Registers `GET /api/movies/search`.
pub fn register(app: &mut App, state: &Arc<AppState>) {
    let state = Arc::clone(state);

    app.register(
        Method::GET,
        "/api/movies/search",
        "searchMovies",
        Pipeline::builder()
            .step(Validate::new(
                ValidationSpec::new().query(search_schema()),
            ))
            .handler(move |req, ctx| {
                let state = Arc::clone(&state);
                Box::pin(async move { search_movies(state, req, ctx).await })
            }),
    );
}

async fn search_movies(
    state: Arc<AppState>,
    _req: Arc<RequestParts>,
    ctx: RequestContext,
) -> MarqueeResult<Response> {
    let query: SearchQuery = ctx.validated_query()?;

    let results = state
        .movies
        .search(&query.title, query.page.unwrap_or(1))
        .await?;

    let mut response = Response::json(StatusCode::OK, &serde_json::json!({ "data": results }));
    response.headers_mut().insert(
        http::header::CACHE_CONTROL,
        HeaderValue::from_static("s-maxage=300"),
    );
    Ok(response)
}

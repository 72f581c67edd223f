//! Movie detail.

use crate::state::AppState;
use http::{HeaderValue, Method, StatusCode};
use marquee_core::{MarqueeResult, RequestParts, Response, ResponseExt};
use marquee_middleware::context::RequestContext;
use marquee_middleware::stages::{Validate, ValidationSpec};
use marquee_middleware::{FieldSpec, Pipeline, Schema};
use marquee_server::App;
use serde::Deserialize;
use std::sync::Arc;

pub(crate) fn movie_id_params_schema() -> Schema {
    Schema::object().field(
        FieldSpec::integer("id")
            .range(1, i64::from(i32::MAX))
            .coercing(),
    )
}

#[derive(Debug, Deserialize)]
pub(crate) struct MoviePath {
    pub id: i64,
}

/// Registers `GET /api/movies/{id}/detail`.
pub fn register(app: &mut App, state: &Arc<AppState>) {
    let state = Arc::clone(state);

    app.register(
        Method::GET,
        "/api/movies/{id}/detail",
        "getMovieDetail",
        Pipeline::builder()
            .step(Validate::new(
                ValidationSpec::new().params(movie_id_params_schema()),
            ))
            .handler(move |req, ctx| {
                let state = Arc::clone(&state);
                Box::pin(async move { movie_detail(state, req, ctx).await })
            }),
    );
}

async fn movie_detail(
    state: Arc<AppState>,
    _req: Arc<RequestParts>,
    ctx: RequestContext,
) -> MarqueeResult<Response> {
    let path: MoviePath = ctx.validated_params()?;

    let movie = state.movies.detail(path.id).await?;

    let mut response = Response::json(StatusCode::OK, &serde_json::json!({ "data": movie }));
    response.headers_mut().insert(
        http::header::CACHE_CONTROL,
        HeaderValue::from_static("s-maxage=3600"),
    );
    Ok(response)
}

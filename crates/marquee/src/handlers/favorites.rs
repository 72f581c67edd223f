//! Favorites: list, add, remove.
//!
//! Listing and removal require a previously-issued credential; adding
//! works for anonymous visitors and provisions a guest on the fly.

use crate::handlers::with_guest_cookie;
use crate::state::AppState;
use http::{Method, StatusCode};
use marquee_core::{MarqueeResult, RequestParts, Response, ResponseExt};
use marquee_middleware::context::RequestContext;
use marquee_middleware::stages::{Identify, Validate, ValidationSpec};
use marquee_middleware::{FieldSpec, Pipeline, Schema};
use marquee_server::App;
use marquee_store::Store;
use serde::Deserialize;
use std::sync::Arc;

const PATTERN: &str = "/api/movies/favorites";

fn movie_id_body_schema() -> Schema {
    Schema::object().field(FieldSpec::integer("movie_id").range(1, i64::from(i32::MAX)))
}

#[derive(Debug, Deserialize)]
struct FavoriteBody {
    movie_id: i64,
}

/// Registers the three favorites routes.
pub fn register(app: &mut App, state: &Arc<AppState>) {
    {
        let state = Arc::clone(state);
        app.register(
            Method::GET,
            PATTERN,
            "listFavorites",
            Pipeline::builder()
                .step(Identify::new(true, state.store.clone()))
                .handler(move |req, ctx| {
                    let state = Arc::clone(&state);
                    Box::pin(async move { list_favorites(state, req, ctx).await })
                }),
        );
    }

    {
        let state = Arc::clone(state);
        app.register(
            Method::POST,
            PATTERN,
            "addFavorite",
            Pipeline::builder()
                .step(Validate::new(
                    ValidationSpec::new().body(movie_id_body_schema()),
                ))
                .step(Identify::new(false, state.store.clone()))
                .handler(move |req, ctx| {
                    let state = Arc::clone(&state);
                    Box::pin(async move { add_favorite(state, req, ctx).await })
                }),
        );
    }

    {
        let state = Arc::clone(state);
        app.register(
            Method::DELETE,
            PATTERN,
            "removeFavorite",
            Pipeline::builder()
                .step(Validate::new(
                    ValidationSpec::new().body(movie_id_body_schema()),
                ))
                .step(Identify::new(true, state.store.clone()))
                .handler(move |req, ctx| {
                    let state = Arc::clone(&state);
                    Box::pin(async move { remove_favorite(state, req, ctx).await })
                }),
        );
    }
}

async fn list_favorites(
    state: Arc<AppState>,
    _req: Arc<RequestParts>,
    ctx: RequestContext,
) -> MarqueeResult<Response> {
    let resolved = ctx.require_guest()?;
    let store = state.store.get().await?;

    let favorites = store.favorites_for_guest(resolved.guest.id).await?;

    Ok(Response::json(
        StatusCode::OK,
        &serde_json::json!({ "data": favorites }),
    ))
}

/// Fetches the movie from the metadata provider and stores the snapshot
/// alongside the favorite.
async fn add_favorite(
    state: Arc<AppState>,
    _req: Arc<RequestParts>,
    ctx: RequestContext,
) -> MarqueeResult<Response> {
    let body: FavoriteBody = ctx.validated_body()?;
    let resolved = ctx.require_guest()?;

    let movie = state.movies.detail(body.movie_id).await?;

    let store = state.store.get().await?;
    let favorite = store
        .add_favorite(resolved.guest.id, body.movie_id, &movie)
        .await?;

    let response = Response::json(
        StatusCode::CREATED,
        &serde_json::json!({ "data": favorite }),
    );
    Ok(with_guest_cookie(response, resolved))
}

async fn remove_favorite(
    state: Arc<AppState>,
    _req: Arc<RequestParts>,
    ctx: RequestContext,
) -> MarqueeResult<Response> {
    let body: FavoriteBody = ctx.validated_body()?;
    let resolved = ctx.require_guest()?;
    let store = state.store.get().await?;

    store
        .remove_favorite(resolved.guest.id, body.movie_id)
        .await?;

    Ok(Response::json(
        StatusCode::OK,
        &serde_json::json!({ "data": { "success": true } }),
    ))
}

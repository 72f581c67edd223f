//! Movie comments: list, upsert, update, delete.
//!
//! Reads and first-time writes work for anonymous visitors (a guest is
//! provisioned on the fly); updating or deleting a specific comment
//! requires the credential it was created under.

use crate::handlers::with_guest_cookie;
use crate::handlers::detail::{movie_id_params_schema, MoviePath};
use crate::state::AppState;
use http::{Method, StatusCode};
use marquee_core::{MarqueeError, MarqueeResult, RequestParts, Response, ResponseExt};
use marquee_middleware::context::RequestContext;
use marquee_middleware::stages::{Identify, Validate, ValidationSpec};
use marquee_middleware::{FieldSpec, Pipeline, Schema};
use marquee_server::App;
use marquee_store::Store;
use serde::Deserialize;
use std::sync::Arc;

const PATTERN: &str = "/api/movies/{id}/comments";

fn create_schema() -> Schema {
    Schema::object()
        .field(FieldSpec::string("content").length(1, 1000))
        .field(FieldSpec::integer("rating").range(1, 5))
}

fn update_schema() -> Schema {
    Schema::object()
        .field(FieldSpec::integer("comment_id").range(1, i64::MAX))
        .field(FieldSpec::string("content").length(1, 1000))
        .field(FieldSpec::integer("rating").range(1, 5))
}

fn delete_schema() -> Schema {
    Schema::object().field(FieldSpec::integer("comment_id").range(1, i64::MAX))
}

#[derive(Debug, Deserialize)]
struct CreateComment {
    content: String,
    rating: i64,
}

#[derive(Debug, Deserialize)]
struct UpdateComment {
    comment_id: i64,
    content: String,
    rating: i64,
}

#[derive(Debug, Deserialize)]
struct DeleteComment {
    comment_id: i64,
}

/// Registers the four comment routes.
pub fn register(app: &mut App, state: &Arc<AppState>) {
    {
        let state = Arc::clone(state);
        app.register(
            Method::GET,
            PATTERN,
            "listComments",
            Pipeline::builder()
                .step(Validate::new(
                    ValidationSpec::new().params(movie_id_params_schema()),
                ))
                .step(Identify::new(false, state.store.clone()))
                .handler(move |req, ctx| {
                    let state = Arc::clone(&state);
                    Box::pin(async move { list_comments(state, req, ctx).await })
                }),
        );
    }

    {
        let state = Arc::clone(state);
        app.register(
            Method::POST,
            PATTERN,
            "upsertComment",
            Pipeline::builder()
                .step(Validate::new(
                    ValidationSpec::new()
                        .params(movie_id_params_schema())
                        .body(create_schema()),
                ))
                .step(Identify::new(false, state.store.clone()))
                .handler(move |req, ctx| {
                    let state = Arc::clone(&state);
                    Box::pin(async move { upsert_comment(state, req, ctx).await })
                }),
        );
    }

    {
        let state = Arc::clone(state);
        app.register(
            Method::PATCH,
            PATTERN,
            "updateComment",
            Pipeline::builder()
                .step(Validate::new(
                    ValidationSpec::new()
                        .params(movie_id_params_schema())
                        .body(update_schema()),
                ))
                .step(Identify::new(true, state.store.clone()))
                .handler(move |req, ctx| {
                    let state = Arc::clone(&state);
                    Box::pin(async move { update_comment(state, req, ctx).await })
                }),
        );
    }

    {
        let state = Arc::clone(state);
        app.register(
            Method::DELETE,
            PATTERN,
            "deleteComment",
            Pipeline::builder()
                .step(Validate::new(
                    ValidationSpec::new()
                        .params(movie_id_params_schema())
                        .body(delete_schema()),
                ))
                .step(Identify::new(true, state.store.clone()))
                .handler(move |req, ctx| {
                    let state = Arc::clone(&state);
                    Box::pin(async move { delete_comment(state, req, ctx).await })
                }),
        );
    }
}

/// All comments for the movie, plus the caller's own comment when they
/// have one.
async fn list_comments(
    state: Arc<AppState>,
    _req: Arc<RequestParts>,
    ctx: RequestContext,
) -> MarqueeResult<Response> {
    let path: MoviePath = ctx.validated_params()?;
    let resolved = ctx.require_guest()?;
    let store = state.store.get().await?;

    let comments = store.comments_for_movie(path.id).await?;
    let user_comment = store.comment_for_guest(path.id, resolved.guest.id).await?;

    let response = Response::json(
        StatusCode::OK,
        &serde_json::json!({
            "data": {
                "comments": comments,
                "user_comment": user_comment,
            }
        }),
    );
    Ok(with_guest_cookie(response, resolved))
}

/// Creates the caller's comment on the movie, or updates it when one
/// already exists. 201 on create, 200 on update.
async fn upsert_comment(
    state: Arc<AppState>,
    _req: Arc<RequestParts>,
    ctx: RequestContext,
) -> MarqueeResult<Response> {
    let path: MoviePath = ctx.validated_params()?;
    let body: CreateComment = ctx.validated_body()?;
    let resolved = ctx.require_guest()?;
    let store = state.store.get().await?;

    let existing = store.comment_for_guest(path.id, resolved.guest.id).await?;

    let (comment_id, status) = match existing {
        Some(existing) => {
            store
                .update_comment(resolved.guest.id, existing.id, &body.content, body.rating)
                .await?;
            (existing.id, StatusCode::OK)
        }
        None => {
            let comment = store
                .create_comment(resolved.guest.id, path.id, &body.content, body.rating)
                .await?;
            (comment.id, StatusCode::CREATED)
        }
    };

    let full = store
        .comment_by_id(comment_id)
        .await?
        .ok_or_else(|| MarqueeError::unexpected(anyhow::anyhow!("comment {comment_id} vanished")))?;

    let response = Response::json(status, &serde_json::json!({ "data": full }));
    Ok(with_guest_cookie(response, resolved))
}

/// Updates one of the caller's comments by id.
async fn update_comment(
    state: Arc<AppState>,
    _req: Arc<RequestParts>,
    ctx: RequestContext,
) -> MarqueeResult<Response> {
    let path: MoviePath = ctx.validated_params()?;
    let body: UpdateComment = ctx.validated_body()?;
    let resolved = ctx.require_guest()?;
    let store = state.store.get().await?;

    store
        .update_comment(resolved.guest.id, body.comment_id, &body.content, body.rating)
        .await?;

    let updated = store
        .comment_by_id(body.comment_id)
        .await?
        .filter(|comment| comment.movie_id == path.id);

    Ok(Response::json(
        StatusCode::OK,
        &serde_json::json!({ "data": updated }),
    ))
}

/// Deletes one of the caller's comments by id.
async fn delete_comment(
    state: Arc<AppState>,
    _req: Arc<RequestParts>,
    ctx: RequestContext,
) -> MarqueeResult<Response> {
    let body: DeleteComment = ctx.validated_body()?;
    let resolved = ctx.require_guest()?;
    let store = state.store.get().await?;

    store
        .delete_comment(resolved.guest.id, body.comment_id)
        .await?;

    Ok(Response::json(
        StatusCode::OK,
        &serde_json::json!({ "data": { "success": true } }),
    ))
}

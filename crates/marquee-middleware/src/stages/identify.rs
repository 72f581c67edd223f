//! Guest identity stage.
//!
//! Resolves the request's bearer credential to a [`ResolvedGuest`]:
//!
//! 1. The `access_token` cookie is preferred; an `Authorization: Bearer`
//!    header is the fallback.
//! 2. A credential that resolves to a stored guest is attached and the
//!    pipeline continues.
//! 3. Otherwise the step either short-circuits with 401 (`required`) or
//!    provisions a brand-new guest and continues (`!required`).
//!
//! The required mode exists so mutation endpoints can only touch records
//! of a previously-issued identity: a missing or unknown token must never
//! silently resolve to a *fresh* guest there, or anyone could "own" other
//! records by simply omitting the credential. The stage never sets cookies;
//! handlers attach the credential cookie when the guest is fresh.

use crate::context::{RequestContext, ResolvedGuest};
use crate::step::{BoxFuture, Step, StepOutcome};
use http::StatusCode;
use marquee_core::{MarqueeResult, RequestParts, Response, ResponseExt};
use marquee_extract::{bearer_token, Cookies};
use marquee_store::{SharedStore, Store};

/// Name of the credential cookie.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// The identity-resolution step.
pub struct Identify {
    required: bool,
    store: SharedStore,
}

impl Identify {
    /// Creates an identity step.
    ///
    /// With `required` set, requests without a valid credential are
    /// rejected with 401; otherwise a new guest is provisioned for them.
    #[must_use]
    pub fn new(required: bool, store: SharedStore) -> Self {
        Self { required, store }
    }

    fn credential(req: &RequestParts) -> Option<String> {
        let cookies = Cookies::from_headers(req.headers());
        cookies
            .get(ACCESS_TOKEN_COOKIE)
            .map(str::to_string)
            .or_else(|| bearer_token(req.headers()).map(str::to_string))
    }
}

impl Step for Identify {
    fn name(&self) -> &'static str {
        "identify"
    }

    fn run<'a>(
        &'a self,
        req: &'a RequestParts,
        ctx: &'a mut RequestContext,
    ) -> BoxFuture<'a, MarqueeResult<StepOutcome>> {
        Box::pin(async move {
            let store = self.store.get().await?;

            if let Some(token) = Self::credential(req) {
                if let Some(guest) = store.guest_by_token(&token).await? {
                    tracing::debug!(guest = %guest.log_id(), "resolved returning guest");
                    ctx.set_guest(ResolvedGuest {
                        guest,
                        fresh: false,
                    });
                    return Ok(StepOutcome::Continue);
                }
            }

            if self.required {
                return Ok(StepOutcome::Respond(Response::json_error(
                    StatusCode::UNAUTHORIZED,
                    "Authentication required",
                )));
            }

            let guest = store.create_guest().await?;
            tracing::debug!(guest = %guest.log_id(), "provisioned guest for request");
            ctx.set_guest(ResolvedGuest { guest, fresh: true });
            Ok(StepOutcome::Continue)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{HeaderMap, HeaderValue, Method, Uri};
    use marquee_router::Params;
    use marquee_store::{MemoryStore, Store};

    fn request(headers: HeaderMap) -> RequestParts {
        RequestParts::new(
            Method::GET,
            Uri::from_static("/api/movies/favorites"),
            headers,
            Bytes::new(),
        )
    }

    fn with_cookie(token: &str) -> RequestParts {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::COOKIE,
            HeaderValue::from_str(&format!("access_token={token}")).unwrap(),
        );
        request(headers)
    }

    fn with_bearer(token: &str) -> RequestParts {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        request(headers)
    }

    async fn seeded_store() -> (SharedStore, marquee_core::GuestIdentity) {
        let store = MemoryStore::new();
        let guest = store.create_guest().await.expect("guest");
        (SharedStore::with_store(store), guest)
    }

    #[tokio::test]
    async fn test_cookie_credential_resolves_guest() {
        let (shared, guest) = seeded_store().await;
        let req = with_cookie(&guest.access_token);
        let mut ctx = RequestContext::new(Params::new());

        let outcome = Identify::new(true, shared)
            .run(&req, &mut ctx)
            .await
            .expect("run");

        assert!(matches!(outcome, StepOutcome::Continue));
        let resolved = ctx.guest().expect("guest attached");
        assert_eq!(resolved.guest.id, guest.id);
        assert!(!resolved.fresh);
    }

    #[tokio::test]
    async fn test_bearer_header_is_the_fallback() {
        let (shared, guest) = seeded_store().await;
        let req = with_bearer(&guest.access_token);
        let mut ctx = RequestContext::new(Params::new());

        let outcome = Identify::new(true, shared)
            .run(&req, &mut ctx)
            .await
            .expect("run");

        assert!(matches!(outcome, StepOutcome::Continue));
        assert_eq!(ctx.guest().unwrap().guest.id, guest.id);
    }

    #[tokio::test]
    async fn test_cookie_wins_over_bearer() {
        let store = MemoryStore::new();
        let cookie_guest = store.create_guest().await.expect("a");
        let bearer_guest = store.create_guest().await.expect("b");
        let shared = SharedStore::with_store(store);

        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::COOKIE,
            HeaderValue::from_str(&format!("access_token={}", cookie_guest.access_token)).unwrap(),
        );
        headers.insert(
            http::header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", bearer_guest.access_token)).unwrap(),
        );
        let req = request(headers);
        let mut ctx = RequestContext::new(Params::new());

        Identify::new(true, shared)
            .run(&req, &mut ctx)
            .await
            .expect("run");

        assert_eq!(ctx.guest().unwrap().guest.id, cookie_guest.id);
    }

    #[tokio::test]
    async fn test_required_without_credential_short_circuits_401() {
        let (shared, _guest) = seeded_store().await;
        let req = request(HeaderMap::new());
        let mut ctx = RequestContext::new(Params::new());

        let outcome = Identify::new(true, shared)
            .run(&req, &mut ctx)
            .await
            .expect("run");

        let StepOutcome::Respond(response) = outcome else {
            panic!("expected a short-circuit response");
        };
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(ctx.guest().is_none());
    }

    #[tokio::test]
    async fn test_required_with_unknown_token_never_provisions() {
        let (shared, _guest) = seeded_store().await;
        let req = with_cookie(&"f".repeat(64));
        let mut ctx = RequestContext::new(Params::new());

        let outcome = Identify::new(true, shared.clone())
            .run(&req, &mut ctx)
            .await
            .expect("run");

        assert!(matches!(outcome, StepOutcome::Respond(_)));
        assert!(ctx.guest().is_none());

        // No second guest appeared.
        let store = shared.get().await.expect("store");
        assert!(store
            .guest_by_token(&"f".repeat(64))
            .await
            .expect("lookup")
            .is_none());
    }

    #[tokio::test]
    async fn test_optional_without_credential_provisions_fresh_guest() {
        let shared = SharedStore::with_store(MemoryStore::new());
        let req = request(HeaderMap::new());
        let mut ctx = RequestContext::new(Params::new());

        let outcome = Identify::new(false, shared.clone())
            .run(&req, &mut ctx)
            .await
            .expect("run");

        assert!(matches!(outcome, StepOutcome::Continue));
        let resolved = ctx.guest().expect("guest attached");
        assert!(resolved.fresh);

        // The guest is persisted and resolvable afterwards.
        let store = shared.get().await.expect("store");
        let found = store
            .guest_by_token(&resolved.guest.access_token)
            .await
            .expect("lookup");
        assert_eq!(found.map(|g| g.id), Some(resolved.guest.id));
    }

    #[tokio::test]
    async fn test_optional_with_unknown_token_provisions_new_guest() {
        let (shared, known) = seeded_store().await;
        let req = with_cookie(&"f".repeat(64));
        let mut ctx = RequestContext::new(Params::new());

        let outcome = Identify::new(false, shared)
            .run(&req, &mut ctx)
            .await
            .expect("run");

        assert!(matches!(outcome, StepOutcome::Continue));
        let resolved = ctx.guest().expect("guest attached");
        assert!(resolved.fresh);
        // A stale token never silently maps onto an existing identity.
        assert_ne!(resolved.guest.id, known.id);
        assert_ne!(resolved.guest.access_token, "f".repeat(64));
    }

    #[tokio::test]
    async fn test_reused_credential_resolves_same_identity() {
        let shared = SharedStore::with_store(MemoryStore::new());

        // First visit: no credential, guest provisioned.
        let mut first_ctx = RequestContext::new(Params::new());
        Identify::new(false, shared.clone())
            .run(&request(HeaderMap::new()), &mut first_ctx)
            .await
            .expect("run");
        let issued = first_ctx.guest().unwrap().guest.clone();

        // Second visit: same credential, same identity, not fresh, and no
        // second guest row is created.
        let mut second_ctx = RequestContext::new(Params::new());
        Identify::new(false, shared)
            .run(&with_cookie(&issued.access_token), &mut second_ctx)
            .await
            .expect("run");

        let resolved = second_ctx.guest().unwrap();
        assert_eq!(resolved.guest.id, issued.id);
        assert!(!resolved.fresh);
    }
}

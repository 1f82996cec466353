//! Caller identity for HTTP and WebSocket routes.
//!
//! The user id comes from the `X-User-Id` header, or from the `user_id`
//! query parameter for WebSocket upgrades where browsers cannot set headers.
//! The admin claim is refreshed on every request.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use eragenetica_domain::{Identity, UserId};

use super::{ApiError, ApiState};

pub const USER_ID_HEADER: &str = "X-User-Id";
const USER_ID_PARAM: &str = "user_id";

/// Extractor for the authenticated caller.
#[derive(Debug, Clone)]
pub struct Auth(pub Identity);

impl FromRequestParts<Arc<ApiState>> for Auth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| user_id_from_query(parts))
            .ok_or(ApiError::Unauthorized)?;
        let uid = UserId::new(raw).map_err(|_| ApiError::Unauthorized)?;

        let identity = state
            .app
            .claims
            .refresh_claims(&uid)
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        Ok(Auth(identity))
    }
}

fn user_id_from_query(parts: &Parts) -> Option<String> {
    let Query(params) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri).ok()?;
    params.get(USER_ID_PARAM).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    use crate::api::http::test_support::{memory_state, read_body};

    async fn whoami(Auth(identity): Auth) -> String {
        format!("{}:{}", identity.uid(), identity.is_admin())
    }

    fn app() -> Router {
        Router::new()
            .route("/", get(whoami))
            .with_state(memory_state(["gm"]).0)
    }

    #[tokio::test]
    async fn header_identifies_caller_and_refreshes_claims() {
        let request = Request::builder()
            .uri("/")
            .header(USER_ID_HEADER, "gm")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_body(response).await, "gm:true");
    }

    #[tokio::test]
    async fn query_parameter_is_accepted() {
        let request = Request::builder()
            .uri("/?user_id=p1")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(read_body(response).await, "p1:false");
    }

    #[tokio::test]
    async fn missing_or_blank_identity_is_unauthorized() {
        let missing = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app().oneshot(missing).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let blank = Request::builder()
            .uri("/")
            .header(USER_ID_HEADER, "  ")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(blank).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn claims_outage_is_an_internal_error() {
        use crate::app::App;
        use crate::infrastructure::clock::SystemClock;
        use crate::infrastructure::memory_store::InMemoryDocumentStore;
        use crate::infrastructure::ports::{ClaimsError, MockClaimsPort};

        let mut claims = MockClaimsPort::new();
        claims
            .expect_refresh_claims()
            .returning(|_| Err(ClaimsError::Unavailable("timeout".into())));
        let store = Arc::new(InMemoryDocumentStore::new());
        let app = App::new(store.clone(), store, Arc::new(claims), Arc::new(SystemClock::new()));
        let router = Router::new()
            .route("/", get(whoami))
            .with_state(Arc::new(ApiState::new(Arc::new(app))));

        let request = Request::builder()
            .uri("/")
            .header(USER_ID_HEADER, "gm")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

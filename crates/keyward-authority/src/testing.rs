//! In-process authority for tests.
//!
//! Serves `/api/v4/internal/authorized_keys` on an ephemeral localhost port
//! with canned answers keyed on the `key` query parameter:
//!
//! | `key` | Response |
//! |-------|----------|
//! | `key` | `200 {"id": 1, "key": "public-key"}` |
//! | `ssh-*` | `200 {"id": 7, "key": <key>}` |
//! | `echo-headers` | `200 {"id": 5, "key": "<Authorization> <X-Request-Id>"}`, `-` for a missing header |
//! | `secret` | `200 {"id": 2, ...}` when `Gitlab-Shared-Secret` is sent, else `401` |
//! | `broken-message` | `403 {"message": "Forbidden!"}` |
//! | `broken` | `500`, empty body |
//! | `malformed` | `200`, non-JSON body |
//! | `slow` | `200` after [`SLOW_RESPONSE`] |
//! | anything else | `404`, empty body |

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// How long the `slow` key takes to answer.
pub const SLOW_RESPONSE: Duration = Duration::from_secs(5);

/// A running test authority. Shut down on drop.
pub struct TestAuthority {
    url: String,
    handle: JoinHandle<()>,
}

impl TestAuthority {
    /// Start the authority with the canned handlers.
    pub async fn start() -> std::io::Result<Self> {
        Self::with_router(router()).await
    }

    /// Start an authority serving an arbitrary router.
    pub async fn with_router(router: Router) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!(error = %e, "test authority stopped");
            }
        });

        Ok(Self {
            url: format!("http://{addr}"),
            handle,
        })
    }

    /// Base URL to configure as `authority_url`.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for TestAuthority {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Router with the canned `/api/v4/internal/authorized_keys` handler.
pub fn router() -> Router {
    Router::new().route("/api/v4/internal/authorized_keys", get(authorized_keys))
}

async fn authorized_keys(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let key = params.get("key").map(String::as_str).unwrap_or_default();

    match key {
        "key" => Json(json!({ "id": 1, "key": "public-key" })).into_response(),
        "echo-headers" => {
            let header = |name: &str| {
                headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-")
                    .to_string()
            };
            let echoed = format!("{} {}", header("authorization"), header("x-request-id"));
            Json(json!({ "id": 5, "key": echoed })).into_response()
        }
        "secret" if headers.contains_key("Gitlab-Shared-Secret") => {
            Json(json!({ "id": 2, "key": "secret-key" })).into_response()
        }
        "secret" => StatusCode::UNAUTHORIZED.into_response(),
        "broken-message" => (
            StatusCode::FORBIDDEN,
            Json(json!({ "message": "Forbidden!" })),
        )
            .into_response(),
        "broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "malformed" => (StatusCode::OK, "<html>not json</html>").into_response(),
        "slow" => {
            tokio::time::sleep(SLOW_RESPONSE).await;
            Json(json!({ "id": 3, "key": "slow-key" })).into_response()
        }
        k if k.starts_with("ssh-") => Json(json!({ "id": 7, "key": k })).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

// ABOUTME: HTTP surface for the podcal feed gateway.
// ABOUTME: Exposes GET /api/feed with the JSON envelope and response headers the frontend expects.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use podcal_gateway::Gateway;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
}

/// Builds the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/feed", get(feed_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct FeedParams {
    url: Option<String>,
}

/// GET /api/feed?url=<percent-encoded feed URL>
///
/// 200 `{"data": Feed}` on success (cache hit or fresh fetch+parse);
/// 400 `{"error": string}` for a missing url param or any resolve
/// failure, matching the frontend's single error path.
async fn feed_handler(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> Response {
    let Some(url) = params.url else {
        return json_response(StatusCode::BAD_REQUEST, json!({ "error": "Missing URL" }));
    };

    match state.gateway.resolve(&url).await {
        Ok(feed) => json_response(StatusCode::OK, json!({ "data": feed })),
        Err(err) => {
            info!(url = %url, error = %err, "feed resolve failed");
            json_response(StatusCode::BAD_REQUEST, json!({ "error": err.to_string() }))
        }
    }
}

/// Serializes a body with the headers shared by every response:
/// permissive CORS and a short edge-cache hint, independent of the
/// backing cache store's TTL.
fn json_response(status: StatusCode, body: serde_json::Value) -> Response {
    (
        status,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            ),
            (
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            ),
            (
                header::CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=60"),
            ),
        ],
        body.to_string(),
    )
        .into_response()
}

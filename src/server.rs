use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State, rejection::BytesRejection},
    http::header,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{
    config::AppConfig, error::RelayError, relay::relay_response, summarize::SummarizeRequest,
    upstream::UpstreamClient,
};

const INDEX_HTML: &str = include_str!("../static/index.html");
const APP_JS: &str = include_str!("../static/app.js");

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub upstream: Arc<UpstreamClient>,
}

pub fn build_router(config: Arc<AppConfig>, upstream: Arc<UpstreamClient>) -> Router {
    let body_limit = DefaultBodyLimit::max(config.max_body_bytes);
    let state = AppState { config, upstream };

    Router::new()
        .route("/", get(index))
        .route("/static/app.js", get(app_js))
        .route("/health", get(health))
        .route("/summarize", post(summarize).layer(body_limit))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn app_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        APP_JS,
    )
}

async fn health() -> &'static str {
    "ok"
}

/// Parses the body as JSON whatever its content type, sanitizes it and
/// relays the upstream answer. Body read failures are reported as JSON too.
async fn summarize(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, RelayError> {
    let body = body?;
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| RelayError::BadRequest(format!("Failed to decode JSON object: {e}")))?;
    let request = SummarizeRequest::from_json(payload)?;

    info!(
        upstream = %state.config.api_url,
        chars = request.text.chars().count(),
        max_tokens = request.max_tokens,
        back_translate = request.back_translate,
        "forwarding summarize request"
    );

    let result = match state.upstream.summarize(&request).await {
        Ok(upstream) => relay_response(upstream).await,
        Err(err) => Err(err),
    };
    if let Err(ref err) = result {
        warn!(error = %err, "summarize relay failed");
    }
    result
}

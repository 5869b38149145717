use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::state::AppState;
use crate::ui;

pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/health", get(health))
        .route("/", get(home_page))
        .route("/login", get(login_page).post(forward))
        .route("/logout", get(forward))
        .route("/query", post(forward))
        .route("/chat_history", get(forward))
        .route("/upload", post(forward))
        .route("/reports", get(forward))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn home_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(ui::render_home_page(&state.config.app_title))
}

async fn login_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(ui::render_login_page(&state.config.app_title))
}

/// Relays the request to the backend as-is. Authentication, uploads and chat
/// answers are all the backend's business.
async fn forward(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    state
        .upstream
        .forward(method, path_and_query, &headers, body)
        .await
        .map_err(|err| {
            warn!("backend unavailable for {path_and_query}: {err:#}");
            ApiError::bad_gateway(format!("{err:#}"))
        })
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    detail: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: "backend unavailable".to_string(),
            detail: self.message,
        });
        (self.status, body).into_response()
    }
}

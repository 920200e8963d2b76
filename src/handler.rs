//! HTTP request handlers for the link API
//!
//! Each handler unpacks the request, calls the `LinkService` and wraps the
//! result in the `{ok, ...}` envelope. Failures render through
//! `LinkError`'s `IntoResponse`.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

use crate::error::LinkError;
use crate::model::{CreateRequest, HealthResponse, LinkResponse, LinksResponse, ListParams};
use crate::query::SortKey;
use crate::service::LinkService;

pub const VERSION: &str = "1.0";

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<LinkService>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(service: LinkService) -> Self {
        Self {
            service: Arc::new(service),
            started_at: Instant::now(),
        }
    }
}

/// Runs a store call on the blocking pool, off the async workers
async fn with_service<T, F>(state: &AppState, f: F) -> Result<T, LinkError>
where
    F: FnOnce(&LinkService) -> Result<T, LinkError> + Send + 'static,
    T: Send + 'static,
{
    let service = Arc::clone(&state.service);
    tokio::task::spawn_blocking(move || f(&service))
        .await
        .map_err(|err| LinkError::persistence(format!("store task failed: {}", err)))?
}

/// Maps a body that is not a usable JSON object onto the error envelope
fn body_error(rejection: JsonRejection) -> LinkError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => LinkError::missing_target(),
        other => LinkError::invalid_body(other.body_text()),
    }
}

/// Percent-encodes targets that are not plain ASCII so they fit a header
///
/// ASCII targets go out exactly as stored.
fn location_for(target: String) -> String {
    if target.is_ascii() {
        return target;
    }
    match Url::parse(&target) {
        Ok(parsed) => parsed.as_str().to_string(),
        Err(_) => target,
    }
}

/// Creates a new short link
///
/// # Request Body
///
/// ```json
/// {
///   "target": "https://example.com/very/long/url",
///   "code": "abc123"  // Optional
/// }
/// ```
///
/// # Response
///
/// - **201 Created** - `{ok: true, link}`
/// - **400 Bad Request** - missing/invalid target, malformed code or unreadable body
/// - **409 Conflict** - code already taken (in any letter case)
pub async fn create_link(
    State(state): State<AppState>,
    payload: Result<Json<CreateRequest>, JsonRejection>,
) -> Result<Response, LinkError> {
    let Json(payload) = payload.map_err(body_error)?;
    let target = payload.target.unwrap_or_default();
    let code = payload.code;

    let link = with_service(&state, move |service| service.create(&target, code.as_deref())).await?;

    Ok((StatusCode::CREATED, Json(LinkResponse { ok: true, link })).into_response())
}

/// Lists links, optionally filtered by `q` and ordered by `sort`
///
/// An unrecognised `sort` value falls back to `created_desc`.
pub async fn list_links(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<LinksResponse>, LinkError> {
    let sort = params
        .sort
        .as_deref()
        .and_then(|raw| raw.parse::<SortKey>().ok())
        .unwrap_or_default();
    let q = params.q.unwrap_or_default();

    let links = with_service(&state, move |service| Ok(service.list(&q, sort))).await?;

    Ok(Json(LinksResponse { ok: true, links }))
}

/// Returns the stats of a single link
pub async fn get_link(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, LinkError> {
    let link = with_service(&state, move |service| service.get(&code)).await?;
    Ok(Json(LinkResponse { ok: true, link }))
}

/// Deletes a link
///
/// - **200 OK** - `{ok: true}`
/// - **404 Not Found** - no such code
pub async fn delete_link(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, LinkError> {
    with_service(&state, move |service| service.delete(&code)).await?;
    Ok(Json(json!({ "ok": true })))
}

/// Redirects a short code to its target with **302 Found**
///
/// The click is counted before the redirect is sent. Unknown and
/// reserved codes answer with a plain-text 404.
pub async fn redirect_link(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Response {
    match with_service(&state, move |service| service.resolve_and_track(&code)).await {
        Ok(target) => {
            (StatusCode::FOUND, [(header::LOCATION, location_for(target))]).into_response()
        }
        Err(LinkError::NotFound(_)) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(err) => err.into_response(),
    }
}

/// Liveness probe with version and uptime
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        version: VERSION,
        uptime_seconds: state.started_at.elapsed().as_secs(),
        time: Utc::now(),
    })
}

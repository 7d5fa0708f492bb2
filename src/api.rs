use std::any::Any;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;

use crate::models::{ImageQuery, ImagesResponse, ScrapeQuery, ScrapeResponse};
use crate::service::SearchService;

// ── Error responses ──────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({"error": message}))).into_response()
            }
            Self::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"success": false, "error": message})),
            )
                .into_response(),
        }
    }
}

/// Maps a caught handler panic to the 500 envelope.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected internal error".to_string()
    };
    ApiError::internal(message).into_response()
}

// ── Router ───────────────────────────────────────────────────────────────────

pub fn create_router(service: Arc<SearchService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search_images", get(search_images))
        .route("/scrape_sites", get(scrape_sites))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(service)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn search_images(
    State(service): State<Arc<SearchService>>,
    Query(params): Query<ImageQuery>,
) -> Result<Json<ImagesResponse>, ApiError> {
    let query = require_query(params.query.as_deref())?;
    let num_images = parse_count(
        params.num_images.as_deref(),
        5,
        1,
        20,
        "Number of images must be between 1 and 20",
    )?;

    let results = service.search_images(&query, num_images).await;
    Ok(Json(ImagesResponse {
        success: true,
        query,
        results,
    }))
}

async fn scrape_sites(
    State(service): State<Arc<SearchService>>,
    Query(params): Query<ScrapeQuery>,
) -> Result<Json<ScrapeResponse>, ApiError> {
    let query = require_query(params.query.as_deref())?;
    let num_results = parse_count(
        params.num_results.as_deref(),
        5,
        1,
        10,
        "Number of results must be between 1 and 10",
    )?;

    let results = service.scrape_sites(&query, num_results).await;
    Ok(Json(ScrapeResponse {
        success: true,
        query,
        results,
    }))
}

// ── Parameter validation ─────────────────────────────────────────────────────

/// The query must be present and contain something other than whitespace. The
/// raw value is passed through unmodified.
fn require_query(raw: Option<&str>) -> Result<String, ApiError> {
    match raw {
        Some(q) if !q.trim().is_empty() => Ok(q.to_string()),
        _ => Err(ApiError::bad_request("Query parameter is required")),
    }
}

/// Parse an optional count parameter, enforcing `min..=max`. Anything that is
/// not an integer in range gets the endpoint's own range message.
fn parse_count(
    raw: Option<&str>,
    default: i64,
    min: i64,
    max: i64,
    message: &str,
) -> Result<usize, ApiError> {
    let value: i64 = match raw {
        Some(s) => s
            .trim()
            .parse()
            .map_err(|_| ApiError::bad_request(message))?,
        None => default,
    };
    if value < min || value > max {
        return Err(ApiError::bad_request(message));
    }
    Ok(value as usize)
}

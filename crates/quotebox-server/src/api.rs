//! Route handlers for the quote API.

use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Json, Query,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use quotebox_store::{likes_threshold, CreatedQuote, Quote, QuoteStore, StoreError};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

/// Query string for `GET /id`.
///
/// The id stays a string here so that a malformed value surfaces as a
/// validation failure instead of an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct QuoteIdQuery {
    pub id: Option<String>,
}

/// Request body for `POST /new`.
#[derive(Debug, Deserialize)]
pub struct NewQuoteRequest {
    pub name: String,
    pub quote: String,
}

/// Request body for `POST /like`.
#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    pub id: serde_json::Number,
}

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request format")]
    InvalidRequestFormat,
    #[error("Invalid quote ID")]
    InvalidQuoteId,
    #[error("No quotes available")]
    NoQuotes,
    #[error("internal server error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        tracing::error!(error = %e, "quote store operation failed");
        ApiError::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::InvalidRequestFormat | ApiError::InvalidQuoteId => StatusCode::BAD_REQUEST,
            ApiError::NoQuotes => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Internal details are logged where they occur, never echoed.
        let message = match self {
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

/// Converts an integral floating point value to `i64`.
fn integral_to_i64(value: f64) -> Option<i64> {
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    if value.is_finite() && value.fract() == 0.0 && in_range {
        Some(value as i64)
    } else {
        None
    }
}

/// Coerces a query-string value into a quote id.
///
/// Surrounding whitespace is ignored and integral decimal forms such as
/// `"7.0"` or `"7e0"` are accepted. Empty, fractional and non-numeric input
/// yields `None`.
pub fn coerce_quote_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(id) = trimmed.parse::<i64>() {
        return Some(id);
    }
    trimmed.parse::<f64>().ok().and_then(integral_to_i64)
}

/// Reads a JSON number as a quote id. Fractional numbers are rejected.
pub fn json_quote_id(number: &serde_json::Number) -> Option<i64> {
    number
        .as_i64()
        .or_else(|| number.as_f64().and_then(integral_to_i64))
}

/// Runs a store call sequence on the blocking pool.
async fn with_store<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&QuoteStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let store = state.store().await?;
    tokio::task::spawn_blocking(move || f(&store))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "store task join error");
            ApiError::Internal(format!("task join error: {}", e))
        })?
        .map_err(ApiError::from)
}

/// Handler for `GET /handshake`. Liveness probe; never touches storage.
pub async fn handshake_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Handler for `GET /random`.
///
/// Draws an id uniformly from `1..=count` and returns that quote.
pub async fn random_quote_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Quote>, ApiError> {
    let quote = with_store(&state, |store| {
        let stats = store.stats()?;
        if stats.count < 1 {
            return Ok(None);
        }
        let id = rand::thread_rng().gen_range(1..=stats.count);
        store.quote_by_id(id)
    })
    .await?;

    match quote {
        Some(quote) => Ok(Json(quote)),
        None => {
            tracing::debug!("random draw found no quote");
            Err(ApiError::NoQuotes)
        }
    }
}

/// Handler for `GET /popular`.
///
/// Picks uniformly among quotes whose likes reach 75% of the current maximum.
pub async fn popular_quote_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Quote>, ApiError> {
    let candidates = with_store(&state, |store| {
        let stats = store.stats()?;
        store.quotes_with_likes_at_least(likes_threshold(stats.max_likes))
    })
    .await?;

    match candidates.choose(&mut rand::thread_rng()) {
        Some(quote) => Ok(Json(quote.clone())),
        None => {
            tracing::debug!("no popular quote candidates");
            Err(ApiError::NoQuotes)
        }
    }
}

/// Handler for `GET /id?id=<int>`.
pub async fn get_quote_handler(
    Extension(state): Extension<Arc<AppState>>,
    query: Result<Query<QuoteIdQuery>, QueryRejection>,
) -> Result<Json<Quote>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected quote id query");
        ApiError::InvalidRequestFormat
    })?;
    let id = query
        .id
        .as_deref()
        .and_then(coerce_quote_id)
        .ok_or(ApiError::InvalidRequestFormat)?;

    let quote = with_store(&state, move |store| store.quote_by_id(id)).await?;
    quote.map(Json).ok_or_else(|| {
        tracing::debug!(id, "quote not found");
        ApiError::InvalidQuoteId
    })
}

/// Handler for `POST /new`.
pub async fn new_quote_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<NewQuoteRequest>, JsonRejection>,
) -> Result<Json<CreatedQuote>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected new quote body");
        ApiError::InvalidRequestFormat
    })?;
    if payload.name.is_empty() || payload.quote.is_empty() {
        return Err(ApiError::InvalidRequestFormat);
    }

    let created = with_store(&state, move |store| {
        store.create_quote(&payload.name, &payload.quote)
    })
    .await?;

    tracing::info!(id = created.id, "quote created");
    Ok(Json(created))
}

/// Handler for `POST /like`.
pub async fn like_quote_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<LikeRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected like body");
        ApiError::InvalidRequestFormat
    })?;
    let id = json_quote_id(&payload.id).ok_or(ApiError::InvalidRequestFormat)?;

    let liked = with_store(&state, move |store| {
        if store.quote_by_id(id)?.is_none() {
            return Ok(false);
        }
        store.increment_likes(id)?;
        Ok(true)
    })
    .await?;

    if !liked {
        tracing::debug!(id, "like for unknown quote");
        return Err(ApiError::InvalidQuoteId);
    }

    tracing::info!(id, "quote liked");
    Ok(StatusCode::NO_CONTENT)
}

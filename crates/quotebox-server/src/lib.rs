//! quotebox server library logic.

pub mod api;
pub mod config;
pub mod telemetry;

use api::ApiError;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};
use quotebox_db::DbRuntimeSettings;
use quotebox_store::QuoteStore;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Maximum request body size (64 KiB). Quotes are short.
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Application state shared across all request handlers.
///
/// The quote store is opened on first use and then reused for the lifetime
/// of the process.
#[derive(Debug)]
pub struct AppState {
    /// Storage binding (SQLite path). `None` means storage is unavailable.
    binding: Option<String>,
    /// Pool tunables used when the store is opened.
    settings: DbRuntimeSettings,
    store: OnceCell<QuoteStore>,
}

impl AppState {
    /// Creates state that opens the store lazily from `binding`.
    pub fn new(binding: Option<String>, settings: DbRuntimeSettings) -> Self {
        Self {
            binding,
            settings,
            store: OnceCell::new(),
        }
    }

    /// Creates state around an already opened store.
    pub fn with_store(store: QuoteStore) -> Self {
        Self {
            binding: None,
            settings: DbRuntimeSettings::default(),
            store: OnceCell::new_with(Some(store)),
        }
    }

    /// Returns the quote store, opening it on the first call.
    ///
    /// A failed open is not cached; the next call tries again.
    pub async fn store(&self) -> Result<QuoteStore, ApiError> {
        let store = self
            .store
            .get_or_try_init(|| async {
                let binding = self.binding.clone();
                let settings = self.settings;
                tokio::task::spawn_blocking(move || QuoteStore::open(binding.as_deref(), settings))
                    .await
                    .map_err(|e| ApiError::Internal(format!("task join error: {}", e)))?
                    .map_err(ApiError::from)
            })
            .await?;
        Ok(store.clone())
    }
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/handshake", get(api::handshake_handler))
        .route("/random", get(api::random_quote_handler))
        .route("/popular", get(api::popular_quote_handler))
        .route("/id", get(api::get_quote_handler))
        .route("/new", post(api::new_quote_handler))
        .route("/like", post(api::like_quote_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}

//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for accounts, entries and transfers
//! - Translation of ledger errors into JSON error responses

pub mod error;
pub mod routes;

use axum::Router;
use std::sync::Arc;
use tally_db::Store;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Ledger store over the database pool.
    pub store: Arc<Store>,
}

impl AppState {
    /// Creates application state around a store.
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

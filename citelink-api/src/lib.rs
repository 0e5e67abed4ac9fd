//! citelink-api library - citation resolution service
//!
//! Serves the backing document with citation markers rewritten into links
//! and each item's sources split into cited and non-cited lists.

use std::sync::Arc;

use axum::Router;
use citelink_common::{CitationResolver, DocumentLoader};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

/// Application state shared across HTTP handlers
///
/// Built once at startup; holds no mutable state.
#[derive(Clone)]
pub struct AppState {
    /// Source of raw content records, reloaded per request
    pub loader: Arc<dyn DocumentLoader>,
    /// Citation resolver applied to every record
    pub resolver: CitationResolver,
}

impl AppState {
    /// Create new application state
    pub fn new(loader: Arc<dyn DocumentLoader>, resolver: CitationResolver) -> Self {
        Self { loader, resolver }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::data_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

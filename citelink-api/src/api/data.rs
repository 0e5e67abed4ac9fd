//! Resolved content endpoint

use axum::{extract::State, routing::get, Json, Router};
use citelink_common::ResolvedRecord;
use tracing::{debug, info};

use crate::error::ApiResult;
use crate::AppState;

/// GET /data
///
/// Loads the backing document and returns every record with citations
/// resolved, in document order. Nothing is cached between requests.
pub async fn get_data(State(state): State<AppState>) -> ApiResult<Json<Vec<ResolvedRecord>>> {
    let records = state.loader.load().await?;

    let resolved: Vec<ResolvedRecord> = records
        .iter()
        .map(|record| state.resolver.resolve(record))
        .collect();

    let cited: usize = resolved.iter().map(|r| r.cited_sources.len()).sum();
    info!("Served {} records", resolved.len());
    debug!("{} cited sources across {} records", cited, resolved.len());

    Ok(Json(resolved))
}

/// Build resolved content routes
pub fn data_routes() -> Router<AppState> {
    Router::new().route("/data", get(get_data))
}

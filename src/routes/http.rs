// GET handlers: prices, health, version

use axum::{extract::State, response::IntoResponse};

use super::AppState;
use crate::models::AggregateSnapshotDisplay;
use crate::version::{NAME, VERSION};

/// GET /prices — the cached aggregate, however old; aggregates on demand only
/// when the cache is empty. Always 200: a provider with no data serves an
/// empty array rather than failing the response.
pub(super) async fn prices_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.query.get_prices().await;
    axum::Json(AggregateSnapshotDisplay::from(snapshot.as_ref()))
}

/// GET /health — 200 unconditionally once the listener is bound.
pub(super) async fn health_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

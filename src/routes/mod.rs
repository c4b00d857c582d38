// HTTP routes

mod http;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};

use crate::query::QueryService;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) query: Arc<QueryService>,
}

pub fn app(query: Arc<QueryService>) -> Router {
    let state = AppState { query };
    Router::new()
        .route("/prices", get(http::prices_handler)) // GET /prices
        .route("/health", get(http::health_handler)) // GET /health
        .route("/version", get(http::version_handler)) // GET /version
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

// libs/video-conferencing-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers::*;

/// Diagnostic routes for meeting provisioning, nested under `/meetings`.
pub fn meeting_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/health", get(check_graph_access))
        .with_state(state)
}

use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use shared_config::AppConfig;
use video_conferencing_cell::router::meeting_routes;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic notifications service is running!" }))
        .nest("/meetings", meeting_routes(state))
}

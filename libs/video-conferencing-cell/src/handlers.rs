// libs/video-conferencing-cell/src/handlers.rs
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::AccessCheck;
use crate::services::GraphMeetingClient;

/// Runs the Graph access diagnostic against the configured mailbox.
#[axum::debug_handler]
pub async fn check_graph_access(
    State(state): State<Arc<AppConfig>>,
) -> Result<(StatusCode, Json<AccessCheck>), AppError> {
    let client =
        GraphMeetingClient::new(&state).map_err(|e| AppError::NotConfigured(e.to_string()))?;

    let check = client.check_access().await;
    let status = if check.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };

    Ok((status, Json(check)))
}

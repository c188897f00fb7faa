use crate::interface_adapters::http::ErrorResponse;
use crate::interface_adapters::state::AppState;
use crate::use_cases::GameEvent;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::info;

/// Force a zombie into the arena for manual testing.
pub async fn spawn_zombie_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (reply_tx, reply_rx) = oneshot::channel();
    let sent = state
        .input_tx
        .send(GameEvent::SpawnZombie { reply: reply_tx })
        .await;

    match (sent, reply_rx.await) {
        (Ok(()), Ok(zombie_id)) => {
            info!(zombie_id, "zombie spawned via debug route");
            (StatusCode::OK, format!("zombie {zombie_id} spawned")).into_response()
        }
        _ => ErrorResponse {
            error: "world unavailable".to_string(),
        }
        .into_response_with(StatusCode::SERVICE_UNAVAILABLE),
    }
}

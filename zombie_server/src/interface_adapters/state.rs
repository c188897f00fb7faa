use crate::use_cases::GameEvent;
use axum::extract::ws::Utf8Bytes;
use std::path::PathBuf;
use tokio::sync::{broadcast, mpsc, watch};

#[derive(Clone)]
pub struct AppState {
    // Inputs flowing from the network into the world task.
    pub input_tx: mpsc::Sender<GameEvent>,
    // Serialized world events, shared across all connections.
    pub world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    // Latest serialized snapshot for lag recovery.
    pub world_latest_tx: watch::Sender<Utf8Bytes>,
    // Directory the client bundle is served from.
    pub static_dir: PathBuf,
}

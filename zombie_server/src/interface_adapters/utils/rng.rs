use std::sync::{
    OnceLock,
    atomic::{AtomicU64, Ordering},
};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Connection id used only to correlate log lines for one socket.
///
/// Seeded from the clock so ids from different runs don't line up in aggregated logs.
pub fn next_conn_id() -> u64 {
    static COUNTER: OnceLock<AtomicU64> = OnceLock::new();
    let counter = COUNTER.get_or_init(|| {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_micros() as u64;
        AtomicU64::new(seed)
    });
    counter.fetch_add(1, Ordering::Relaxed)
}

/// Opaque, unguessable id handed to a player for the lifetime of its session.
pub fn new_player_id() -> String {
    Uuid::new_v4().to_string()
}

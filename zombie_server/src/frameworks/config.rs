use std::{env, net::IpAddr, path::PathBuf, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub fn http_host() -> IpAddr {
    env::var("GAME_SERVER_HOST")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(IpAddr::from([127, 0, 0, 1]))
}

pub fn http_port() -> u16 {
    env::var("GAME_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000)
}

pub fn static_dir() -> PathBuf {
    env::var("STATIC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("public"))
}

pub fn debug_routes_enabled() -> bool {
    parse_flag(env::var("DEBUG_ROUTES").ok().as_deref(), true)
}

fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if v == "0" || v == "false" => false,
        Some(v) if v == "1" || v == "true" => true,
        _ => default,
    }
}

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const WORLD_BROADCAST_CAPACITY: usize = 128;

pub const TICK_INTERVAL: Duration = Duration::from_millis(50);
pub const KILL_LOG_CAPACITY: usize = 10;

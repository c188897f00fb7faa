// Framework bootstrap for the game server runtime.

use crate::frameworks::config;
use crate::interface_adapters::http::{asset_handler, index_handler};
use crate::interface_adapters::net::{spawn_zombie_handler, world_event_serializer, ws_handler};
use crate::interface_adapters::state::AppState;
use crate::use_cases::game::world_task;
use crate::use_cases::{GameEvent, World, WorldEvent, WorldSettings};

use axum::{Router, extract::ws::Utf8Bytes, routing::get};
use std::net::SocketAddr;
use std::{io::Result, path::PathBuf, sync::Arc};
use tokio::sync::{broadcast, mpsc, watch};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    let static_dir = config::static_dir();
    let debug_routes = config::debug_routes_enabled();
    tracing::debug!(
        static_dir = %static_dir.display(),
        debug_routes,
        "http routes configured"
    );

    // build state
    let settings = WorldSettings {
        tick_interval: config::TICK_INTERVAL,
        kill_log_capacity: config::KILL_LOG_CAPACITY,
        ..WorldSettings::default()
    };
    let state = build_state(settings, static_dir);
    // Start the Web Server
    let app = router(state, debug_routes);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from((config::http_host(), config::http_port()));

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

pub fn router(state: Arc<AppState>, debug_routes: bool) -> Router {
    let mut app = Router::new().route("/ws", get(ws_handler));
    if debug_routes {
        app = app
            .route("/debug/spawn-zombie", get(spawn_zombie_handler))
            // Older path still referenced by manual-testing notes.
            .route("/debug-spawn-zombie", get(spawn_zombie_handler));
    }
    app.route("/", get(index_handler))
        .route("/{*path}", get(asset_handler))
        .with_state(state)
}

// Must be called from within a Tokio runtime; spawns the world and serializer tasks.
fn build_state(settings: WorldSettings, static_dir: PathBuf) -> Arc<AppState> {
    // Setup Channels
    // input_tx/rx: All client inputs go to the single World Task.
    let (input_tx, input_rx) = mpsc::channel::<GameEvent>(config::INPUT_CHANNEL_CAPACITY);

    // world_tx/rx: World events are broadcast to the serializer.
    let (world_tx, world_rx) =
        broadcast::channel::<WorldEvent>(config::WORLD_BROADCAST_CAPACITY);

    // world_bytes_tx/rx: Serialized world events shared across all clients.
    let (world_bytes_tx, _world_bytes_rx) =
        broadcast::channel::<Utf8Bytes>(config::WORLD_BROADCAST_CAPACITY);
    let (world_latest_tx, _world_latest_rx) = watch::channel::<Utf8Bytes>(Utf8Bytes::from(""));

    let tick_interval = settings.tick_interval;
    let world = World::new(settings);

    // Spawn the Game Loop (World Task)
    tokio::spawn(world_task(input_rx, world_tx, world, tick_interval));

    // Spawn the world event serializer task in the adapter layer.
    tokio::spawn(world_event_serializer(
        world_rx,
        world_bytes_tx.clone(),
        world_latest_tx.clone(),
    ));

    Arc::new(AppState {
        input_tx,
        world_bytes_tx,
        world_latest_tx,
        static_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn test_app(static_dir: PathBuf, debug_routes: bool) -> Router {
        router(
            build_state(WorldSettings::default(), static_dir),
            debug_routes,
        )
    }

    fn temp_static_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "zombie_server_{name}_{}",
            uuid::Uuid::new_v4().simple()
        ));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn when_debug_spawn_is_requested_then_zombie_id_is_returned() {
        let app = test_app(PathBuf::from("does-not-exist"), true);

        let (status, body) = get(app, "/debug/spawn-zombie").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("zombie "), "unexpected body: {body}");
        assert!(body.ends_with(" spawned"), "unexpected body: {body}");
    }

    #[tokio::test]
    async fn when_debug_routes_are_disabled_then_spawn_route_is_not_found() {
        let app = test_app(PathBuf::from("does-not-exist"), false);

        let (status, _) = get(app, "/debug/spawn-zombie").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn when_legacy_debug_path_is_requested_then_it_spawns_too() {
        let enabled = test_app(PathBuf::from("does-not-exist"), true);
        let (status, body) = get(enabled, "/debug-spawn-zombie").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("zombie "), "unexpected body: {body}");

        let disabled = test_app(PathBuf::from("does-not-exist"), false);
        let (status, _) = get(disabled, "/debug-spawn-zombie").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn when_index_exists_then_it_is_served_as_html() {
        let dir = temp_static_dir("index");
        std::fs::write(dir.join("index.html"), "<h1>zombies</h1>").expect("write index");
        let app = test_app(dir.clone(), true);

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "text/html; charset=utf-8"
        );
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn when_asset_is_missing_or_escapes_root_then_json_not_found() {
        let dir = temp_static_dir("missing");
        std::fs::write(dir.join("client.js"), "console.log(1)").expect("write asset");

        let (status, body) = get(test_app(dir.clone(), true), "/nope.png").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let value: serde_json::Value = serde_json::from_str(&body).expect("json error body");
        assert_eq!(value["error"], "not found");

        let (status, _) = get(test_app(dir.clone(), true), "/assets/../../client.js").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = get(test_app(dir.clone(), true), "/client.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "console.log(1)");

        let _ = std::fs::remove_dir_all(dir);
    }
}

use crate::domain::ZombieSnapshot;
use crate::interface_adapters::protocol::{
    ClientMessage, PointDto, ServerMessage, ZombieSpawnDto,
};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::rng::{new_player_id, next_conn_id};
use crate::use_cases::{GameEvent, WorldEvent};

use axum::{
    Error,
    extract::{
        State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures::SinkExt;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{Instrument, debug, error, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    InputClosed,
    WorldUpdatesClosed,
    JoinRejected,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const MAX_INVALID_JSON: u32 = 10;

/// Serialize each world event once and broadcast the shared bytes to every socket.
pub async fn world_event_serializer(
    mut world_rx: broadcast::Receiver<WorldEvent>,
    world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    world_latest_tx: watch::Sender<Utf8Bytes>,
) {
    loop {
        match world_rx.recv().await {
            Ok(event) => {
                let is_snapshot = matches!(event, WorldEvent::State(_));
                let msg = ServerMessage::from(event);
                let txt = match serde_json::to_string(&msg) {
                    Ok(txt) => txt,
                    Err(e) => {
                        error!(error = ?e, "failed to serialize world event");
                        continue;
                    }
                };

                let bytes = Utf8Bytes::from(txt);
                if is_snapshot {
                    // Store the latest snapshot for lag recovery.
                    let _ = world_latest_tx.send(bytes.clone());
                }
                let _ = world_bytes_tx.send(bytes);
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(
                    missed = n,
                    "world serializer lagged; skipping to latest event"
                );
            }
            Err(broadcast::error::RecvError::Closed) => {
                warn!("world events channel closed; serializer exiting");
                break;
            }
        }
    }
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| {
        // Separate connection id for correlating logs before/after a player_id exists.
        let conn_id = next_conn_id();
        let span = info_span!("conn", conn_id, player_id = tracing::field::Empty);
        handle_socket(socket, state).instrument(span)
    })
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut ctx = match bootstrap_connection(&mut socket, &state).await {
        Ok(ctx) => ctx,
        Err(e) => {
            error!(error = ?e, "failed to bootstrap connection");
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code: close_code::ERROR,
                    reason: "bootstrap failed".into(),
                })))
                .await;
            let _ = socket.close().await;
            return;
        }
    };

    tracing::Span::current().record("player_id", ctx.player_id.as_str());
    info!(player_id = %ctx.player_id, "client connected");

    // Main Client Loop
    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<usize, NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    let bytes = txt.len();
    socket
        .send(Message::Text(txt.into()))
        .await
        .map_err(NetError::Ws)?;
    Ok(bytes)
}

#[derive(Debug, Default)]
struct ConnStats {
    msgs_in: u64,
    msgs_out: u64,
    bytes_in: u64,
    bytes_out: u64,
    invalid_json: u32,
    // Count lag recovery snapshots sent to this client.
    lag_recovery_count: u64,
}

struct LogThrottle {
    input_full: Instant,
    world_lag: Instant,
    invalid_input: Instant,
}

impl LogThrottle {
    fn new() -> Self {
        // Backdate so the first occurrence of each warning is logged.
        let now = Instant::now()
            .checked_sub(LOG_THROTTLE)
            .unwrap_or_else(Instant::now);
        Self {
            input_full: now,
            world_lag: now,
            invalid_input: now,
        }
    }
}

struct ConnCtx {
    pub player_id: String,
    pub input_tx: mpsc::Sender<GameEvent>,
    pub world_bytes_rx: broadcast::Receiver<Utf8Bytes>,
    pub world_latest_rx: watch::Receiver<Utf8Bytes>,
    pub stats: ConnStats,
    pub throttle: LogThrottle,
    pub close_frame: Option<CloseFrame>,
}

async fn bootstrap_connection(
    socket: &mut WebSocket,
    state: &AppState,
) -> Result<ConnCtx, NetError> {
    // Subscribe to updates *before* doing anything else (awaits) to not miss packets.
    let world_bytes_rx = state.world_bytes_tx.subscribe();
    let world_latest_rx = state.world_latest_tx.subscribe();

    let player_id = new_player_id();

    // Notify World Task
    // Join happens before Init so the next snapshot already includes the new player.
    let (reply_tx, reply_rx) = oneshot::channel();
    state
        .input_tx
        .send(GameEvent::Join {
            player_id: player_id.clone(),
            reply: reply_tx,
        })
        .await
        .map_err(|_| NetError::InputClosed)?;
    let zombies = reply_rx.await.map_err(|_| NetError::JoinRejected)?;

    // If anything after Join fails, compensate with Leave to avoid "spawned but never connected".
    if let Err(e) = send_initial_sync(socket, &player_id, &zombies).await {
        state
            .input_tx
            .send(GameEvent::Leave { player_id })
            .await
            .map_err(|_| NetError::InputClosed)?; // InputClosed takes precedence
        return Err(e);
    }

    Ok(ConnCtx {
        player_id,
        input_tx: state.input_tx.clone(),
        world_bytes_rx,
        world_latest_rx,
        stats: ConnStats {
            msgs_out: 1 + zombies.len() as u64,
            ..ConnStats::default()
        },
        throttle: LogThrottle::new(),
        close_frame: None,
    })
}

// Unicast: who you are, then every zombie currently alive.
async fn send_initial_sync(
    socket: &mut WebSocket,
    player_id: &str,
    zombies: &[ZombieSnapshot],
) -> Result<(), NetError> {
    send_message(socket, &ServerMessage::Init(player_id.to_string())).await?;
    for zombie in zombies {
        send_message(socket, &ServerMessage::ZombieRespawn(ZombieSpawnDto::from(zombie))).await?;
    }
    Ok(())
}

enum LoopControl {
    Continue,
    Disconnect,
}

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    let mut fatal: Option<NetError> = None;

    loop {
        // disconnect becomes true on error
        let disconnect: bool = tokio::select! {
            // Incoming Message from Client
            incoming = socket.recv() => {
                match handle_incoming_ws(incoming, ctx).await {
                    Ok(LoopControl::Continue) => false,
                    Ok(LoopControl::Disconnect) => true,
                    Err(e) => {
                        fatal = Some(e);
                        true
                    }
                }
            }

            // Outgoing World Events
            world_msg = ctx.world_bytes_rx.recv() => {
                match world_msg {
                    Ok(bytes) => match forward_world_bytes(bytes, socket, &mut ctx.stats).await {
                        LoopControl::Continue => false,
                        LoopControl::Disconnect => true,
                    },
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        if should_log(&mut ctx.throttle.world_lag) {
                            warn!(missed = n, "world events lagged; sending snapshot");
                        }

                        // Resync strategy: send the latest world snapshot.
                        let latest = ctx.world_latest_rx.borrow().clone();
                        if latest.is_empty() {
                            false
                        } else {
                            ctx.stats.lag_recovery_count += 1;
                            match forward_world_bytes(latest, socket, &mut ctx.stats).await {
                                LoopControl::Continue => false,
                                LoopControl::Disconnect => true,
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        fatal = Some(NetError::WorldUpdatesClosed);
                        true
                    }
                }
            }
        };

        if disconnect {
            if let Some(frame) = ctx.close_frame.take() {
                let _ = socket.send(Message::Close(Some(frame))).await;
            }
            if let Err(err) = socket.close().await.map_err(NetError::Ws) {
                debug!(error = ?err, "socket close error");
            }
            break;
        }
    }

    if let Err(e) = disconnect_cleanup(ctx).await {
        warn!(error = ?e, "error during disconnect cleanup");
        if fatal.is_none() {
            fatal = Some(e);
        }
    }

    if let Some(err) = fatal {
        Err(err)
    } else {
        Ok(())
    }
}

async fn handle_incoming_ws(
    incoming: Option<Result<Message, Error>>,
    ctx: &mut ConnCtx,
) -> Result<LoopControl, NetError> {
    let player_id = ctx.player_id.as_str();
    match incoming {
        Some(Ok(msg)) => match msg {
            Message::Text(text) => {
                ctx.stats.msgs_in += 1;
                ctx.stats.bytes_in += text.len() as u64;

                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Move(point)) => {
                        let Some(point) = finite_point(point, player_id, &mut ctx.throttle) else {
                            return Ok(LoopControl::Continue);
                        };
                        let event = GameEvent::Move {
                            player_id: player_id.to_string(),
                            input: point.into(),
                        };
                        forward_input(ctx, event)
                    }
                    Ok(ClientMessage::Shoot(point)) => {
                        let Some(point) = finite_point(point, player_id, &mut ctx.throttle) else {
                            return Ok(LoopControl::Continue);
                        };
                        let event = GameEvent::Shoot {
                            player_id: player_id.to_string(),
                            target_x: point.x,
                            target_y: point.y,
                        };
                        forward_input(ctx, event)
                    }
                    Ok(ClientMessage::Respawn) => {
                        // Respawns must not be dropped, so wait for channel space.
                        ctx.input_tx
                            .send(GameEvent::Respawn {
                                player_id: player_id.to_string(),
                            })
                            .await
                            .map_err(|_| NetError::InputClosed)?;
                        Ok(LoopControl::Continue)
                    }
                    Err(parse_err) => {
                        ctx.stats.invalid_json += 1;
                        if should_log(&mut ctx.throttle.invalid_input) {
                            warn!(
                                player_id,
                                bytes = text.len(),
                                error = %parse_err,
                                "failed to parse client message"
                            );
                        }

                        if ctx.stats.invalid_json > MAX_INVALID_JSON {
                            ctx.close_frame = Some(CloseFrame {
                                code: close_code::POLICY,
                                reason: "too many invalid messages".into(),
                            });
                            return Ok(LoopControl::Disconnect);
                        }

                        Ok(LoopControl::Continue)
                    }
                }
            }
            Message::Binary(_) => {
                ctx.close_frame = Some(CloseFrame {
                    code: close_code::UNSUPPORTED,
                    reason: "binary messages not supported".into(),
                });
                Ok(LoopControl::Disconnect)
            }
            Message::Ping(_) | Message::Pong(_) => Ok(LoopControl::Continue),
            Message::Close(_) => Ok(LoopControl::Disconnect),
        },
        Some(Err(e)) => {
            warn!(player_id, error = %e, "websocket recv error");
            Ok(LoopControl::Disconnect)
        }
        None => {
            info!(player_id, "websocket closed");
            Ok(LoopControl::Disconnect)
        }
    }
}

// NaN/inf would poison positions for everyone once integrated.
fn finite_point(point: PointDto, player_id: &str, throttle: &mut LogThrottle) -> Option<PointDto> {
    if point.is_finite() {
        return Some(point);
    }
    if should_log(&mut throttle.invalid_input) {
        warn!(player_id, "invalid input values (NaN/inf); dropping");
    }
    None
}

fn forward_input(ctx: &mut ConnCtx, event: GameEvent) -> Result<LoopControl, NetError> {
    match ctx.input_tx.try_send(event) {
        Ok(()) => Ok(LoopControl::Continue),
        Err(mpsc::error::TrySendError::Full(_evt)) => {
            if should_log(&mut ctx.throttle.input_full) {
                warn!(player_id = %ctx.player_id, "input channel full; dropping input");
            }
            Ok(LoopControl::Continue)
        }
        Err(mpsc::error::TrySendError::Closed(_evt)) => Err(NetError::InputClosed),
    }
}

async fn forward_world_bytes(
    world_msg: Utf8Bytes,
    socket: &mut WebSocket,
    stats: &mut ConnStats,
) -> LoopControl {
    let bytes_len = world_msg.len();
    match socket
        .send(Message::Text(world_msg))
        .await
        .map_err(NetError::Ws)
    {
        Ok(()) => {
            stats.msgs_out += 1;
            stats.bytes_out += bytes_len as u64;
            LoopControl::Continue
        }
        Err(err) => {
            // Log unexpected send failures; disconnect will follow immediately.
            warn!(error = ?err, "failed to send world event");
            LoopControl::Disconnect
        }
    }
}

async fn disconnect_cleanup(ctx: &mut ConnCtx) -> Result<(), NetError> {
    let player_id = ctx.player_id.clone();
    ctx.input_tx
        .send(GameEvent::Leave {
            player_id: player_id.clone(),
        })
        .await
        .map_err(|_| NetError::InputClosed)?;

    let stats = &ctx.stats;
    debug!(
        player_id = %player_id,
        msgs_in = stats.msgs_in,
        msgs_out = stats.msgs_out,
        bytes_in = stats.bytes_in,
        bytes_out = stats.bytes_out,
        invalid_json = stats.invalid_json,
        lag_recovery_count = stats.lag_recovery_count,
        "connection stats"
    );
    info!(player_id = %player_id, "client disconnected");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_point_is_not_finite_then_it_is_dropped() {
        let mut throttle = LogThrottle::new();

        let inf = PointDto {
            x: f32::INFINITY,
            y: 0.0,
        };
        let nan = PointDto {
            x: 1.0,
            y: f32::NAN,
        };
        assert!(finite_point(inf, "p1", &mut throttle).is_none());
        assert!(finite_point(nan, "p1", &mut throttle).is_none());
    }

    #[test]
    fn when_point_is_finite_then_it_passes_through() {
        let mut throttle = LogThrottle::new();

        let point = finite_point(PointDto { x: 3.0, y: -4.0 }, "p1", &mut throttle)
            .expect("finite point kept");

        assert_eq!((point.x, point.y), (3.0, -4.0));
    }

    #[test]
    fn when_warning_was_just_logged_then_next_one_is_throttled() {
        let mut last = Instant::now()
            .checked_sub(LOG_THROTTLE)
            .unwrap_or_else(Instant::now);

        assert!(should_log(&mut last));
        assert!(!should_log(&mut last));
    }
}

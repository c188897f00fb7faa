mod support;

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

async fn connect() -> Socket {
    let (socket, _) = connect_async(support::ws_url())
        .await
        .expect("websocket handshake");
    socket
}

// Next text frame as JSON; other frame kinds are skipped.
async fn next_json(socket: &mut Socket) -> Value {
    loop {
        let msg = tokio::time::timeout(RECV_TIMEOUT, socket.next())
            .await
            .expect("timed out waiting for frame")
            .expect("stream ended")
            .expect("websocket error");
        if msg.is_text() {
            let text = msg.to_text().expect("utf8 frame");
            return serde_json::from_str(text).expect("server frames are json");
        }
    }
}

async fn next_of_type(socket: &mut Socket, ty: &str, pred: impl Fn(&Value) -> bool) -> Value {
    loop {
        let value = next_json(socket).await;
        if value["type"] == ty && pred(&value["data"]) {
            return value["data"].clone();
        }
    }
}

async fn send_json(socket: &mut Socket, value: Value) {
    socket
        .send(Message::Text(value.to_string().into()))
        .await
        .expect("send frame");
}

async fn join(socket: &mut Socket) -> String {
    let init = next_json(socket).await;
    assert_eq!(init["type"], "init");
    init["data"].as_str().expect("init carries id").to_string()
}

#[tokio::test]
async fn when_client_connects_then_init_precedes_zombie_sync_and_state() {
    let mut socket = connect().await;

    let id = join(&mut socket).await;
    assert!(!id.is_empty());

    // At least one zombie is always alive, and the initial sync lists it before any snapshot.
    let second = next_json(&mut socket).await;
    assert_eq!(second["type"], "zombie_respawn", "got {second}");
    assert!(second["data"]["id"].is_u64());

    let state = next_of_type(&mut socket, "state", |d| d["players"].get(&id).is_some()).await;
    let me = &state["players"][&id];
    assert_eq!(me["hp"], 100);
    assert_eq!(me["dead"], false);
    assert!(state["killLog"].is_array());
}

#[tokio::test]
async fn when_client_moves_then_its_position_changes() {
    let mut socket = connect().await;
    let id = join(&mut socket).await;

    let before = next_of_type(&mut socket, "state", |d| d["players"].get(&id).is_some()).await;
    let start_x = before["players"][&id]["x"].as_f64().expect("x");

    // Head toward the arena centre; every spawn point has room in that direction.
    let dir = if start_x < 400.0 { 1.0 } else { -1.0 };
    send_json(&mut socket, json!({"type": "move", "data": {"x": dir, "y": 0.0}})).await;

    next_of_type(&mut socket, "state", |d| {
        d["players"][&id]["x"]
            .as_f64()
            .is_some_and(|x| (x - start_x).abs() > 1.0)
    })
    .await;
}

#[tokio::test]
async fn when_client_respawns_then_broadcast_carries_full_health() {
    let mut socket = connect().await;
    let id = join(&mut socket).await;

    send_json(&mut socket, json!({"type": "respawn"})).await;

    let respawn = next_of_type(&mut socket, "player_respawn", |d| d["id"] == id.as_str()).await;
    assert_eq!(respawn["hp"], 100);
}

#[tokio::test]
async fn when_client_floods_invalid_json_then_socket_is_closed_by_policy() {
    let mut socket = connect().await;
    join(&mut socket).await;

    for _ in 0..20 {
        if socket.send(Message::Text("not json".into())).await.is_err() {
            break;
        }
    }

    let close_code = loop {
        let next = tokio::time::timeout(RECV_TIMEOUT, socket.next())
            .await
            .expect("timed out waiting for close");
        match next {
            Some(Ok(Message::Close(frame))) => break frame.map(|f| u16::from(f.code)),
            Some(Ok(_)) => continue,
            Some(Err(_)) | None => break None,
        }
    };
    assert_eq!(close_code, Some(1008));
}

// Wire protocol DTOs and conversions for public game server messages.
// Frames are JSON objects of the form {"type": <event name>, "data": <payload>}.

use crate::domain::{
    Combatant, KillKind, KillLogEntry, MoveInput, PlayerSnapshot, ProjectileSnapshot,
    WorldSnapshot, ZombieSnapshot,
};
use crate::use_cases::WorldEvent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Killer/victim marker used for zombies in death and kill log payloads.
pub const ZOMBIE_SENTINEL: &str = "Zombie";

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    // Assigned identity for the connection.
    Init(String),
    // Zombie appeared: initial sync on connect, then every spawn/revival.
    ZombieRespawn(ZombieSpawnDto),
    // Full world snapshot, every tick.
    State(StateDto),
    Death(DeathDto),
    ZombieDead(ZombieDeadDto),
    PlayerRespawn(PlayerRespawnDto),
}

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    // Direction of travel; any magnitude, the server normalizes.
    Move(PointDto),
    // Absolute world-space point to fire at.
    Shoot(PointDto),
    Respawn,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PointDto {
    pub x: f32,
    pub y: f32,
}

impl PointDto {
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<PointDto> for MoveInput {
    fn from(point: PointDto) -> Self {
        Self {
            x: point.x,
            y: point.y,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ZombieSpawnDto {
    pub id: u64,
    pub x: f32,
    pub y: f32,
}

impl From<&ZombieSnapshot> for ZombieSpawnDto {
    fn from(z: &ZombieSnapshot) -> Self {
        Self {
            id: z.id,
            x: z.x,
            y: z.y,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeathDto {
    pub id: String,
    pub msg: String,
    pub killer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZombieDeadDto {
    pub id: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerRespawnDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub hp: i32,
}

/// Snapshot of the world sent to clients on each tick.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDto {
    pub tick: u64,
    pub players: BTreeMap<String, PlayerStateDto>,
    pub bullets: Vec<BulletStateDto>,
    pub zombies: Vec<ZombieStateDto>,
    pub kill_log: Vec<KillLogEntryDto>,
}

impl From<WorldSnapshot> for StateDto {
    fn from(snapshot: WorldSnapshot) -> Self {
        Self {
            tick: snapshot.tick,
            players: snapshot
                .players
                .iter()
                .map(|p| (p.id.clone(), PlayerStateDto::from(p)))
                .collect(),
            bullets: snapshot
                .projectiles
                .iter()
                .map(BulletStateDto::from)
                .collect(),
            zombies: snapshot.zombies.iter().map(ZombieStateDto::from).collect(),
            kill_log: snapshot
                .kill_log
                .iter()
                .map(KillLogEntryDto::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerStateDto {
    pub x: f32,
    pub y: f32,
    pub hp: i32,
    pub dead: bool,
    pub angle: f32,
    pub color: String,
    pub name: String,
}

impl From<&PlayerSnapshot> for PlayerStateDto {
    fn from(p: &PlayerSnapshot) -> Self {
        Self {
            x: p.x,
            y: p.y,
            hp: p.hp,
            dead: p.dead,
            angle: p.angle,
            color: p.color.clone(),
            name: p.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletStateDto {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub speed: f32,
    pub life: u32,
    pub color: String,
    pub owner_id: String,
    pub damage: i32,
}

impl From<&ProjectileSnapshot> for BulletStateDto {
    fn from(p: &ProjectileSnapshot) -> Self {
        Self {
            x: p.x,
            y: p.y,
            angle: p.angle,
            speed: p.speed,
            life: p.life,
            color: p.color.clone(),
            owner_id: p.owner_id.clone(),
            damage: p.damage,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ZombieStateDto {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub hp: i32,
    pub dead: bool,
    pub angle: f32,
    pub speed: f32,
}

impl From<&ZombieSnapshot> for ZombieStateDto {
    fn from(z: &ZombieSnapshot) -> Self {
        Self {
            id: z.id,
            x: z.x,
            y: z.y,
            hp: z.hp,
            dead: z.dead,
            angle: z.angle,
            speed: z.speed,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct KillLogEntryDto {
    pub killer: String,
    pub victim: String,
    #[serde(rename = "type")]
    pub kind: KillKindDto,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KillKindDto {
    PlayerKillsPlayer,
    PlayerKillsZombie,
    ZombieKillsPlayer,
}

impl From<KillKind> for KillKindDto {
    fn from(kind: KillKind) -> Self {
        match kind {
            KillKind::PlayerKillsPlayer => KillKindDto::PlayerKillsPlayer,
            KillKind::PlayerKillsZombie => KillKindDto::PlayerKillsZombie,
            KillKind::ZombieKillsPlayer => KillKindDto::ZombieKillsPlayer,
        }
    }
}

impl From<&KillLogEntry> for KillLogEntryDto {
    fn from(entry: &KillLogEntry) -> Self {
        Self {
            killer: combatant_label(&entry.killer),
            victim: combatant_label(&entry.victim),
            kind: entry.kind.into(),
        }
    }
}

fn combatant_label(c: &Combatant) -> String {
    match c {
        Combatant::Player(id) => id.clone(),
        Combatant::Zombie => ZOMBIE_SENTINEL.to_string(),
    }
}

impl From<WorldEvent> for ServerMessage {
    fn from(event: WorldEvent) -> Self {
        match event {
            WorldEvent::State(snapshot) => ServerMessage::State(snapshot.into()),
            WorldEvent::Death { victim, killer } => {
                let msg = match &killer {
                    Combatant::Player(_) => "Killed by a player!",
                    Combatant::Zombie => "Eaten by a zombie!",
                };
                ServerMessage::Death(DeathDto {
                    id: victim,
                    msg: msg.to_string(),
                    killer: combatant_label(&killer),
                })
            }
            WorldEvent::ZombieDead { zombie_id } => {
                ServerMessage::ZombieDead(ZombieDeadDto { id: zombie_id })
            }
            WorldEvent::ZombieRespawn { zombie_id, x, y } => {
                ServerMessage::ZombieRespawn(ZombieSpawnDto { id: zombie_id, x, y })
            }
            WorldEvent::PlayerRespawn {
                player_id,
                x,
                y,
                hp,
            } => ServerMessage::PlayerRespawn(PlayerRespawnDto {
                id: player_id,
                x,
                y,
                hp,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn when_client_sends_move_then_it_parses_with_payload() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"move","data":{"x":3,"y":-4}}"#).expect("valid");
        match msg {
            ClientMessage::Move(p) => assert_eq!((p.x, p.y), (3.0, -4.0)),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn when_client_sends_respawn_without_data_then_it_parses() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"respawn"}"#).expect("valid");
        assert!(matches!(msg, ClientMessage::Respawn));
    }

    #[test]
    fn when_client_sends_unknown_type_then_parse_fails() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"teleport"}"#).is_err());
    }

    #[test]
    fn when_shoot_has_no_coordinates_then_parse_fails() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"shoot","data":{}}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"move","data":{"x":1}}"#).is_err());
    }

    #[test]
    fn when_coordinate_overflows_f32_then_point_is_not_finite() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"move","data":{"x":1e39,"y":0}}"#).expect("valid");
        match msg {
            ClientMessage::Move(p) => assert!(!p.is_finite()),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn when_init_is_serialized_then_data_is_bare_player_id() {
        let value = serde_json::to_value(ServerMessage::Init("abc".to_string())).expect("json");
        assert_eq!(value, json!({"type": "init", "data": "abc"}));
    }

    #[test]
    fn when_zombie_kills_player_then_death_uses_zombie_sentinel() {
        let msg = ServerMessage::from(WorldEvent::Death {
            victim: "p1".to_string(),
            killer: Combatant::Zombie,
        });
        let value = serde_json::to_value(msg).expect("json");
        assert_eq!(value["type"], "death");
        assert_eq!(value["data"]["id"], "p1");
        assert_eq!(value["data"]["killer"], ZOMBIE_SENTINEL);
    }

    #[test]
    fn when_state_is_serialized_then_players_are_keyed_by_id_and_kill_log_is_camel_case() {
        let snapshot = WorldSnapshot {
            tick: 4,
            players: vec![PlayerSnapshot {
                id: "p1".to_string(),
                x: 1.0,
                y: 2.0,
                angle: 0.0,
                hp: 100,
                dead: false,
                color: "#123456".to_string(),
                name: "p1".to_string(),
            }],
            projectiles: vec![ProjectileSnapshot {
                owner_id: "p1".to_string(),
                x: 5.0,
                y: 6.0,
                angle: 0.0,
                speed: 600.0,
                life: 99,
                damage: 34,
                color: "#123456".to_string(),
            }],
            zombies: Vec::new(),
            kill_log: vec![KillLogEntry {
                killer: Combatant::Player("p1".to_string()),
                victim: Combatant::Zombie,
                kind: KillKind::PlayerKillsZombie,
            }],
        };

        let value: Value =
            serde_json::to_value(ServerMessage::from(WorldEvent::State(snapshot))).expect("json");

        assert_eq!(value["type"], "state");
        assert_eq!(value["data"]["players"]["p1"]["hp"], 100);
        assert_eq!(value["data"]["bullets"][0]["ownerId"], "p1");
        assert_eq!(
            value["data"]["killLog"][0],
            json!({"killer": "p1", "victim": "Zombie", "type": "player_kills_zombie"})
        );
    }
}

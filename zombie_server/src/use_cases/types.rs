// Use-case level inputs/outputs for the game loop.

use crate::domain::{Combatant, MoveInput, PlayerId, WorldSnapshot, ZombieSnapshot};
use tokio::sync::oneshot;

/// Everything the network layer can ask of the world task.
#[derive(Debug)]
pub enum GameEvent {
    /// A new session; the reply carries the living zombies for the initial sync.
    Join {
        player_id: PlayerId,
        reply: oneshot::Sender<Vec<ZombieSnapshot>>,
    },
    Leave {
        player_id: PlayerId,
    },
    Move {
        player_id: PlayerId,
        input: MoveInput,
    },
    Shoot {
        player_id: PlayerId,
        target_x: f32,
        target_y: f32,
    },
    Respawn {
        player_id: PlayerId,
    },
    /// Manual testing hook; replies with the new zombie id.
    SpawnZombie {
        reply: oneshot::Sender<u64>,
    },
}

/// Everything the world task broadcasts to connected sessions.
#[derive(Debug, Clone)]
pub enum WorldEvent {
    State(WorldSnapshot),
    Death {
        victim: PlayerId,
        killer: Combatant,
    },
    ZombieDead {
        zombie_id: u64,
    },
    ZombieRespawn {
        zombie_id: u64,
        x: f32,
        y: f32,
    },
    PlayerRespawn {
        player_id: PlayerId,
        x: f32,
        y: f32,
        hp: i32,
    },
}

// Domain-level simulation entities and snapshot types.

use super::kill_log::KillLogEntry;

/// Opaque session identifier assigned at connection time.
pub type PlayerId = String;

/// Raw movement intent as sent by the client; normalized during the tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveInput {
    pub x: f32,
    pub y: f32,
}

impl MoveInput {
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Unit-length direction, or the zero vector when there is no input.
    pub fn normalized(&self) -> (f32, f32) {
        let len = self.x.hypot(self.y);
        if len == 0.0 || !len.is_finite() {
            return (0.0, 0.0);
        }
        (self.x / len, self.y / len)
    }
}

/// Either side of a kill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Combatant {
    Player(PlayerId),
    Zombie,
}

/// Deaths produced by the combat systems during a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Fatality {
    ZombieSlain { zombie_id: u64, by: PlayerId },
    PlayerShot { victim: PlayerId, by: PlayerId },
    PlayerEaten { victim: PlayerId, zombie_id: u64 },
}

#[derive(Debug, Clone)]
pub struct SimPlayer {
    pub id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub angle: f32,

    // Combat state.
    pub hp: i32,
    pub alive: bool,

    // Latest movement intent (do not serialize to clients).
    pub input: MoveInput,

    // Presentation only.
    pub color: String,
    pub name: String,
}

impl SimPlayer {
    /// Apply damage, flooring health at zero. Returns true when this hit killed the player.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.alive {
            return false;
        }
        self.hp = (self.hp - amount).max(0);
        if self.hp == 0 {
            self.alive = false;
            self.input = MoveInput::default();
            return true;
        }
        false
    }
}

#[derive(Debug, Clone)]
pub struct SimZombie {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub hp: i32,
    pub alive: bool,
    pub speed: f32,
}

impl SimZombie {
    /// Apply damage, flooring health at zero. Returns true when this hit killed the zombie.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.alive {
            return false;
        }
        self.hp = (self.hp - amount).max(0);
        if self.hp == 0 {
            self.alive = false;
            return true;
        }
        false
    }
}

#[derive(Debug, Clone)]
pub struct SimProjectile {
    pub owner_id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub speed: f32,
    pub life: u32,
    pub damage: i32,
    pub color: String,
    // Set once the projectile has hit something this tick.
    pub spent: bool,
}

impl SimProjectile {
    pub fn is_live(&self) -> bool {
        !self.spent && self.life > 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub hp: i32,
    pub dead: bool,
    pub color: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZombieSnapshot {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub hp: i32,
    pub dead: bool,
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileSnapshot {
    pub owner_id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub speed: f32,
    pub life: u32,
    pub damage: i32,
    pub color: String,
}

/// Full world state broadcast at the end of every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub players: Vec<PlayerSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub zombies: Vec<ZombieSnapshot>,
    pub kill_log: Vec<KillLogEntry>,
}

impl From<&SimPlayer> for PlayerSnapshot {
    fn from(p: &SimPlayer) -> Self {
        Self {
            id: p.id.clone(),
            x: p.x,
            y: p.y,
            angle: p.angle,
            hp: p.hp,
            dead: !p.alive,
            color: p.color.clone(),
            name: p.name.clone(),
        }
    }
}

impl From<&SimZombie> for ZombieSnapshot {
    fn from(z: &SimZombie) -> Self {
        Self {
            id: z.id,
            x: z.x,
            y: z.y,
            angle: z.angle,
            hp: z.hp,
            dead: !z.alive,
            speed: z.speed,
        }
    }
}

impl From<&SimProjectile> for ProjectileSnapshot {
    fn from(p: &SimProjectile) -> Self {
        Self {
            owner_id: p.owner_id.clone(),
            x: p.x,
            y: p.y,
            angle: p.angle,
            speed: p.speed,
            life: p.life,
            damage: p.damage,
            color: p.color.clone(),
        }
    }
}

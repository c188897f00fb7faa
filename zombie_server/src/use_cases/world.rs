// Authoritative world state and the per-tick simulation step.

use super::types::{GameEvent, WorldEvent};
use crate::domain::systems::movement::{self, MovementConfig};
use crate::domain::systems::projectiles;
use crate::domain::systems::zombies::{self, ZombieConfig};
use crate::domain::tuning::{ArenaTuning, PlayerTuning, ProjectileTuning, ZombieTuning};
use crate::domain::{
    Combatant, Fatality, KillLog, KillLogEntry, MoveInput, PlayerId, PlayerSnapshot,
    ProjectileSnapshot, Schedule, ScheduledAction, SimPlayer, SimProjectile, SimZombie,
    WorldSnapshot, ZombieSnapshot,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::{debug, info};

/// Everything needed to build a world: gameplay tuning plus the tick length.
#[derive(Debug, Clone, Copy)]
pub struct WorldSettings {
    pub arena: ArenaTuning,
    pub player: PlayerTuning,
    pub projectile: ProjectileTuning,
    pub zombie: ZombieTuning,
    /// Fixed simulation step; speeds are scaled by its length in seconds.
    pub tick_interval: Duration,
    /// Number of kill log entries kept for the UI.
    pub kill_log_capacity: usize,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            arena: ArenaTuning::default(),
            player: PlayerTuning::default(),
            projectile: ProjectileTuning::default(),
            zombie: ZombieTuning::default(),
            tick_interval: Duration::from_millis(50),
            kill_log_capacity: 10,
        }
    }
}

impl WorldSettings {
    fn dt(&self) -> f32 {
        self.tick_interval.as_secs_f32()
    }

    // Rounded up so a revival never fires early.
    fn zombie_respawn_ticks(&self) -> u64 {
        let tick_ms = self.tick_interval.as_millis().max(1);
        self.zombie.respawn_delay.as_millis().div_ceil(tick_ms).max(1) as u64
    }
}

pub struct World {
    settings: WorldSettings,
    tick: u64,
    players: Vec<SimPlayer>,
    zombies: Vec<SimZombie>,
    projectiles: Vec<SimProjectile>,
    kill_log: KillLog,
    schedule: Schedule,
    next_zombie_id: u64,
    rng: StdRng,
}

impl World {
    pub fn new(settings: WorldSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Deterministic spawn points and colors, for tests.
    pub fn with_seed(settings: WorldSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: WorldSettings, rng: StdRng) -> Self {
        let mut world = Self {
            settings,
            tick: 0,
            players: Vec::new(),
            zombies: Vec::new(),
            projectiles: Vec::new(),
            kill_log: KillLog::new(settings.kill_log_capacity),
            schedule: Schedule::new(),
            next_zombie_id: 1,
            rng,
        };
        // The arena always opens with one zombie.
        world.spawn_zombie();
        world
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn players(&self) -> &[SimPlayer] {
        &self.players
    }

    pub fn zombies(&self) -> &[SimZombie] {
        &self.zombies
    }

    pub fn projectiles(&self) -> &[SimProjectile] {
        &self.projectiles
    }

    pub fn kill_log(&self) -> &KillLog {
        &self.kill_log
    }

    pub fn player(&self, player_id: &str) -> Option<&SimPlayer> {
        self.players.iter().find(|p| p.id == player_id)
    }

    fn player_mut(&mut self, player_id: &str) -> Option<&mut SimPlayer> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    fn living_player_mut(&mut self, player_id: &str) -> Option<&mut SimPlayer> {
        self.player_mut(player_id).filter(|p| p.alive)
    }

    /// Dispatch one inbound event. Replies for Join/SpawnZombie go straight to the
    /// requesting session; everything else is returned for broadcast.
    pub fn apply(&mut self, event: GameEvent) -> Vec<WorldEvent> {
        match event {
            GameEvent::Join { player_id, reply } => {
                let zombies = self.join(player_id);
                // The session may already be gone; the Leave that follows cleans up.
                let _ = reply.send(zombies);
                Vec::new()
            }
            GameEvent::Leave { player_id } => {
                self.leave(&player_id);
                Vec::new()
            }
            GameEvent::Move { player_id, input } => {
                self.set_move(&player_id, input);
                Vec::new()
            }
            GameEvent::Shoot {
                player_id,
                target_x,
                target_y,
            } => {
                self.shoot(&player_id, target_x, target_y);
                Vec::new()
            }
            GameEvent::Respawn { player_id } => vec![self.respawn(player_id)],
            GameEvent::SpawnZombie { reply } => {
                let event = self.spawn_zombie();
                if let WorldEvent::ZombieRespawn { zombie_id, .. } = event {
                    info!(zombie_id, "debug zombie spawned");
                    let _ = reply.send(zombie_id);
                }
                vec![event]
            }
        }
    }

    /// Create a player for a new session and return the living zombies it should draw.
    pub fn join(&mut self, player_id: PlayerId) -> Vec<ZombieSnapshot> {
        if self.player(&player_id).is_some() {
            debug!(player_id = %player_id, "duplicate join ignored");
        } else {
            let player = self.new_player(player_id);
            info!(player_id = %player.id, x = player.x, y = player.y, "player joined");
            self.players.push(player);
        }

        self.zombies
            .iter()
            .filter(|z| z.alive)
            .map(ZombieSnapshot::from)
            .collect()
    }

    /// Remove the player entirely. Its projectiles stay in flight.
    pub fn leave(&mut self, player_id: &str) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.id != player_id);
        let removed = self.players.len() != before;
        if removed {
            info!(player_id, "player left");
        }
        removed
    }

    /// Buffer raw movement input; normalization happens in the tick.
    pub fn set_move(&mut self, player_id: &str, input: MoveInput) -> bool {
        match self.living_player_mut(player_id) {
            Some(p) => {
                p.input = input;
                true
            }
            None => false,
        }
    }

    pub fn shoot(&mut self, player_id: &str, target_x: f32, target_y: f32) -> bool {
        let tuning = self.settings.projectile;
        let Some(p) = self.player(player_id).filter(|p| p.alive) else {
            return false;
        };

        // atan2(0, 0) == 0, so aiming at yourself fires along +x.
        let angle = (target_y - p.y).atan2(target_x - p.x);
        let projectile = SimProjectile {
            owner_id: p.id.clone(),
            x: p.x,
            y: p.y,
            angle,
            speed: tuning.speed,
            life: tuning.life_ticks,
            damage: tuning.damage,
            color: p.color.clone(),
            spent: false,
        };
        self.projectiles.push(projectile);
        true
    }

    /// Revive the player at a fresh spawn point, recreating it if the entity is gone.
    pub fn respawn(&mut self, player_id: PlayerId) -> WorldEvent {
        let max_hp = self.settings.player.max_hp;
        let (x, y) = self.pick_player_spawn();

        if self.player(&player_id).is_none() {
            debug!(player_id = %player_id, "respawn for missing player; recreating");
            let player = self.new_player(player_id.clone());
            self.players.push(player);
        }

        if let Some(p) = self.player_mut(&player_id) {
            p.hp = max_hp;
            p.alive = true;
            p.x = x;
            p.y = y;
            p.input = MoveInput::default();
        }
        info!(player_id = %player_id, x, y, "player respawned");

        WorldEvent::PlayerRespawn {
            player_id,
            x,
            y,
            hp: max_hp,
        }
    }

    /// Add a fresh zombie at the zombie spawn point.
    pub fn spawn_zombie(&mut self) -> WorldEvent {
        let (x, y) = self.settings.arena.zombie_spawn();
        let zombie_id = self.next_zombie_id;
        self.next_zombie_id += 1;
        self.zombies.push(SimZombie {
            id: zombie_id,
            x,
            y,
            angle: 0.0,
            hp: self.settings.zombie.max_hp,
            alive: true,
            speed: self.settings.zombie.speed,
        });
        WorldEvent::ZombieRespawn { zombie_id, x, y }
    }

    /// Advance the simulation by one fixed step and return the events to broadcast.
    /// The last event is always the full snapshot.
    pub fn advance_tick(&mut self) -> Vec<WorldEvent> {
        self.tick += 1;
        let mut events = Vec::new();
        let dt = self.settings.dt();
        let arena = self.settings.arena;

        // Deferred actions (zombie revivals) due this tick.
        while let Some(action) = self.schedule.pop_due(self.tick) {
            self.run_scheduled(action, &mut events);
        }

        let movement_cfg = MovementConfig {
            speed: self.settings.player.speed,
            arena,
        };
        for p in &mut self.players {
            movement::tick_player(p, dt, movement_cfg);
        }

        projectiles::advance_projectiles(&mut self.projectiles, dt, arena);

        // Zombies are checked first, so a projectile spent here never reaches a player.
        let slain = projectiles::hit_zombies(
            &mut self.projectiles,
            &mut self.zombies,
            self.settings.zombie.hit_radius,
        );
        self.record_fatalities(slain, &mut events);

        let shot = projectiles::hit_players(
            &mut self.projectiles,
            &mut self.players,
            self.settings.player.hit_radius,
        );
        self.record_fatalities(shot, &mut events);

        let zombie_cfg = ZombieConfig {
            stop_distance: self.settings.zombie.stop_distance,
            melee_range: self.settings.zombie.melee_range,
            bite_damage: self.settings.zombie.bite_damage,
            arena,
        };
        let eaten = zombies::tick_zombies(&mut self.zombies, &mut self.players, dt, zombie_cfg);
        self.record_fatalities(eaten, &mut events);

        projectiles::collect_spent(&mut self.projectiles);

        if !self.zombies.iter().any(|z| z.alive) {
            let event = self.spawn_zombie();
            info!(?event, "no zombies left; spawned a replacement");
            events.push(event);
        }

        events.push(WorldEvent::State(self.snapshot()));
        events
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            players: self.players.iter().map(PlayerSnapshot::from).collect(),
            projectiles: self
                .projectiles
                .iter()
                .map(ProjectileSnapshot::from)
                .collect(),
            zombies: self.zombies.iter().map(ZombieSnapshot::from).collect(),
            kill_log: self.kill_log.entries().cloned().collect(),
        }
    }

    fn record_fatalities(&mut self, fatalities: Vec<Fatality>, events: &mut Vec<WorldEvent>) {
        for fatality in fatalities {
            self.kill_log.push(KillLogEntry::from(&fatality));
            match fatality {
                Fatality::ZombieSlain { zombie_id, .. } => {
                    let due = self.tick + self.settings.zombie_respawn_ticks();
                    self.schedule
                        .push(due, ScheduledAction::ReviveZombie { zombie_id });
                    events.push(WorldEvent::ZombieDead { zombie_id });
                }
                Fatality::PlayerShot { victim, by } => {
                    info!(victim_id = %victim, killer_id = %by, "player killed by player");
                    events.push(WorldEvent::Death {
                        victim,
                        killer: Combatant::Player(by),
                    });
                }
                Fatality::PlayerEaten { victim, .. } => {
                    events.push(WorldEvent::Death {
                        victim,
                        killer: Combatant::Zombie,
                    });
                }
            }
        }
    }

    fn run_scheduled(&mut self, action: ScheduledAction, events: &mut Vec<WorldEvent>) {
        match action {
            ScheduledAction::ReviveZombie { zombie_id } => {
                let (x, y) = self.settings.arena.zombie_spawn();
                let max_hp = self.settings.zombie.max_hp;
                let Some(z) = self
                    .zombies
                    .iter_mut()
                    .find(|z| z.id == zombie_id && !z.alive)
                else {
                    return;
                };
                z.hp = max_hp;
                z.x = x;
                z.y = y;
                z.alive = true;
                debug!(zombie_id, "zombie revived");
                events.push(WorldEvent::ZombieRespawn { zombie_id, x, y });
            }
        }
    }

    fn pick_player_spawn(&mut self) -> (f32, f32) {
        let spawns = self.settings.arena.player_spawns();
        spawns
            .choose(&mut self.rng)
            .copied()
            .unwrap_or_else(|| self.settings.arena.zombie_spawn())
    }

    fn new_player(&mut self, id: PlayerId) -> SimPlayer {
        let (x, y) = self.pick_player_spawn();
        let color = format!("#{:06x}", self.rng.gen_range(0..=0xff_ffffu32));
        let name = id.chars().take(4).collect();
        SimPlayer {
            id,
            x,
            y,
            angle: 0.0,
            hp: self.settings.player.max_hp,
            alive: true,
            input: MoveInput::default(),
            color,
            name,
        }
    }
}

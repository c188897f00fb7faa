// Domain layer: core simulation types and rules.

pub mod kill_log;
pub mod schedule;
pub mod state;
pub mod systems;
pub mod tuning;

pub use kill_log::{KillKind, KillLog, KillLogEntry};
pub use schedule::{Schedule, ScheduledAction};
pub use state::{
    Combatant, Fatality, MoveInput, PlayerId, PlayerSnapshot, ProjectileSnapshot, SimPlayer,
    SimProjectile, SimZombie, WorldSnapshot, ZombieSnapshot,
};

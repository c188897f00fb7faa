// Gameplay tuning, kept apart from runtime/server configuration.

pub mod arena;
pub mod player;
pub mod projectile;
pub mod zombie;

pub use arena::ArenaTuning;
pub use player::PlayerTuning;
pub use projectile::ProjectileTuning;
pub use zombie::ZombieTuning;

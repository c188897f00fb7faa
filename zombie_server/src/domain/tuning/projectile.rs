/// Gameplay tuning for projectiles.

#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    /// Travel speed in world units per second.
    pub speed: f32,

    /// Lifetime in ticks before the projectile is despawned.
    pub life_ticks: u32,

    /// Health removed from whatever the projectile hits.
    pub damage: i32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 600.0,
            life_ticks: 100,
            damage: 34,
        }
    }
}

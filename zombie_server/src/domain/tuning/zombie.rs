use std::time::Duration;

/// Gameplay tuning for zombies.
#[derive(Debug, Clone, Copy)]
pub struct ZombieTuning {
    /// Health on spawn and revival.
    pub max_hp: i32,

    /// Chase speed in world units per second.
    pub speed: f32,

    /// Projectile hit radius against zombies.
    pub hit_radius: f32,

    /// Zombies stop closing in once they are this near their target.
    pub stop_distance: f32,

    /// Zombies bite while closer than this.
    pub melee_range: f32,

    /// Health removed from the target on every tick spent in melee range.
    pub bite_damage: i32,

    /// Delay between a zombie's death and its revival at the spawn point.
    pub respawn_delay: Duration,
}

impl Default for ZombieTuning {
    fn default() -> Self {
        Self {
            max_hp: 100,
            speed: 60.0,
            hit_radius: 25.0,
            stop_distance: 30.0,
            melee_range: 35.0,
            bite_damage: 1,
            respawn_delay: Duration::from_secs(3),
        }
    }
}

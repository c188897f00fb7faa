/// Gameplay tuning for player-controlled characters.
///
/// Keep this separate from runtime/server configuration (tick rates, buffer sizes, etc.).

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Movement speed in world units per second.
    pub speed: f32,

    /// Health on spawn and respawn.
    pub max_hp: i32,

    /// Projectile hit radius against players.
    pub hit_radius: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 180.0,
            max_hp: 100,
            hit_radius: 20.0,
        }
    }
}

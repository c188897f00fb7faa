// Per-tick simulation systems. Each one mutates entity collections in place and
// reports deaths back to the world.

pub mod movement;
pub mod projectiles;
pub mod zombies;

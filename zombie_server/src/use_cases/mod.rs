// Use cases layer: application workflows for the game server.

pub mod game;
pub mod types;
pub mod world;

pub use types::{GameEvent, WorldEvent};
pub use world::{World, WorldSettings};

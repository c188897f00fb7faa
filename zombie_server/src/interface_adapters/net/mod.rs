// Network adapter modules split by client sockets vs debug HTTP routes.

pub mod client;
pub mod debug;

pub use client::{world_event_serializer, ws_handler};
pub use debug::spawn_zombie_handler;

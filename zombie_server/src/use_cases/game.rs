use super::types::{GameEvent, WorldEvent};
use super::world::World;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time::MissedTickBehavior;
use tracing::{info, trace};

/// Single owner of the world. Inbound events and ticks are handled one at a time, so
/// neither ever observes the other half-applied.
pub async fn world_task(
    mut input_rx: mpsc::Receiver<GameEvent>,
    world_tx: broadcast::Sender<WorldEvent>,
    mut world: World,
    tick_interval: Duration,
) {
    // Drive the fixed-step game loop at the configured tick rate.
    let mut interval = tokio::time::interval(tick_interval);
    // Late ticks just run late; no burst of catch-up ticks.
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let events = tokio::select! {
            ev = input_rx.recv() => {
                match ev {
                    Some(ev) => {
                        trace!(?ev, "world event");
                        world.apply(ev)
                    }
                    None => {
                        // Every sender is gone; the server is shutting down.
                        info!(tick = world.tick(), "input channel closed; world task exiting");
                        break;
                    }
                }
            }
            _ = interval.tick() => world.advance_tick(),
        };

        for event in events {
            // No receivers just means nobody is connected right now.
            let _ = world_tx.send(event);
        }
    }
}

use crate::domain::state::{Fatality, SimPlayer, SimZombie};
use crate::domain::tuning::ArenaTuning;
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct ZombieConfig {
    pub stop_distance: f32,
    pub melee_range: f32,
    pub bite_damage: i32,
    pub arena: ArenaTuning,
}

/// Chase the nearest living player and bite when in melee range.
pub fn tick_zombies(
    zombies: &mut [SimZombie],
    players: &mut [SimPlayer],
    dt: f32,
    cfg: ZombieConfig,
) -> Vec<Fatality> {
    let mut fatalities = Vec::new();

    for z in zombies.iter_mut() {
        if !z.alive {
            continue;
        }

        if let Some(target_idx) = nearest_living_player(z, players) {
            let target = &mut players[target_idx];
            let dx = target.x - z.x;
            let dy = target.y - z.y;
            let dist = dx.hypot(dy);
            z.angle = dy.atan2(dx);

            if dist > cfg.stop_distance {
                z.x += (dx / dist) * z.speed * dt;
                z.y += (dy / dist) * z.speed * dt;
            }

            if dist < cfg.melee_range && target.take_damage(cfg.bite_damage) {
                info!(victim_id = %target.id, zombie_id = z.id, "player eaten");
                fatalities.push(Fatality::PlayerEaten {
                    victim: target.id.clone(),
                    zombie_id: z.id,
                });
            }
        }

        (z.x, z.y) = cfg.arena.clamp(z.x, z.y);
    }

    fatalities
}

// Ties keep the first player encountered.
fn nearest_living_player(z: &SimZombie, players: &[SimPlayer]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, p) in players.iter().enumerate() {
        if !p.alive {
            continue;
        }
        let d2 = (p.x - z.x).powi(2) + (p.y - z.y).powi(2);
        if best.is_none_or(|(_, best_d2)| d2 < best_d2) {
            best = Some((idx, d2));
        }
    }
    best.map(|(idx, _)| idx)
}

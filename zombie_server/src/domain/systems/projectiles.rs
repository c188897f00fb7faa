use crate::domain::state::{Fatality, SimPlayer, SimProjectile, SimZombie};
use crate::domain::tuning::ArenaTuning;
use tracing::{debug, info};

/// Move every projectile one tick forward and drop the ones that expired or left the arena.
pub fn advance_projectiles(projectiles: &mut Vec<SimProjectile>, dt: f32, arena: ArenaTuning) {
    for p in projectiles.iter_mut() {
        p.x += p.angle.cos() * p.speed * dt;
        p.y += p.angle.sin() * p.speed * dt;
        p.life = p.life.saturating_sub(1);
    }

    projectiles.retain(|p| p.life > 0 && arena.contains(p.x, p.y));
}

/// Projectile vs zombie collision (naive O(P*Z)).
///
/// A projectile is spent on the first zombie it overlaps in collection order, even if a
/// later zombie is closer.
pub fn hit_zombies(
    projectiles: &mut [SimProjectile],
    zombies: &mut [SimZombie],
    hit_radius: f32,
) -> Vec<Fatality> {
    let hit_radius_sq = hit_radius * hit_radius;
    let mut fatalities = Vec::new();

    for p in projectiles.iter_mut() {
        if !p.is_live() {
            continue;
        }

        for z in zombies.iter_mut() {
            if !z.alive {
                continue;
            }

            let dx = z.x - p.x;
            let dy = z.y - p.y;
            if (dx * dx + dy * dy) < hit_radius_sq {
                let killed = z.take_damage(p.damage);
                p.spent = true;
                debug!(
                    zombie_id = z.id,
                    shooter_id = %p.owner_id,
                    zombie_hp = z.hp,
                    "zombie hit"
                );
                if killed {
                    info!(zombie_id = z.id, killer_id = %p.owner_id, "zombie slain");
                    fatalities.push(Fatality::ZombieSlain {
                        zombie_id: z.id,
                        by: p.owner_id.clone(),
                    });
                }
                break;
            }
        }
    }

    fatalities
}

/// Projectile vs player collision. Owners never hit themselves, and projectiles already
/// spent on a zombie this tick are skipped.
pub fn hit_players(
    projectiles: &mut [SimProjectile],
    players: &mut [SimPlayer],
    hit_radius: f32,
) -> Vec<Fatality> {
    let hit_radius_sq = hit_radius * hit_radius;
    let mut fatalities = Vec::new();

    for p in projectiles.iter_mut() {
        if !p.is_live() {
            continue;
        }

        for e in players.iter_mut() {
            if !e.alive || e.id == p.owner_id {
                continue;
            }

            let dx = e.x - p.x;
            let dy = e.y - p.y;
            if (dx * dx + dy * dy) < hit_radius_sq {
                let killed = e.take_damage(p.damage);
                p.spent = true;
                info!(
                    victim_id = %e.id,
                    shooter_id = %p.owner_id,
                    victim_hp = e.hp,
                    "player hit"
                );
                if killed {
                    fatalities.push(Fatality::PlayerShot {
                        victim: e.id.clone(),
                        by: p.owner_id.clone(),
                    });
                }
                break;
            }
        }
    }

    fatalities
}

/// Drop projectiles consumed by a collision or out of lifetime.
pub fn collect_spent(projectiles: &mut Vec<SimProjectile>) {
    projectiles.retain(SimProjectile::is_live);
}

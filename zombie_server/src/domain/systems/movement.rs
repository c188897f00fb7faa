use crate::domain::state::SimPlayer;
use crate::domain::tuning::ArenaTuning;

#[derive(Debug, Clone, Copy)]
pub struct MovementConfig {
    pub speed: f32, // units/s
    pub arena: ArenaTuning,
}

pub fn tick_player(p: &mut SimPlayer, dt: f32, cfg: MovementConfig) {
    if !p.alive {
        return;
    }

    let (dir_x, dir_y) = p.input.normalized();

    // position integrate
    p.x += dir_x * cfg.speed * dt;
    p.y += dir_y * cfg.speed * dt;
    (p.x, p.y) = cfg.arena.clamp(p.x, p.y);

    // atan2(0, 0) is meaningless; keep the last facing when idle.
    if !p.input.is_zero() {
        p.angle = dir_y.atan2(dir_x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::MoveInput;

    fn cfg() -> MovementConfig {
        MovementConfig {
            speed: 100.0,
            arena: ArenaTuning::default(),
        }
    }

    fn player_at(x: f32, y: f32, input: MoveInput) -> SimPlayer {
        SimPlayer {
            id: "p1".to_string(),
            x,
            y,
            angle: 1.0,
            hp: 100,
            alive: true,
            input,
            color: "#fff".to_string(),
            name: "p1".to_string(),
        }
    }

    #[test]
    fn when_input_is_diagonal_then_speed_is_normalized() {
        let mut p = player_at(200.0, 200.0, MoveInput { x: 5.0, y: 5.0 });
        tick_player(&mut p, 0.5, cfg());

        let travelled = (p.x - 200.0).hypot(p.y - 200.0);
        assert!((travelled - 50.0).abs() < 1e-3);
        assert!((p.angle - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn when_input_is_zero_then_position_and_angle_are_kept() {
        let mut p = player_at(200.0, 200.0, MoveInput::default());
        tick_player(&mut p, 0.05, cfg());

        assert_eq!((p.x, p.y), (200.0, 200.0));
        assert_eq!(p.angle, 1.0);
    }

    #[test]
    fn when_input_points_down_then_player_faces_down() {
        let mut p = player_at(200.0, 200.0, MoveInput { x: 0.0, y: 3.0 });
        tick_player(&mut p, 0.05, cfg());

        assert!((p.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!(p.y > 200.0);
    }

    #[test]
    fn when_player_pushes_into_wall_then_position_is_clamped() {
        let mut p = player_at(45.0, 300.0, MoveInput { x: -1.0, y: 0.0 });
        tick_player(&mut p, 1.0, cfg());

        assert_eq!(p.x, ArenaTuning::default().min_x());
        assert_eq!(p.y, 300.0);
    }

    #[test]
    fn when_player_is_dead_then_input_is_ignored() {
        let mut p = player_at(200.0, 200.0, MoveInput { x: 1.0, y: 0.0 });
        p.alive = false;
        tick_player(&mut p, 1.0, cfg());

        assert_eq!(p.x, 200.0);
    }
}

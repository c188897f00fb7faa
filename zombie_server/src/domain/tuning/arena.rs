/// Map layout: outer size, wall margin and fixed spawn points.
#[derive(Debug, Clone, Copy)]
pub struct ArenaTuning {
    /// Full map width in world units.
    pub width: f32,

    /// Full map height in world units.
    pub height: f32,

    /// Thickness of the boundary wall on every side.
    pub wall: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            wall: 40.0,
        }
    }
}

impl ArenaTuning {
    pub fn min_x(&self) -> f32 {
        self.wall
    }

    pub fn max_x(&self) -> f32 {
        self.width - self.wall
    }

    pub fn min_y(&self) -> f32 {
        self.wall
    }

    pub fn max_y(&self) -> f32 {
        self.height - self.wall
    }

    /// Clamp a point into the playable rectangle.
    pub fn clamp(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x.clamp(self.min_x(), self.max_x()),
            y.clamp(self.min_y(), self.max_y()),
        )
    }

    /// True when the point lies inside the playable rectangle (edges included).
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min_x() && x <= self.max_x() && y >= self.min_y() && y <= self.max_y()
    }

    /// Zombies always appear in the middle of the arena.
    pub fn zombie_spawn(&self) -> (f32, f32) {
        let play_w = self.max_x() - self.min_x();
        let play_h = self.max_y() - self.min_y();
        (self.min_x() + play_w / 2.0, self.min_y() + play_h / 2.0)
    }

    /// Quarter points of the playable rectangle, well clear of the walls.
    pub fn player_spawns(&self) -> [(f32, f32); 4] {
        let play_w = self.max_x() - self.min_x();
        let play_h = self.max_y() - self.min_y();
        let left = self.min_x() + play_w / 4.0;
        let right = self.min_x() + play_w * 3.0 / 4.0;
        let top = self.min_y() + play_h / 4.0;
        let bottom = self.min_y() + play_h * 3.0 / 4.0;
        [(left, top), (right, top), (left, bottom), (right, bottom)]
    }
}

use std::f32::consts::{PI, TAU};

/// Wrap an angle into (-pi, pi]. Takes constant time for any input; NaN and
/// infinities come back as NaN.
#[inline]
pub fn wrap_angle(a: f32) -> f32 {
    let w = (a + PI).rem_euclid(TAU) - PI;
    if w <= -PI { w + TAU } else { w }
}

pub struct Player {
    pub pos: [f32; 2], // (x, y) position in world space
    pub a: f32,        // radians, heading in the X-Y plane
    pub fov: f32,      // horizontal field of view in radians
    pub won: bool,
}

impl Player {
    pub fn new(pos: [f32; 2], a: f32, fov: f32) -> Self {
        Self {
            pos,
            a,
            fov,
            won: false,
        }
    }

    #[inline]
    pub fn dir(&self) -> [f32; 2] {
        [self.a.cos(), self.a.sin()]
    }

    /// Move along the heading; negative distances back up.
    pub fn advance(&mut self, distance: f32) {
        let [dx, dy] = self.dir();
        self.pos[0] += dx * distance;
        self.pos[1] += dy * distance;
    }

    pub fn turn(&mut self, delta: f32) {
        // Keep heading in (-pi, pi] to avoid float drift
        self.a = wrap_angle(self.a + delta);
    }

    /// Ray angle for screen column `col` of `screen_width`, sweeping left to right.
    #[inline]
    pub fn column_angle(&self, col: usize, screen_width: usize) -> f32 {
        self.a + self.fov / 2.0 - self.fov * col as f32 / screen_width as f32
    }
}

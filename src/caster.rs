use crate::player::Player;
use crate::texture::TEXTURE_SIZE;
use crate::world::{CELL_SIZE, Cell, Grid};

/// Floor applied to the distance once the ray has left the player's own point.
pub const MIN_DISTANCE: f32 = 0.1;

/// World units advanced per march step.
pub const RAY_STEP: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    /// Distance along the ray, not yet fisheye corrected.
    pub d: f32,
    /// Symbol of the wall that was struck, `None` if the ray left the grid.
    pub tile: Option<u8>,
    /// Texture column in `0..TEXTURE_SIZE`.
    pub tx: usize,
}

/// March a ray from the player along `angle` until it enters a non-empty cell.
///
/// Leaving the grid counts as a hit against an untextured wall at the distance
/// travelled so far, so unenclosed maps terminate too.
pub fn cast_ray(grid: &Grid, player: &Player, a: f32) -> Impact {
    let (sin, cos) = a.sin_cos();
    let mut d = 0.0f32;

    loop {
        let x = (player.pos[0] + d * cos).floor() as i32;
        let y = (player.pos[1] + d * sin).floor() as i32;

        let i = x.div_euclid(CELL_SIZE);
        let j = y.div_euclid(CELL_SIZE);

        match grid.cell(i, j) {
            Cell::Empty => {}
            Cell::Wall(symbol) => {
                let hitx = x - i * CELL_SIZE;
                let hity = y - j * CELL_SIZE;
                // Landing on the left/right edge of the cell means a vertical face
                let offset = if hitx == 0 || hitx == CELL_SIZE - 1 {
                    hity
                } else {
                    hitx
                };
                return Impact {
                    d,
                    tile: Some(symbol),
                    tx: texture_column(offset),
                };
            }
            Cell::Void => {
                return Impact {
                    d,
                    tile: None,
                    tx: 0,
                };
            }
        }

        if d < MIN_DISTANCE {
            d = MIN_DISTANCE;
        }
        d += RAY_STEP;
    }
}

/// Map a cell-relative offset in `0..CELL_SIZE` onto texture space.
#[inline]
pub fn texture_column(offset: i32) -> usize {
    (offset.clamp(0, CELL_SIZE - 1) as usize * TEXTURE_SIZE) / CELL_SIZE as usize
}

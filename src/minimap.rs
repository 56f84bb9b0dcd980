use crate::frame::Frame;
use crate::player::Player;
use crate::texture::{Color, TEXTURE_SIZE, TextureId, TextureStore};
use crate::world::{CELL_SIZE, Cell, Level};

/// Minimap cells are a quarter of a world cell.
pub const BLOCK: i32 = CELL_SIZE / 4;

const MARKER_SIZE: i32 = 4;

/// Where the minimap lands on screen for a given grid and screen width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimapLayout {
    pub origin_x: i32,
    pub origin_y: i32,
    pub block: i32,
    pub cols: usize,
    pub rows: usize,
}

impl MinimapLayout {
    /// Anchor a `cols x rows` minimap flush to the top-right corner.
    pub fn new(cols: usize, rows: usize, screen_w: usize) -> Self {
        Self {
            origin_x: screen_w as i32 - cols as i32 * BLOCK,
            origin_y: 0,
            block: BLOCK,
            cols,
            rows,
        }
    }

    /// Screen-space top-left corner of cell `(i, j)`.
    #[inline]
    pub fn cell_origin(&self, i: usize, j: usize) -> (i32, i32) {
        (
            self.origin_x + i as i32 * self.block,
            self.origin_y + j as i32 * self.block,
        )
    }

    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows).flat_map(move |j| (0..self.cols).map(move |i| (i, j)))
    }

    /// Marker position for a world-space point.
    pub fn project(&self, pos: [f32; 2]) -> (i32, i32) {
        let (block, cell) = (self.block as f32, CELL_SIZE as f32);
        (
            self.origin_x + (pos[0] * block / cell) as i32,
            self.origin_y + (pos[1] * block / cell) as i32,
        )
    }
}

/// Texture a `w x h` rectangle with the whole of a tile texture.
fn textured_rect(
    frame: &mut Frame,
    textures: &TextureStore,
    id: TextureId,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
) {
    for cx in 0..w {
        let tx = cx as usize * TEXTURE_SIZE / w as usize;
        for cy in 0..h {
            let ty = cy as usize * TEXTURE_SIZE / h as usize;
            frame.put(x + cx, y + cy, textures.sample(id, tx, ty));
        }
    }
}

/// Overlay the background image, then the grid and player marker in the top-right corner.
pub fn draw(frame: &mut Frame, textures: &TextureStore, level: &Level, player: &Player) {
    frame.render_fullscreen(textures, "bg");

    let layout = MinimapLayout::new(level.grid.width(), level.grid.height(), frame.width);
    for (i, j) in layout.cells() {
        let (x, y) = layout.cell_origin(i, j);
        match level.grid.cell(i as i32, j as i32) {
            Cell::Wall(symbol) => match level.tiles.get(symbol) {
                Some(id) => textured_rect(frame, textures, id, x, y, layout.block, layout.block),
                None => frame.fill_rect(x, y, layout.block, layout.block, Color::SENTINEL),
            },
            Cell::Empty | Cell::Void => {
                frame.fill_rect(x, y, layout.block, layout.block, Color::BLACK)
            }
        }
    }

    let (px, py) = layout.project(player.pos);
    frame.fill_rect(px, py, MARKER_SIZE, MARKER_SIZE, Color::RED);
}

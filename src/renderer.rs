use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::caster::{Impact, MIN_DISTANCE, cast_ray};
use crate::config::Config;
use crate::frame::Frame;
use crate::player::Player;
use crate::texture::{Color, TEXTURE_SIZE, TextureStore};
use crate::world::{Enemy, Level};
use crate::{minimap, sprite};

const FLOOR: Color = Color::rgb(50, 50, 50);

/// Wall strip height for a ray at `offset` radians from the view direction.
///
/// `d * cos(offset)` is the perpendicular distance to the view plane, which keeps
/// straight walls straight instead of bulging at the screen centre.
#[inline]
pub fn projected_height(screen_h: usize, d: f32, offset: f32, scale: f32) -> f32 {
    screen_h as f32 / (d * offset.cos()) * scale
}

/// Paint column `x` with a strip of height `h` centred on the horizon.
pub fn draw_stake(
    frame: &mut Frame,
    textures: &TextureStore,
    level: &Level,
    x: usize,
    h: f32,
    impact: &Impact,
) {
    if !h.is_finite() || h <= 0.0 {
        return;
    }
    let start = frame.height as f32 / 2.0 - h / 2.0;
    let end = start + h;

    // Clip to the frame; ty still uses the unclipped start so textures stay anchored
    let y0 = start.max(0.0) as i32;
    let y1 = end.min(frame.height as f32).ceil() as i32;

    let texture = impact.tile.and_then(|symbol| level.tiles.get(symbol));
    for y in y0..y1 {
        let ty = ((y as f32 - start) * TEXTURE_SIZE as f32 / h) as usize;
        let c = match texture {
            Some(id) => textures.sample(id, impact.tx, ty),
            None => Color::SENTINEL,
        };
        frame.put(x as i32, y, c);
    }
}

/// Owns everything one play session needs to draw a frame.
pub struct Raycaster {
    pub player: Player,
    pub level: Level,
    pub enemies: Vec<Enemy>,
    scale: f32,
    safe_spot: [f32; 2],
    exit_zone: f32,
}

impl Raycaster {
    pub fn new(level: Level, config: &Config) -> Self {
        Self {
            player: config.player(),
            level,
            enemies: config.enemies(),
            scale: config.scale,
            safe_spot: config.safe_spot,
            exit_zone: config.exit_zone,
        }
    }

    /// Set `player.won` if the player stands in the bottom-right exit region.
    pub fn check_exit(&mut self) -> bool {
        let (w, h) = self.level.grid.extent();
        let [x, y] = self.player.pos;
        if x > w - self.exit_zone && y > h - self.exit_zone {
            self.player.won = true;
        }
        self.player.won
    }

    fn cast_columns(&self, width: usize) -> Vec<Impact> {
        let grid = &self.level.grid;
        let player = &self.player;
        (0..width)
            .into_par_iter()
            .map(|col| cast_ray(grid, player, player.column_angle(col, width)))
            .collect()
    }

    /// Draw one frame: floor, wall columns left to right, sprites, then the minimap.
    pub fn render(&mut self, frame: &mut Frame, textures: &TextureStore) {
        self.check_exit();

        frame.clear(Color::BLACK);
        let mid = frame.height as i32 / 2;
        frame.fill_rect(0, mid, frame.width as i32, frame.height as i32 - mid, FLOOR);

        let mut impacts = self.cast_columns(frame.width);
        if impacts.iter().any(|impact| impact.d == 0.0) {
            log::warn!(
                "Player at ({:.1}, {:.1}) is inside a wall, moving to ({:.1}, {:.1})",
                self.player.pos[0],
                self.player.pos[1],
                self.safe_spot[0],
                self.safe_spot[1]
            );
            self.player.pos = self.safe_spot;
            impacts = self.cast_columns(frame.width);
        }

        for (x, impact) in impacts.iter().enumerate() {
            let a = self.player.column_angle(x, frame.width);
            let d = impact.d.max(MIN_DISTANCE);
            let h = projected_height(frame.height, d, a - self.player.a, self.scale);
            draw_stake(frame, textures, &self.level, x, h, impact);
        }

        for enemy in &self.enemies {
            sprite::draw_enemy(frame, textures, &self.player, enemy, self.scale);
        }

        minimap::draw(frame, textures, &self.level, &self.player);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::Texture;
    use crate::world::Grid;

    // 16 x 11 cells, 800 x 550 world units
    const ROOM: &str = "\
++++++++++++++++
+              +
+              +
+              +
+              +
+              +
+              +
+              +
+              +
+              +
++++++++++++++++";

    const BLUE: Color = Color::rgb(0, 0, 255);

    fn setup() -> (Raycaster, TextureStore) {
        let mut textures = TextureStore::new();
        textures.insert("+", Texture::solid(Color::WHITE));
        textures.insert("e1", Texture::solid(BLUE));
        let level = Level::new(Grid::parse(ROOM).unwrap(), &textures);
        let mut config = Config::default();
        config.enemies.clear();
        (Raycaster::new(level, &config), textures)
    }

    #[test]
    fn test_fisheye_correction_equalises_heights() {
        let perpendicular = 100.0f32;
        for &offset in &[0.1f32, 0.3, 0.5] {
            let d = perpendicular / offset.cos();
            let straight = projected_height(550, perpendicular, 0.0, 50.0);
            let slanted = projected_height(550, d, offset, 50.0);
            assert!(
                (straight - slanted).abs() < 1e-3,
                "offset {}: {} vs {}",
                offset,
                straight,
                slanted
            );
        }
    }

    #[test]
    fn test_exit_zone_boundary() {
        let (mut rc, _) = setup();
        rc.player.pos = [660.0, 411.0];
        assert!(!rc.check_exit());
        rc.player.pos = [661.0, 410.0];
        assert!(!rc.check_exit());
        rc.player.pos = [661.0, 411.0];
        assert!(rc.check_exit());
        assert!(rc.player.won);
    }

    #[test]
    fn test_draw_stake_is_centred_and_clipped() {
        let (rc, textures) = setup();
        let mut buf = vec![0u32; 4 * 20];
        let mut frame = Frame::new(&mut buf, 4, 20);
        let impact = Impact {
            d: 10.0,
            tile: Some(b'+'),
            tx: 0,
        };
        draw_stake(&mut frame, &textures, &rc.level, 1, 8.0, &impact);
        let lit: Vec<usize> = (0..20)
            .filter(|&y| frame.get(1, y) == Some(Color::WHITE))
            .collect();
        assert_eq!(lit, (6..14).collect::<Vec<_>>());

        // Taller than the frame: every row is painted, nothing panics
        draw_stake(&mut frame, &textures, &rc.level, 2, 1000.0, &impact);
        assert!((0..20).all(|y| frame.get(2, y) == Some(Color::WHITE)));
    }

    #[test]
    fn test_void_hit_draws_sentinel() {
        let (rc, textures) = setup();
        let mut buf = vec![0u32; 2 * 10];
        let mut frame = Frame::new(&mut buf, 2, 10);
        let impact = Impact {
            d: 10.0,
            tile: None,
            tx: 0,
        };
        draw_stake(&mut frame, &textures, &rc.level, 0, 4.0, &impact);
        assert_eq!(frame.get(0, 5), Some(Color::SENTINEL));
    }

    #[test]
    fn test_render_composites_in_order() {
        let (mut rc, textures) = setup();
        rc.player.pos = [400.0, 275.0];
        rc.player.a = 0.0;
        rc.enemies.push(Enemy {
            pos: [600.0, 275.0],
            texture: "e1".into(),
        });

        let (w, h) = (400usize, 300usize);
        let mut buf = vec![0u32; w * h];
        let mut frame = Frame::new(&mut buf, w, h);
        rc.render(&mut frame, &textures);

        // ceiling left clear, floor filled below the walls
        assert_eq!(frame.get(0, 0), Some(Color::BLACK));
        assert_eq!(frame.get(0, h - 1), Some(FLOOR));
        // wall strip across the horizon
        assert_eq!(frame.get(20, h / 2), Some(Color::WHITE));
        // the sprite sits on top of the wall behind it
        assert_eq!(frame.get(180, h / 2), Some(BLUE));
        // minimap marker: 208 + 400 * 12 / 50, 275 * 12 / 50
        assert_eq!(frame.get(305, 67), Some(Color::RED));
        assert!(!rc.player.won);
    }

    #[test]
    fn test_player_inside_wall_is_relocated() {
        let (mut rc, textures) = setup();
        rc.player.pos = [10.0, 10.0];
        let mut buf = vec![0u32; 200 * 100];
        let mut frame = Frame::new(&mut buf, 200, 100);
        rc.render(&mut frame, &textures);
        assert_eq!(rc.player.pos, [85.0, 85.0]);
    }

    #[test]
    fn test_render_sets_won_in_exit_zone() {
        let (mut rc, textures) = setup();
        rc.player.pos = [700.0, 480.0];
        let mut buf = vec![0u32; 200 * 100];
        let mut frame = Frame::new(&mut buf, 200, 100);
        rc.render(&mut frame, &textures);
        assert!(rc.player.won);
    }
}

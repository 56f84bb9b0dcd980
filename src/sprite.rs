//! Billboard projection for enemies.
//!
//! Sprites are placed by bearing and distance only and drawn after the walls, so
//! they always end up on top of whatever wall strip shares their columns.

use crate::frame::Frame;
use crate::player::{Player, wrap_angle};
use crate::texture::{Color, TEXTURE_SIZE, TextureStore};
use crate::world::Enemy;

/// Screen-space square a sprite occupies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Billboard {
    pub x: i32,
    pub y: i32,
    pub size: i32,
    /// Unrounded size, before truncation to whole pixels.
    pub exact_size: f32,
}

/// Project `enemy` relative to `player`. `None` when the two coincide.
pub fn project(
    enemy: &Enemy,
    player: &Player,
    screen_w: usize,
    screen_h: usize,
    scale: f32,
) -> Option<Billboard> {
    let dx = enemy.pos[0] - player.pos[0];
    let dy = enemy.pos[1] - player.pos[1];
    let enemy_d = dx.hypot(dy);
    if enemy_d <= 0.0 {
        return None;
    }
    let enemy_a = dy.atan2(dx);

    let (sw, sh) = (screen_w as f32, screen_h as f32);
    let exact_size = (sh / enemy_d) * scale;
    let x = wrap_angle(enemy_a - player.a) * (sw / player.fov) + sw / 2.0 - exact_size / 2.0;
    let y = sh / 2.0 - exact_size / 2.0;

    Some(Billboard {
        x: x as i32,
        y: y as i32,
        size: exact_size as i32,
        exact_size,
    })
}

/// Draw one billboard, skipping texels equal to [`Color::TRANSPARENT_KEY`].
pub fn draw_billboard(frame: &mut Frame, textures: &TextureStore, texture: &str, bb: Billboard) {
    if bb.size <= 0 {
        return;
    }
    // Only walk the part of the square that lands on screen. i64 because a sprite
    // right next to the player projects far past the i32 range.
    let (bx, by, size) = (bb.x as i64, bb.y as i64, bb.size as i64);
    let x0 = bx.max(0);
    let y0 = by.max(0);
    let x1 = (bx + size).min(frame.width as i64);
    let y1 = (by + size).min(frame.height as i64);

    for x in x0..x1 {
        let tx = ((x - bx) * TEXTURE_SIZE as i64 / size) as usize;
        for y in y0..y1 {
            let ty = ((y - by) * TEXTURE_SIZE as i64 / size) as usize;
            // An unknown name samples as the sentinel, so the whole square shows it
            let c = textures.pixel(texture, tx, ty);
            if c != Color::TRANSPARENT_KEY {
                frame.put(x as i32, y as i32, c);
            }
        }
    }
}

pub fn draw_enemy(
    frame: &mut Frame,
    textures: &TextureStore,
    player: &Player,
    enemy: &Enemy,
    scale: f32,
) {
    if let Some(bb) = project(enemy, player, frame.width, frame.height, scale) {
        draw_billboard(frame, textures, &enemy.texture, bb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::Texture;
    use std::f32::consts::{FRAC_PI_3, FRAC_PI_4, PI};

    const W: usize = 800;
    const H: usize = 550;

    fn enemy(x: f32, y: f32) -> Enemy {
        Enemy {
            pos: [x, y],
            texture: "e1".into(),
        }
    }

    #[test]
    fn test_size_halves_when_distance_doubles() {
        let player = Player::new([100.0, 100.0], 0.0, FRAC_PI_3);
        let near = project(&enemy(200.0, 100.0), &player, W, H, 50.0).unwrap();
        let far = project(&enemy(300.0, 100.0), &player, W, H, 50.0).unwrap();
        assert!((near.exact_size - 2.0 * far.exact_size).abs() < 1e-3);
        assert!((near.size - 2 * far.size).abs() <= 1);
    }

    #[test]
    fn test_enemy_straight_ahead_is_centred() {
        let player = Player::new([75.0, 75.0], FRAC_PI_4, FRAC_PI_3);
        let d = 200.0;
        let e = enemy(75.0 + d * FRAC_PI_4.cos(), 75.0 + d * FRAC_PI_4.sin());
        let bb = project(&e, &player, W, H, 50.0).unwrap();
        let centre = bb.x as f32 + bb.exact_size / 2.0;
        assert!((centre - W as f32 / 2.0).abs() <= 1.0);
        let middle = bb.y as f32 + bb.exact_size / 2.0;
        assert!((middle - H as f32 / 2.0).abs() <= 1.0);
    }

    #[test]
    fn test_bearing_wraps_across_pi() {
        // Heading just under pi, enemy bearing just over -pi: about 0.015 rad apart
        let player = Player::new([500.0, 100.0], PI - 0.01, FRAC_PI_3);
        let bb = project(&enemy(300.0, 99.0), &player, W, H, 50.0).unwrap();
        let centre = bb.x as f32 + bb.exact_size / 2.0;
        assert!((centre - W as f32 / 2.0).abs() < 20.0, "centre = {}", centre);
    }

    #[test]
    fn test_huge_heading_still_projects() {
        // Far outside (-pi, pi]: the bearing wrap must not walk there in 2pi steps
        let player = Player::new([100.0, 100.0], 1e12f32.to_radians(), FRAC_PI_3);
        let bb = project(&enemy(200.0, 100.0), &player, W, H, 50.0).unwrap();
        assert!(bb.exact_size > 0.0);
        let offset = bb.x as f32 + bb.exact_size / 2.0 - W as f32 / 2.0;
        assert!(offset.abs() <= PI * W as f32 / FRAC_PI_3 + 1.0);
    }

    #[test]
    fn test_coincident_enemy_is_skipped() {
        let player = Player::new([10.0, 10.0], 0.0, FRAC_PI_3);
        assert!(project(&enemy(10.0, 10.0), &player, W, H, 50.0).is_none());
    }

    #[test]
    fn test_key_colour_is_transparent() {
        let mut textures = TextureStore::new();
        textures.insert(
            "e1",
            Texture::from_pixels(2, 1, vec![Color::WHITE, Color::TRANSPARENT_KEY]),
        );
        let mut buf = vec![Color::BLACK.to_u32(); 8 * 8];
        let mut frame = Frame::new(&mut buf, 8, 8);
        let bb = Billboard {
            x: 0,
            y: 0,
            size: 4,
            exact_size: 4.0,
        };
        draw_billboard(&mut frame, &textures, "e1", bb);
        assert_eq!(frame.get(0, 0), Some(Color::WHITE));
        assert_eq!(frame.get(1, 3), Some(Color::WHITE));
        assert_eq!(frame.get(2, 0), Some(Color::BLACK));
        assert_eq!(frame.get(3, 3), Some(Color::BLACK));
        assert_eq!(frame.get(4, 0), Some(Color::BLACK));
    }

    #[test]
    fn test_unknown_texture_draws_sentinel_square() {
        let textures = TextureStore::new();
        let mut buf = vec![0u32; 8 * 8];
        let mut frame = Frame::new(&mut buf, 8, 8);
        let bb = Billboard {
            x: 6,
            y: 2,
            size: 3,
            exact_size: 3.0,
        };
        draw_billboard(&mut frame, &textures, "ghost", bb);
        let lit = buf.iter().filter(|&&p| p == Color::SENTINEL.to_u32()).count();
        assert_eq!(lit, 2 * 3);
    }

    #[test]
    fn test_partially_offscreen_billboard() {
        let mut textures = TextureStore::new();
        textures.insert("e1", Texture::solid(Color::WHITE));
        let mut buf = vec![0u32; 8 * 8];
        let mut frame = Frame::new(&mut buf, 8, 8);
        let bb = Billboard {
            x: -4,
            y: 6,
            size: 6,
            exact_size: 6.0,
        };
        draw_billboard(&mut frame, &textures, "e1", bb);
        let lit = buf.iter().filter(|&&p| p == Color::WHITE.to_u32()).count();
        assert_eq!(lit, 2 * 2);
    }
}

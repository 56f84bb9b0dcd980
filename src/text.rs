//! 8x8 bitmap text drawn straight into a [`Frame`].

use font8x8::{BASIC_FONTS, UnicodeFonts};

use crate::frame::Frame;
use crate::texture::Color;

/// Glyph cell side in unscaled pixels.
pub const GLYPH_SIZE: i32 = 8;

pub fn text_width(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * GLYPH_SIZE * scale
}

/// Draw `text` with its top-left corner at `(x, y)`, each font pixel blown up to a
/// `scale`×`scale` block. Characters outside basic Latin print as `?`.
pub fn draw_text(frame: &mut Frame, x: i32, y: i32, scale: i32, text: &str, color: Color) {
    let scale = scale.max(1);
    let fallback = BASIC_FONTS.get('?').unwrap_or([0; 8]);
    for (n, ch) in text.chars().enumerate() {
        let glyph = BASIC_FONTS.get(ch).unwrap_or(fallback);
        let gx = x + n as i32 * GLYPH_SIZE * scale;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                // bit 0 is the leftmost pixel
                if bits & (1 << col) != 0 {
                    frame.fill_rect(
                        gx + col * scale,
                        y + row as i32 * scale,
                        scale,
                        scale,
                        color,
                    );
                }
            }
        }
    }
}

/// Centre `text` horizontally on the frame and vertically on `centre_y`.
pub fn draw_text_centred(frame: &mut Frame, centre_y: i32, scale: i32, text: &str, color: Color) {
    let scale = scale.max(1);
    let x = (frame.width as i32 - text_width(text, scale)) / 2;
    let y = centre_y - GLYPH_SIZE * scale / 2;
    draw_text(frame, x, y, scale, text, color);
}

use crate::texture::{Color, TextureStore};

/// A borrowed software framebuffer, row-major, one packed `u32` per pixel.
pub struct Frame<'a> {
    pub buf: &'a mut [u32],
    pub width: usize,
    pub height: usize,
}

impl<'a> Frame<'a> {
    pub fn new(buf: &'a mut [u32], width: usize, height: usize) -> Self {
        debug_assert_eq!(buf.len(), width * height);
        Self { buf, width, height }
    }

    pub fn clear(&mut self, color: Color) {
        self.buf.fill(color.to_u32());
    }

    /// Write one pixel; coordinates off the frame are dropped.
    #[inline]
    pub fn put(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.buf[y as usize * self.width + x as usize] = color.to_u32();
    }

    #[cfg(test)]
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(Color::from_u32(self.buf[y * self.width + x]))
        } else {
            None
        }
    }

    /// Fill a rectangle, clipped to the frame.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = x.saturating_add(w).clamp(0, self.width as i32) as usize;
        let y1 = y.saturating_add(h).clamp(0, self.height as i32) as usize;
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let px = color.to_u32();
        for y in y0..y1 {
            let row = y * self.width;
            self.buf[row + x0..row + x1].fill(px);
        }
    }

    /// Composite the named image over the whole frame, stretched to fit.
    /// Returns `false` without drawing if no such image is loaded.
    pub fn render_fullscreen(&mut self, textures: &TextureStore, name: &str) -> bool {
        let Some(texture) = textures.by_name(name) else {
            return false;
        };
        let (tw, th) = (texture.width(), texture.height());
        for y in 0..self.height {
            let sy = y * th / self.height;
            let row = y * self.width;
            for x in 0..self.width {
                let sx = x * tw / self.width;
                let idx = row + x;
                self.buf[idx] = texture.pixel_at(sx, sy).blend_over(self.buf[idx]);
            }
        }
        true
    }
}

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Side length of the square texture space every sampler works in.
pub const TEXTURE_SIZE: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);

    /// Returned for any lookup that names a texture nobody loaded.
    pub const SENTINEL: Color = Color::rgb(255, 0, 255);

    /// Sprite pixels of exactly this colour are not drawn.
    pub const TRANSPARENT_KEY: Color = Color::rgb(152, 0, 136);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn to_u32(self) -> u32 {
        // BGRA8 in little-endian memory, alpha at 0
        (self.b as u32) | ((self.g as u32) << 8) | ((self.r as u32) << 16)
    }

    #[inline]
    pub fn from_u32(px: u32) -> Self {
        Self::rgb((px >> 16) as u8, (px >> 8) as u8, px as u8)
    }

    /// Source-over composite of `self` onto an already packed pixel.
    #[inline]
    pub fn blend_over(self, dst: u32) -> u32 {
        match self.a {
            0 => dst,
            255 => self.to_u32(),
            a => {
                let d = Color::from_u32(dst);
                let a = a as u32;
                let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a)) / 255) as u8;
                Color::rgb(mix(self.r, d.r), mix(self.g, d.g), mix(self.b, d.b)).to_u32()
            }
        }
    }
}

/// An RGBA image at its native resolution.
pub struct Texture {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Texture {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, image::ImageError> {
        let rgba = image::open(path)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels = rgba
            .pixels()
            .map(|p| Color::rgba(p[0], p[1], p[2], p[3]))
            .collect();

        Ok(Self {
            width: width as usize,
            height: height as usize,
            pixels,
        })
    }

    #[cfg(test)]
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Color>) -> Self {
        debug_assert_eq!(width * height, pixels.len());
        Self {
            width,
            height,
            pixels,
        }
    }

    #[cfg(test)]
    pub fn solid(color: Color) -> Self {
        Self::from_pixels(1, 1, vec![color])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at native image coordinates.
    #[inline]
    pub fn pixel_at(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            Color::SENTINEL
        }
    }

    /// Sample at `(tx, ty)` in `TEXTURE_SIZE` space, whatever the native size is.
    /// Coordinates past the edge clamp to the last texel.
    #[inline]
    pub fn sample(&self, tx: usize, ty: usize) -> Color {
        let x = tx.min(TEXTURE_SIZE - 1) * self.width / TEXTURE_SIZE;
        let y = ty.min(TEXTURE_SIZE - 1) * self.height / TEXTURE_SIZE;
        self.pixel_at(x, y)
    }
}

/// Handle into a [`TextureStore`], resolved once instead of hashing names per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(u16);

#[derive(Default)]
pub struct TextureStore {
    textures: Vec<Texture>,
    names: HashMap<String, TextureId>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `texture` under `name`, replacing any previous image with that name.
    pub fn insert(&mut self, name: &str, texture: Texture) -> TextureId {
        if let Some(&id) = self.names.get(name) {
            self.textures[id.0 as usize] = texture;
            return id;
        }
        let id = TextureId(self.textures.len() as u16);
        self.textures.push(texture);
        self.names.insert(name.to_owned(), id);
        id
    }

    pub fn load<P: AsRef<Path>>(&mut self, name: &str, path: P) -> Result<TextureId> {
        let path = path.as_ref();
        let texture = Texture::from_file(path).map_err(|source| Error::Texture {
            name: name.to_owned(),
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!(
            "Loaded texture {:?} ({}x{}) from {}",
            name,
            texture.width,
            texture.height,
            path.display()
        );
        Ok(self.insert(name, texture))
    }

    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.names.get(name).copied()
    }

    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0 as usize)
    }

    pub fn by_name(&self, name: &str) -> Option<&Texture> {
        self.id(name).and_then(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[inline]
    pub fn sample(&self, id: TextureId, tx: usize, ty: usize) -> Color {
        match self.get(id) {
            Some(texture) => texture.sample(tx, ty),
            None => Color::SENTINEL,
        }
    }

    /// Name-keyed lookup; an unknown name is a contract violation answered with
    /// [`Color::SENTINEL`].
    #[inline]
    pub fn pixel(&self, name: &str, tx: usize, ty: usize) -> Color {
        match self.by_name(name) {
            Some(texture) => texture.sample(tx, ty),
            None => Color::SENTINEL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Texture {
        // 2x2: top row red/white, bottom row black/key
        Texture::from_pixels(
            2,
            2,
            vec![Color::RED, Color::WHITE, Color::BLACK, Color::TRANSPARENT_KEY],
        )
    }

    #[test]
    fn test_sample_maps_texture_space_onto_native_size() {
        let tex = checker();
        assert_eq!(tex.sample(0, 0), Color::RED);
        assert_eq!(tex.sample(TEXTURE_SIZE / 2, 0), Color::WHITE);
        assert_eq!(tex.sample(0, TEXTURE_SIZE - 1), Color::BLACK);
        assert_eq!(tex.sample(TEXTURE_SIZE - 1, TEXTURE_SIZE - 1), Color::TRANSPARENT_KEY);
    }

    #[test]
    fn test_sample_clamps_past_edge() {
        let tex = checker();
        assert_eq!(tex.sample(TEXTURE_SIZE * 4, 0), Color::WHITE);
    }

    #[test]
    fn test_unknown_name_returns_sentinel() {
        let mut store = TextureStore::new();
        store.insert("+", Texture::solid(Color::WHITE));
        assert_eq!(store.pixel("+", 3, 7), Color::WHITE);
        assert_eq!(store.pixel("nope", 3, 7), Color::SENTINEL);
    }

    #[test]
    fn test_insert_same_name_replaces() {
        let mut store = TextureStore::new();
        let a = store.insert("g", Texture::solid(Color::WHITE));
        let b = store.insert("g", Texture::solid(Color::RED));
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
        assert_eq!(store.sample(a, 0, 0), Color::RED);
    }

    #[test]
    fn test_missing_file_is_texture_error() {
        let mut store = TextureStore::new();
        let err = store.load("e1", "/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, Error::Texture { ref name, .. } if name == "e1"));
    }

    #[test]
    fn test_blend_over() {
        let dst = Color::BLACK.to_u32();
        assert_eq!(Color::rgba(255, 255, 255, 0).blend_over(dst), dst);
        assert_eq!(Color::WHITE.blend_over(dst), Color::WHITE.to_u32());
        let half = Color::from_u32(Color::rgba(255, 0, 0, 128).blend_over(dst));
        assert_eq!(half, Color::rgb(128, 0, 0));
    }
}

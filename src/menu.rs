use std::path::PathBuf;

use crate::config::LevelEntry;
use crate::frame::Frame;
use crate::text::{self, GLYPH_SIZE, text_width};
use crate::texture::{Color, TextureStore};

const HIGHLIGHT: Color = Color::rgb(64, 64, 64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    Play(PathBuf),
    Quit,
}

/// Level list with a trailing "Quit" entry.
pub struct Menu {
    levels: Vec<LevelEntry>,
    selected: usize,
}

impl Menu {
    pub fn new(levels: Vec<LevelEntry>) -> Self {
        Self {
            levels,
            selected: 0,
        }
    }

    pub fn item_count(&self) -> usize {
        self.levels.len() + 1
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn label(&self, index: usize) -> &str {
        self.levels
            .get(index)
            .map(|level| level.label.as_str())
            .unwrap_or("Quit")
    }

    pub fn up(&mut self) {
        self.selected = (self.selected + self.item_count() - 1) % self.item_count();
    }

    pub fn down(&mut self) {
        self.selected = (self.selected + 1) % self.item_count();
    }

    pub fn choose(&self) -> MenuChoice {
        match self.levels.get(self.selected) {
            Some(level) => MenuChoice::Play(level.map.clone()),
            None => MenuChoice::Quit,
        }
    }

    /// Menu backdrop plus one centred label per entry. The selected label is red
    /// on a highlight bar; the rest are white.
    pub fn draw(&self, frame: &mut Frame, textures: &TextureStore) {
        frame.clear(Color::BLACK);
        frame.render_fullscreen(textures, "menu");

        let (w, h) = (frame.width as i32, frame.height as i32);
        let scale = (h / 128).max(1);
        let step = h / (self.item_count() as i32 + 1);
        for i in 0..self.item_count() {
            let label = self.label(i);
            let centre_y = step * (i as i32 + 1);
            let color = if i == self.selected {
                let pad = GLYPH_SIZE * scale / 2;
                let bar_w = (text_width(label, scale) + 2 * pad).min(w);
                let bar_h = GLYPH_SIZE * scale + 2 * pad;
                frame.fill_rect((w - bar_w) / 2, centre_y - bar_h / 2, bar_w, bar_h, HIGHLIGHT);
                Color::RED
            } else {
                Color::WHITE
            };
            text::draw_text_centred(frame, centre_y, scale, label, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> Menu {
        Menu::new(vec![
            LevelEntry {
                label: "Level".into(),
                map: "assets/map.txt".into(),
            },
            LevelEntry {
                label: "Cooler Level".into(),
                map: "assets/map2.txt".into(),
            },
        ])
    }

    #[test]
    fn test_navigation_wraps() {
        let mut m = menu();
        assert_eq!(m.item_count(), 3);
        m.up();
        assert_eq!(m.selected(), 2);
        assert_eq!(m.label(2), "Quit");
        m.down();
        assert_eq!(m.selected(), 0);
        m.down();
        assert_eq!(m.label(m.selected()), "Cooler Level");
    }

    #[test]
    fn test_choose() {
        let mut m = menu();
        assert_eq!(m.choose(), MenuChoice::Play("assets/map.txt".into()));
        m.up();
        assert_eq!(m.choose(), MenuChoice::Quit);
    }

    #[test]
    fn test_draw_labels_and_highlight() {
        let mut m = menu();
        m.down();
        let textures = TextureStore::new();
        let (w, h) = (300usize, 400usize);
        let mut buf = vec![0u32; w * h];
        let mut frame = Frame::new(&mut buf, w, h);
        m.draw(&mut frame, &textures);

        // labels centred at h/4 * (i + 1), glyphs 24 px tall at this height
        let band = |centre: usize, color: Color| {
            buf[(centre - 12) * w..(centre + 12) * w]
                .iter()
                .filter(|&&p| p == color.to_u32())
                .count()
        };
        assert!(band(100, Color::WHITE) > 0);
        assert_eq!(band(100, Color::RED), 0);
        assert!(band(200, Color::RED) > 0);
        assert_eq!(band(200, Color::WHITE), 0);
        assert!(band(200, HIGHLIGHT) > 0);
        assert!(band(300, Color::WHITE) > 0);
        assert_eq!(band(300, HIGHLIGHT), 0);
        // nothing between entries
        assert!(buf[150 * w..151 * w].iter().all(|&p| p == Color::BLACK.to_u32()));
    }
}

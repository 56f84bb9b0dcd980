use std::path::Path;

use crate::error::{Error, Result};
use crate::texture::{TextureId, TextureStore};

/// World units per grid cell, on both axes.
pub const CELL_SIZE: i32 = 50;

/// What sits at a grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall(u8),
    /// Outside the grid, or past the end of a short row.
    Void,
}

/// Tile symbols read from a map file. Immutable once built.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: Vec<Box<[u8]>>,
    width: usize,
}

impl Grid {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::MapIo {
            path: path.to_path_buf(),
            source,
        })?;
        let grid = Self::parse(&text).map_err(|e| match e {
            Error::EmptyMap(_) => Error::EmptyMap(path.to_path_buf()),
            other => other,
        })?;
        log::info!(
            "Loaded map {} ({}x{} cells)",
            path.display(),
            grid.width(),
            grid.height()
        );
        Ok(grid)
    }

    /// One row per line, one symbol per byte, `' '` is walkable.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows: Vec<Box<[u8]>> = Vec::new();
        for (row, line) in text.lines().enumerate() {
            if let Some((col, ch)) = line.chars().enumerate().find(|(_, c)| !c.is_ascii()) {
                return Err(Error::InvalidTile { row, col, ch });
            }
            rows.push(line.as_bytes().into());
        }
        if rows.is_empty() {
            return Err(Error::EmptyMap(Default::default()));
        }
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        Ok(Self { rows, width })
    }

    /// Longest row, in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// World-space extent `(width, height)`.
    pub fn extent(&self) -> (f32, f32) {
        (
            (self.width as i32 * CELL_SIZE) as f32,
            (self.rows.len() as i32 * CELL_SIZE) as f32,
        )
    }

    #[inline]
    pub fn cell(&self, i: i32, j: i32) -> Cell {
        if i < 0 || j < 0 {
            return Cell::Void;
        }
        let row = match self.rows.get(j as usize) {
            Some(row) => row,
            None => return Cell::Void,
        };
        match row.get(i as usize) {
            Some(b' ') => Cell::Empty,
            Some(&symbol) => Cell::Wall(symbol),
            None => Cell::Void,
        }
    }

    /// Every distinct wall symbol in the grid.
    pub fn symbols(&self) -> impl Iterator<Item = u8> + '_ {
        let mut seen = [false; 128];
        self.rows
            .iter()
            .flat_map(|row| row.iter().copied())
            .filter(move |&b| {
                b != b' ' && !std::mem::replace(&mut seen[b as usize & 0x7f], true)
            })
    }
}

/// Tile symbol to texture handle, indexed by the ASCII byte.
#[derive(Debug, Clone)]
pub struct TileTable {
    slots: [Option<TextureId>; 128],
}

impl TileTable {
    pub fn resolve(grid: &Grid, textures: &TextureStore) -> Self {
        let mut slots = [None; 128];
        for symbol in grid.symbols() {
            let name = (symbol as char).to_string();
            match textures.id(&name) {
                Some(id) => slots[symbol as usize] = Some(id),
                None => log::warn!("No texture for tile {:?}; it will draw as the sentinel colour", name),
            }
        }
        Self { slots }
    }

    #[inline]
    pub fn get(&self, symbol: u8) -> Option<TextureId> {
        self.slots.get(symbol as usize).copied().flatten()
    }
}

/// A grid together with its resolved tile textures.
pub struct Level {
    pub grid: Grid,
    pub tiles: TileTable,
}

impl Level {
    pub fn new(grid: Grid, textures: &TextureStore) -> Self {
        let tiles = TileTable::resolve(&grid, textures);
        Self { grid, tiles }
    }

    pub fn load<P: AsRef<Path>>(path: P, textures: &TextureStore) -> Result<Self> {
        Ok(Self::new(Grid::load(path)?, textures))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub pos: [f32; 2], // (x, y) position in world space
    pub texture: String,
}

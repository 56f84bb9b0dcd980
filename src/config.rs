//! Startup configuration, read from a RON file.
//!
//! Every field has a default so a partial file (or none at all) works.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::player::Player;
use crate::world::Enemy;

/// Looked up in the working directory when no path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "maze.ron";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    /// Internal framebuffer size; the window is stretched to fit.
    pub width: usize,
    pub height: usize,
    pub fov_deg: f32,
    /// Projection calibration between world units and screen pixels.
    pub scale: f32,
    pub start: Spawn,
    /// Where the player is moved when a ray reports zero distance.
    pub safe_spot: [f32; 2],
    /// Side of the square exit region in the bottom-right corner of the map, world units.
    pub exit_zone: f32,
    pub move_speed: f32, // world units per second
    pub turn_speed: f32, // radians per second
    pub textures: BTreeMap<String, PathBuf>,
    pub levels: Vec<LevelEntry>,
    pub enemies: Vec<EnemySpawn>,
    pub sounds: SoundConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Spawn {
    pub x: f32,
    pub y: f32,
    pub angle_deg: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LevelEntry {
    pub label: String,
    pub map: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnemySpawn {
    pub x: f32,
    pub y: f32,
    pub texture: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    pub walk: PathBuf,
    pub win: PathBuf,
    /// Looped while a level is being played.
    pub music: PathBuf,
    /// Amplitude, 0 to 1.
    pub music_volume: f64,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            walk: PathBuf::from("assets/walk.wav"),
            win: PathBuf::from("assets/dooropen.mp3"),
            music: PathBuf::from("assets/musics.mp3"),
            music_volume: 0.25,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let textures = [
            ("+", "assets/brick2.png"),
            ("-", "assets/brick.png"),
            ("|", "assets/brick.png"),
            ("*", "assets/metal.png"),
            ("g", "assets/brick_door.png"),
            ("bg", "assets/background.png"),
            ("e1", "assets/sprite1.png"),
        ]
        .into_iter()
        .map(|(name, path)| (name.to_owned(), PathBuf::from(path)))
        .collect();

        Self {
            title: "DOOM".to_owned(),
            width: 800,
            height: 550,
            fov_deg: 60.0,
            scale: 50.0,
            start: Spawn {
                x: 75.0,
                y: 75.0,
                angle_deg: 45.0,
            },
            safe_spot: [85.0, 85.0],
            exit_zone: 140.0,
            move_speed: 120.0,
            turn_speed: std::f32::consts::PI,
            textures,
            levels: vec![
                LevelEntry {
                    label: "Level".to_owned(),
                    map: PathBuf::from("assets/map.txt"),
                },
                LevelEntry {
                    label: "Cooler Level".to_owned(),
                    map: PathBuf::from("assets/map2.txt"),
                },
            ],
            enemies: vec![EnemySpawn {
                x: 250.0,
                y: 50.0,
                texture: "e1".to_owned(),
            }],
            sounds: SoundConfig::default(),
        }
    }
}

impl Config {
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let config: Self = ron::from_str(text).map_err(|source| Error::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate().map_err(|reason| Error::InvalidConfig {
            path: origin.to_path_buf(),
            reason,
        })?;
        Ok(config)
    }

    /// RON accepts `inf` and `NaN`; none of the geometry survives them.
    fn validate(&self) -> std::result::Result<(), String> {
        let numbers = [
            ("fov_deg", self.fov_deg),
            ("scale", self.scale),
            ("start.x", self.start.x),
            ("start.y", self.start.y),
            ("start.angle_deg", self.start.angle_deg),
            ("safe_spot[0]", self.safe_spot[0]),
            ("safe_spot[1]", self.safe_spot[1]),
            ("exit_zone", self.exit_zone),
            ("move_speed", self.move_speed),
            ("turn_speed", self.turn_speed),
        ];
        for (field, value) in numbers {
            if !value.is_finite() {
                return Err(format!("{field} must be a finite number, got {value}"));
            }
        }
        for (i, enemy) in self.enemies.iter().enumerate() {
            if !enemy.x.is_finite() || !enemy.y.is_finite() {
                return Err(format!("enemies[{i}] position must be finite"));
            }
        }
        if !self.sounds.music_volume.is_finite() {
            return Err(format!(
                "sounds.music_volume must be a finite number, got {}",
                self.sounds.music_volume
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(format!("frame size {}x{} is empty", self.width, self.height));
        }
        if self.fov_deg <= 0.0 || self.fov_deg >= 180.0 {
            return Err(format!("fov_deg must be between 0 and 180, got {}", self.fov_deg));
        }
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text, path)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `explicit` if given, else [`DEFAULT_CONFIG_PATH`] if it exists, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let fallback = Path::new(DEFAULT_CONFIG_PATH);
        if fallback.exists() {
            Self::load(fallback)
        } else {
            log::info!("No {} found, using built-in defaults", DEFAULT_CONFIG_PATH);
            Ok(Self::default())
        }
    }

    pub fn player(&self) -> Player {
        Player::new(
            [self.start.x, self.start.y],
            self.start.angle_deg.to_radians(),
            self.fov_deg.to_radians(),
        )
    }

    pub fn enemies(&self) -> Vec<Enemy> {
        self.enemies
            .iter()
            .map(|e| Enemy {
                pos: [e.x, e.y],
                texture: e.texture.clone(),
            })
            .collect()
    }
}

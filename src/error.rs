use std::path::PathBuf;

use thiserror::Error;

/// Failures that can happen before the first frame is drawn.
///
/// Nothing in the per-frame render path returns these; bad lookups there fall back
/// to sentinel values instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read map {path}: {source}")]
    MapIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("map {0} has no rows")]
    EmptyMap(PathBuf),

    #[error("map row {row}, column {col}: tile {ch:?} is not an ASCII symbol")]
    InvalidTile { row: usize, col: usize, ch: char },

    #[error("failed to load texture {name:?} from {path}: {source}")]
    Texture {
        name: String,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("invalid config {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

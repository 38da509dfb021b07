use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::snake::Position;

const APP_DIR_NAME: &str = "classic-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default playfield width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = 20;

/// Default playfield height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = 20;

/// Fixed simulation cadence in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Logical grid dimensions passed through the game as a named type.
///
/// A dimension missing from a config file keeps its default.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Returns the center cell, rounding toward the bottom-right.
    #[must_use]
    pub fn center(self) -> Position {
        Position {
            x: i32::from(self.width / 2),
            y: i32::from(self.height / 2),
        }
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
        }
    }
}

/// Errors raised while loading or validating a [`GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: u16, height: u16 },
    #[error("origin ({x}, {y}) lies outside the {width}x{height} grid")]
    OriginOutOfBounds {
        x: i32,
        y: i32,
        width: u16,
        height: u16,
    },
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
}

/// Session settings shared by the simulation and the driving loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GameConfig {
    pub grid: GridSize,
    /// Cell the one-segment snake starts on after every reset.
    pub origin: Position,
    pub tick_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        let grid = GridSize::default();
        Self {
            grid,
            origin: grid.center(),
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ConfigOverrides {
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub tick_ms: Option<u64>,
}

/// On-disk JSON layout. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    grid: Option<GridSize>,
    origin: Option<Position>,
    tick_interval_ms: Option<u64>,
}

impl GameConfig {
    /// Loads the config from `path`, or from the per-user default location
    /// when `path` is `None`, then applies `overrides` and validates.
    ///
    /// A missing default file is not an error; a missing explicit file is.
    pub fn load(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => read_config_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => read_config_file(&path)?,
                _ => ConfigFile::default(),
            },
        };

        Self::from_parts(file, overrides)
    }

    /// Parses a JSON document and validates it without touching the filesystem.
    pub fn from_json(raw: &str, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let file = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        Self::from_parts(file, overrides)
    }

    fn from_parts(file: ConfigFile, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let mut grid = file.grid.unwrap_or_default();
        if let Some(width) = overrides.width {
            grid.width = width;
        }
        if let Some(height) = overrides.height {
            grid.height = height;
        }

        let tick_ms = overrides
            .tick_ms
            .or(file.tick_interval_ms)
            .unwrap_or(DEFAULT_TICK_INTERVAL_MS);

        let config = Self {
            grid,
            origin: file.origin.unwrap_or_else(|| grid.center()),
            tick_interval: Duration::from_millis(tick_ms),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the grid is non-empty, the origin lies on it and the tick is non-zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid.width,
                height: self.grid.height,
            });
        }

        if !self.origin.is_within_bounds(self.grid) {
            return Err(ConfigError::OriginOutOfBounds {
                x: self.origin.x,
                y: self.origin.y,
                width: self.grid.width,
                height: self.grid.height,
            });
        }

        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }

        Ok(())
    }
}

/// Returns the platform-correct default config path, if a config dir exists.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    Some(base)
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

use std::str::FromStr;

use crate::error::ConfigError;

const DEFAULT_ROWS: i64 = 10;
const DEFAULT_COLS: i64 = 14;
const DEFAULT_WIDTH: f32 = 840.0;
const DEFAULT_HEIGHT: f32 = 600.0;
const DEFAULT_TICK_MS: u64 = 16;
const DEFAULT_RENDER_FPS: u64 = 60;

/// Start-up settings. Fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub rows: usize,
    pub cols: usize,
    pub width: f32,
    pub height: f32,
    pub seed: Option<u64>,
    pub tick_ms: u64,
    pub render_fps: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS as usize,
            cols: DEFAULT_COLS as usize,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: None,
            tick_ms: DEFAULT_TICK_MS,
            render_fps: DEFAULT_RENDER_FPS,
        }
    }
}

impl Config {
    /// Reads `MAZE_ROWS`, `MAZE_COLS`, `MAZE_WIDTH`, `MAZE_HEIGHT`,
    /// `MAZE_SEED`, `MAZE_TICK_MS` and `MAZE_FPS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from `lookup`, falling back to defaults for missing keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let rows = parse_var::<i64>(&lookup, "MAZE_ROWS")?.unwrap_or(DEFAULT_ROWS);
        let cols = parse_var::<i64>(&lookup, "MAZE_COLS")?.unwrap_or(DEFAULT_COLS);
        if rows <= 0 || cols <= 0 {
            return Err(ConfigError::InvalidGrid { rows, cols });
        }

        let config = Self {
            rows: rows as usize,
            cols: cols as usize,
            width: parse_var::<f32>(&lookup, "MAZE_WIDTH")?.unwrap_or(DEFAULT_WIDTH),
            height: parse_var::<f32>(&lookup, "MAZE_HEIGHT")?.unwrap_or(DEFAULT_HEIGHT),
            seed: parse_var::<u64>(&lookup, "MAZE_SEED")?,
            tick_ms: parse_var::<u64>(&lookup, "MAZE_TICK_MS")?
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_TICK_MS),
            render_fps: parse_var::<u64>(&lookup, "MAZE_FPS")?
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_RENDER_FPS),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::InvalidGrid {
                rows: self.rows as i64,
                cols: self.cols as i64,
            });
        }
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.width) || !positive(self.height) {
            return Err(ConfigError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar { name, value }),
    }
}

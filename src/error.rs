use thiserror::Error;

/// Rejected start-up configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid must have at least one row and one column, got {rows}x{cols}")]
    InvalidGrid { rows: i64, cols: i64 },

    #[error("viewport must be positive, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("{name}={value:?} is not a valid value")]
    InvalidVar { name: &'static str, value: String },
}

/// Failures reported by the physics engine.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("invalid body shape: {width}x{height}")]
    InvalidShape { width: f32, height: f32 },

    #[error("body is not part of this world")]
    UnknownBody,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

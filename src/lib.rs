//! A random perfect maze turned into physics walls, with a ball to steer
//! from the top-left cell to the goal in the bottom-right one.

pub mod config;
pub mod error;
pub mod game;
pub mod generator;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod logging;
pub mod physics;
pub mod render;
pub mod session;
pub mod world;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{Error, Result};
pub use session::MazeSession;

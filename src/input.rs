use crossterm::event::KeyCode;

use crate::error::EngineError;
use crate::grid::Direction;
use crate::world::{PhysicsWorld, Vector};

/// Velocity added per key press.
pub const SPEED_STEP: f32 = 5.0;

/// W/A/S/D or the arrow keys; anything else is ignored.
pub fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Direction::Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Direction::Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Direction::Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

/// `velocity` nudged one step along a single axis.
pub fn nudge(velocity: Vector, direction: Direction) -> Vector {
    let Vector { x, y } = velocity;
    match direction {
        Direction::Up => Vector::new(x, y - SPEED_STEP),
        Direction::Down => Vector::new(x, y + SPEED_STEP),
        Direction::Left => Vector::new(x - SPEED_STEP, y),
        Direction::Right => Vector::new(x + SPEED_STEP, y),
    }
}

/// Applies one key press to `ball`. Returns whether the key was a direction.
pub fn handle_key<W: PhysicsWorld>(
    world: &mut W,
    ball: W::Body,
    code: KeyCode,
) -> Result<bool, EngineError> {
    let Some(direction) = direction_for(code) else {
        return Ok(false);
    };
    let velocity = world.velocity(ball)?;
    world.set_velocity(ball, nudge(velocity, direction))?;
    Ok(true)
}

//! The contract between the game logic and the physics engine running it.

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::EngineError;

/// A 2D vector in world units. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Label attached to every body the game creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Wall,
    Goal,
    Ball,
}

/// Two bodies that started touching during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair<B> {
    pub body_a: B,
    pub body_b: B,
}

/// Axis-aligned bounds of a body, for drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyView {
    pub tag: Tag,
    pub min: Vector,
    pub max: Vector,
}

/// A live physics world the game can populate and steer.
///
/// Creating a body also adds it to the world.
pub trait PhysicsWorld {
    type Body: Copy + Eq + Hash + Debug;

    fn create_static_rectangle(
        &mut self,
        center: Vector,
        width: f32,
        height: f32,
        tag: Tag,
    ) -> Result<Self::Body, EngineError>;

    fn create_dynamic_circle(
        &mut self,
        center: Vector,
        radius: f32,
        tag: Tag,
    ) -> Result<Self::Body, EngineError>;

    fn velocity(&self, body: Self::Body) -> Result<Vector, EngineError>;

    fn set_velocity(&mut self, body: Self::Body, velocity: Vector) -> Result<(), EngineError>;

    fn set_static(&mut self, body: Self::Body, is_static: bool) -> Result<(), EngineError>;

    fn gravity_y(&self) -> f32;

    fn set_gravity_y(&mut self, gravity_y: f32);

    fn tag(&self, body: Self::Body) -> Option<Tag>;

    fn bodies_with_tag(&self, tag: Tag) -> Vec<Self::Body>;

    /// Advances the simulation one tick and returns the pairs whose contact began in it.
    fn step(&mut self) -> Vec<CollisionPair<Self::Body>>;

    fn snapshot(&self) -> Vec<BodyView>;
}

//! In-memory world that records what the game asks of it.

use crate::error::EngineError;
use crate::world::{BodyView, CollisionPair, PhysicsWorld, Tag, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(usize);

#[derive(Debug, Clone)]
pub struct RecordedBody {
    pub tag: Tag,
    pub center: Vector,
    pub width: f32,
    pub height: f32,
    pub radius: Option<f32>,
    pub is_static: bool,
    pub velocity: Vector,
    set_static_calls: usize,
}

#[derive(Debug, Default)]
pub struct RecordingWorld {
    bodies: Vec<RecordedBody>,
    gravity_y: f32,
    gravity_writes: usize,
    pending: Vec<CollisionPair<BodyId>>,
    steps: usize,
}

impl RecordingWorld {
    pub fn body(&self, id: BodyId) -> &RecordedBody {
        &self.bodies[id.0]
    }

    pub fn set_static_calls(&self, id: BodyId) -> usize {
        self.bodies[id.0].set_static_calls
    }

    pub fn gravity_writes(&self) -> usize {
        self.gravity_writes
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Queues a pair to be reported by the next `step`.
    pub fn queue_collision(&mut self, body_a: BodyId, body_b: BodyId) {
        self.pending.push(CollisionPair { body_a, body_b });
    }

    fn get_mut(&mut self, id: BodyId) -> Result<&mut RecordedBody, EngineError> {
        self.bodies.get_mut(id.0).ok_or(EngineError::UnknownBody)
    }

    fn insert(&mut self, body: RecordedBody) -> BodyId {
        self.bodies.push(body);
        BodyId(self.bodies.len() - 1)
    }
}

impl PhysicsWorld for RecordingWorld {
    type Body = BodyId;

    fn create_static_rectangle(
        &mut self,
        center: Vector,
        width: f32,
        height: f32,
        tag: Tag,
    ) -> Result<BodyId, EngineError> {
        Ok(self.insert(RecordedBody {
            tag,
            center,
            width,
            height,
            radius: None,
            is_static: true,
            velocity: Vector::ZERO,
            set_static_calls: 0,
        }))
    }

    fn create_dynamic_circle(
        &mut self,
        center: Vector,
        radius: f32,
        tag: Tag,
    ) -> Result<BodyId, EngineError> {
        Ok(self.insert(RecordedBody {
            tag,
            center,
            width: radius * 2.0,
            height: radius * 2.0,
            radius: Some(radius),
            is_static: false,
            velocity: Vector::ZERO,
            set_static_calls: 0,
        }))
    }

    fn velocity(&self, body: BodyId) -> Result<Vector, EngineError> {
        self.bodies
            .get(body.0)
            .map(|b| b.velocity)
            .ok_or(EngineError::UnknownBody)
    }

    fn set_velocity(&mut self, body: BodyId, velocity: Vector) -> Result<(), EngineError> {
        self.get_mut(body)?.velocity = velocity;
        Ok(())
    }

    fn set_static(&mut self, body: BodyId, is_static: bool) -> Result<(), EngineError> {
        let body = self.get_mut(body)?;
        body.is_static = is_static;
        body.set_static_calls += 1;
        Ok(())
    }

    fn gravity_y(&self) -> f32 {
        self.gravity_y
    }

    fn set_gravity_y(&mut self, gravity_y: f32) {
        self.gravity_y = gravity_y;
        self.gravity_writes += 1;
    }

    fn tag(&self, body: BodyId) -> Option<Tag> {
        self.bodies.get(body.0).map(|b| b.tag)
    }

    fn bodies_with_tag(&self, tag: Tag) -> Vec<BodyId> {
        self.bodies
            .iter()
            .enumerate()
            .filter(|(_, b)| b.tag == tag)
            .map(|(idx, _)| BodyId(idx))
            .collect()
    }

    fn step(&mut self) -> Vec<CollisionPair<BodyId>> {
        self.steps += 1;
        std::mem::take(&mut self.pending)
    }

    fn snapshot(&self) -> Vec<BodyView> {
        self.bodies
            .iter()
            .map(|b| BodyView {
                tag: b.tag,
                min: Vector::new(b.center.x - b.width / 2.0, b.center.y - b.height / 2.0),
                max: Vector::new(b.center.x + b.width / 2.0, b.center.y + b.height / 2.0),
            })
            .collect()
    }
}

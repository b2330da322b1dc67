//! `PhysicsWorld` backed by rapier.

use std::collections::{HashMap, HashSet};

use rapier2d::dynamics::{
    CCDSolver, ImpulseJointSet, IntegrationParameters, IslandManager, MultibodyJointSet,
    RigidBodyBuilder, RigidBodyHandle, RigidBodySet, RigidBodyType,
};
use rapier2d::geometry::{BroadPhase, ColliderBuilder, ColliderHandle, ColliderSet, NarrowPhase};
use rapier2d::na::Vector2;
use rapier2d::pipeline::{PhysicsPipeline, QueryPipeline};

use crate::error::EngineError;
use crate::world::{BodyView, CollisionPair, PhysicsWorld, Tag, Vector};

/// Simulated time per step. Velocities are in world units per step.
const STEP_DT: f32 = 1.0;

pub struct RapierWorld {
    gravity: Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,

    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,

    tags: HashMap<RigidBodyHandle, Tag>,
    touching: HashSet<(ColliderHandle, ColliderHandle)>,
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl RapierWorld {
    /// An empty world with gravity switched off.
    pub fn new() -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = STEP_DT;
        Self {
            gravity: Vector2::new(0.0, 0.0),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),

            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),

            tags: HashMap::new(),
            touching: HashSet::new(),
        }
    }

    /// Whether `body` is currently fixed in place.
    pub fn is_static(&self, body: RigidBodyHandle) -> Option<bool> {
        self.rigid_body_set.get(body).map(|b| b.is_fixed())
    }

    /// Current center of `body`.
    pub fn position(&self, body: RigidBodyHandle) -> Option<Vector> {
        self.rigid_body_set.get(body).map(|b| {
            let t = b.translation();
            Vector::new(t.x, t.y)
        })
    }

    fn body_of(&self, collider: ColliderHandle) -> Option<RigidBodyHandle> {
        self.collider_set.get(collider).and_then(|c| c.parent())
    }
}

fn check_size(width: f32, height: f32) -> Result<(), EngineError> {
    let valid = |v: f32| v.is_finite() && v > 0.0;
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(EngineError::InvalidShape { width, height })
    }
}

impl PhysicsWorld for RapierWorld {
    type Body = RigidBodyHandle;

    fn create_static_rectangle(
        &mut self,
        center: Vector,
        width: f32,
        height: f32,
        tag: Tag,
    ) -> Result<RigidBodyHandle, EngineError> {
        check_size(width, height)?;
        let rigid_body = RigidBodyBuilder::fixed()
            .translation(Vector2::new(center.x, center.y))
            .build();
        let handle = self.rigid_body_set.insert(rigid_body);

        let collider = ColliderBuilder::cuboid(width / 2.0, height / 2.0).build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);

        self.tags.insert(handle, tag);
        Ok(handle)
    }

    fn create_dynamic_circle(
        &mut self,
        center: Vector,
        radius: f32,
        tag: Tag,
    ) -> Result<RigidBodyHandle, EngineError> {
        check_size(radius * 2.0, radius * 2.0)?;
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(Vector2::new(center.x, center.y))
            .ccd_enabled(true)
            .build();
        let handle = self.rigid_body_set.insert(rigid_body);

        let collider = ColliderBuilder::ball(radius).build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);

        self.tags.insert(handle, tag);
        Ok(handle)
    }

    fn velocity(&self, body: RigidBodyHandle) -> Result<Vector, EngineError> {
        let rigid_body = self.rigid_body_set.get(body).ok_or(EngineError::UnknownBody)?;
        let linvel = rigid_body.linvel();
        Ok(Vector::new(linvel.x, linvel.y))
    }

    fn set_velocity(&mut self, body: RigidBodyHandle, velocity: Vector) -> Result<(), EngineError> {
        let rigid_body = self
            .rigid_body_set
            .get_mut(body)
            .ok_or(EngineError::UnknownBody)?;
        rigid_body.set_linvel(Vector2::new(velocity.x, velocity.y), true);
        Ok(())
    }

    fn set_static(&mut self, body: RigidBodyHandle, is_static: bool) -> Result<(), EngineError> {
        let rigid_body = self
            .rigid_body_set
            .get_mut(body)
            .ok_or(EngineError::UnknownBody)?;
        let body_type = if is_static {
            RigidBodyType::Fixed
        } else {
            RigidBodyType::Dynamic
        };
        rigid_body.set_body_type(body_type, true);
        Ok(())
    }

    fn gravity_y(&self) -> f32 {
        self.gravity.y
    }

    fn set_gravity_y(&mut self, gravity_y: f32) {
        self.gravity.y = gravity_y;
    }

    fn tag(&self, body: RigidBodyHandle) -> Option<Tag> {
        self.tags.get(&body).copied()
    }

    fn bodies_with_tag(&self, tag: Tag) -> Vec<RigidBodyHandle> {
        self.tags
            .iter()
            .filter(|(_, t)| **t == tag)
            .map(|(&handle, _)| handle)
            .collect()
    }

    fn step(&mut self) -> Vec<CollisionPair<RigidBodyHandle>> {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        let touching: HashSet<(ColliderHandle, ColliderHandle)> = self
            .narrow_phase
            .contact_pairs()
            .filter(|pair| pair.has_any_active_contact)
            .map(|pair| (pair.collider1, pair.collider2))
            .collect();

        let started: Vec<_> = touching
            .difference(&self.touching)
            .filter_map(|&(a, b)| {
                Some(CollisionPair {
                    body_a: self.body_of(a)?,
                    body_b: self.body_of(b)?,
                })
            })
            .collect();
        self.touching = touching;
        started
    }

    fn snapshot(&self) -> Vec<BodyView> {
        self.collider_set
            .iter()
            .filter_map(|(_, collider)| {
                let tag = self.tags.get(&collider.parent()?)?;
                let aabb = collider.compute_aabb();
                Some(BodyView {
                    tag: *tag,
                    min: Vector::new(aabb.mins.x, aabb.mins.y),
                    max: Vector::new(aabb.maxs.x, aabb.maxs.y),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_round_trips() {
        let mut world = RapierWorld::new();
        let ball = world
            .create_dynamic_circle(Vector::new(15.0, 15.0), 7.5, Tag::Ball)
            .unwrap();
        assert_eq!(world.velocity(ball).unwrap(), Vector::ZERO);
        world.set_velocity(ball, Vector::new(0.0, -5.0)).unwrap();
        assert_eq!(world.velocity(ball).unwrap(), Vector::new(0.0, -5.0));
        assert_eq!(world.tag(ball), Some(Tag::Ball));
    }

    #[test]
    fn rejects_degenerate_shapes() {
        let mut world = RapierWorld::new();
        let err = world
            .create_static_rectangle(Vector::ZERO, 0.0, 5.0, Tag::Wall)
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidShape { width: 0.0, height: 5.0 });
        assert!(world
            .create_dynamic_circle(Vector::ZERO, f32::NAN, Tag::Ball)
            .is_err());
    }

    #[test]
    fn reports_contact_start() {
        let mut world = RapierWorld::new();
        let goal = world
            .create_static_rectangle(Vector::new(50.0, 50.0), 20.0, 20.0, Tag::Goal)
            .unwrap();
        let ball = world
            .create_dynamic_circle(Vector::new(50.0, 36.0), 5.0, Tag::Ball)
            .unwrap();

        let pairs = world.step();
        assert_eq!(pairs.len(), 1);
        let pair = pairs[0];
        let mut bodies = [pair.body_a, pair.body_b];
        bodies.sort_by_key(|&b| world.tag(b) == Some(Tag::Goal));
        assert_eq!(bodies, [ball, goal]);
    }

    #[test]
    fn released_walls_fall() {
        let mut world = RapierWorld::new();
        let wall = world
            .create_static_rectangle(Vector::new(100.0, 100.0), 60.0, 5.0, Tag::Wall)
            .unwrap();
        assert_eq!(world.is_static(wall), Some(true));
        assert_eq!(world.bodies_with_tag(Tag::Wall), vec![wall]);

        world.set_gravity_y(1.0);
        world.set_static(wall, false).unwrap();
        assert_eq!(world.is_static(wall), Some(false));
        for _ in 0..5 {
            world.step();
        }
        let y = world.position(wall).unwrap().y;
        assert!(y > 100.0, "wall stayed at {y}");
    }

    #[test]
    fn snapshot_bounds_bodies() {
        let mut world = RapierWorld::new();
        world
            .create_static_rectangle(Vector::new(10.0, 20.0), 4.0, 6.0, Tag::Wall)
            .unwrap();
        let views = world.snapshot();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].tag, Tag::Wall);
        assert!((views[0].min.x - 8.0).abs() < 1e-3);
        assert!((views[0].max.y - 23.0).abs() < 1e-3);
    }
}

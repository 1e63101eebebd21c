use glam::Vec2;
use rapier2d::prelude::*;

use std::num::NonZeroUsize;

use crate::api::PhysicsEngine;
use crate::types::{BodyDesc, BodyHandle, BodyKind, Pose, ShapeKind, WorldConfig};

fn to_na(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

fn from_na(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Rapier2D world behind the [`PhysicsEngine`] contract.
///
/// Bodies are addressed by the index of their Rapier handle in `handles`;
/// removed slots stay `None` so handles are never reused within one world.
pub struct SimulationWorld {
    gravity: Vector<Real>,
    allow_sleep: bool,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    handles: Vec<Option<RigidBodyHandle>>,
}

impl SimulationWorld {
    fn rapier_handle(&self, body: BodyHandle) -> Option<RigidBodyHandle> {
        self.handles.get(body.0 as usize).copied().flatten()
    }

    fn rigid_body(&self, body: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(self.rapier_handle(body)?)
    }
}

impl PhysicsEngine for SimulationWorld {
    fn new(cfg: &WorldConfig) -> Self {
        Self {
            gravity: to_na(cfg.gravity),
            allow_sleep: cfg.allow_sleep,
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            handles: Vec::new(),
        }
    }

    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let builder = match desc.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Static => RigidBodyBuilder::fixed(),
        };
        let rb = builder
            .translation(to_na(desc.position))
            .linvel(to_na(desc.linear_velocity))
            .can_sleep(self.allow_sleep)
            .build();
        let rb_handle = self.bodies.insert(rb);

        let collider = match desc.shape {
            ShapeKind::Circle { radius } => ColliderBuilder::ball(radius),
            ShapeKind::Box { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            }
        }
        .friction(desc.material.friction)
        .density(desc.material.density)
        .restitution(desc.material.restitution)
        .build();
        self.colliders
            .insert_with_parent(collider, rb_handle, &mut self.bodies);

        let handle = BodyHandle(self.handles.len() as u32);
        self.handles.push(Some(rb_handle));
        handle
    }

    fn remove_body(&mut self, body: BodyHandle) {
        let Some(slot) = self.handles.get_mut(body.0 as usize) else {
            return;
        };
        if let Some(rb_handle) = slot.take() {
            self.bodies.remove(
                rb_handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
        }
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn step(&mut self, dt: f32, velocity_iterations: usize, position_iterations: usize) {
        self.integration_parameters.dt = dt;
        self.integration_parameters.num_solver_iterations =
            NonZeroUsize::new(velocity_iterations).unwrap_or(NonZeroUsize::MIN);
        self.integration_parameters.num_internal_stabilization_iterations = position_iterations;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    fn apply_linear_impulse(&mut self, body: BodyHandle, impulse: Vec2, wake: bool) {
        let Some(rb_handle) = self.rapier_handle(body) else {
            return;
        };
        if let Some(rb) = self.bodies.get_mut(rb_handle) {
            rb.apply_impulse(to_na(impulse), wake);
        }
    }

    fn pose(&self, body: BodyHandle) -> Option<Pose> {
        let rb = self.rigid_body(body)?;
        Some(Pose {
            position: from_na(rb.translation()),
            angle: rb.rotation().angle(),
        })
    }

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.rigid_body(body).map(|rb| from_na(rb.linvel()))
    }

    fn is_static(&self, body: BodyHandle) -> Option<bool> {
        self.rigid_body(body).map(|rb| rb.is_fixed())
    }

    fn shape(&self, body: BodyHandle) -> Option<ShapeKind> {
        let rb = self.rigid_body(body)?;
        let collider = self.colliders.get(*rb.colliders().first()?)?;
        let shape = collider.shape();
        if let Some(ball) = shape.as_ball() {
            Some(ShapeKind::Circle { radius: ball.radius })
        } else {
            shape.as_cuboid().map(|cuboid| ShapeKind::Box {
                half_extents: from_na(&cuboid.half_extents),
            })
        }
    }
}

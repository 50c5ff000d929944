//! Rigid-body world used by the field mode
//!
//! The game never integrates bodies itself; it pushes velocities in, steps
//! the world once per frame and copies transforms back out. `RapierWorld`
//! puts rapier behind that seam: bodies collide with the ground slab only,
//! never with each other, so pickups stay a distance check in the field.

use glam::{Quat, Vec3};
use rapier3d::prelude::*;

/// Opaque body handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub u32);

/// Collision shape of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

/// Body creation parameters
#[derive(Debug, Clone, Copy)]
pub struct BodyDesc {
    pub position: Vec3,
    pub shape: BodyShape,
    pub restitution: f32,
    pub friction: f32,
    /// Angular velocity given on creation and after every reset
    pub spin: Vec3,
    /// Keep the body upright
    pub lock_rotations: bool,
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            shape: BodyShape::Ball { radius: 0.5 },
            restitution: 0.3,
            friction: 0.5,
            spin: Vec3::ZERO,
            lock_rotations: false,
        }
    }
}

/// Services the field needs from a physics engine
pub trait PhysicsWorld {
    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle;
    fn step(&mut self, dt: f32);
    fn translation(&self, body: BodyHandle) -> Option<Vec3>;
    fn rotation(&self, body: BodyHandle) -> Option<Quat>;
    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec3>;
    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec3);
    /// Teleport, drop all linear motion and restore the creation spin
    fn reset_body(&mut self, body: BodyHandle, position: Vec3);
    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3);
}

/// Ground slab: top face at y = 0
const GROUND_HALF_EXTENTS: Vec3 = Vec3::new(25.0, 0.1, 100.0);
/// Ground slab collides with everything, bodies only with the ground
const GROUND_GROUP: Group = Group::GROUP_1;
const BODY_GROUP: Group = Group::GROUP_2;

fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Rapier-backed world with a single static ground slab
pub struct RapierWorld {
    pub gravity: Vec3,
    physics_pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    /// Index is the `BodyHandle`
    bodies: Vec<(RigidBodyHandle, BodyDesc)>,
}

impl Default for RapierWorld {
    fn default() -> Self {
        let mut collider_set = ColliderSet::new();
        let ground = ColliderBuilder::cuboid(
            GROUND_HALF_EXTENTS.x,
            GROUND_HALF_EXTENTS.y,
            GROUND_HALF_EXTENTS.z,
        )
        .translation(vector![0.0, -GROUND_HALF_EXTENTS.y, 0.0])
        .collision_groups(InteractionGroups::new(GROUND_GROUP, Group::ALL))
        .build();
        collider_set.insert(ground);

        Self {
            gravity: Vec3::new(0.0, -9.82, 0.0),
            physics_pipeline: PhysicsPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set,
            bodies: Vec::new(),
        }
    }
}

impl RapierWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        let (rb, _) = self.bodies.get(handle.0 as usize)?;
        self.rigid_body_set.get(*rb)
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<(&mut RigidBody, &BodyDesc)> {
        let (rb, desc) = self.bodies.get(handle.0 as usize)?;
        self.rigid_body_set.get_mut(*rb).map(|body| (body, desc))
    }
}

impl PhysicsWorld for RapierWorld {
    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let mut builder = RigidBodyBuilder::dynamic()
            .translation(to_vector(desc.position))
            .angvel(to_vector(desc.spin));
        if desc.lock_rotations {
            builder = builder.lock_rotations();
        }
        let rb = self.rigid_body_set.insert(builder.build());

        let collider = match desc.shape {
            BodyShape::Ball { radius } => ColliderBuilder::ball(radius),
            BodyShape::Cuboid { half_extents: h } => ColliderBuilder::cuboid(h.x, h.y, h.z),
        }
        .restitution(desc.restitution)
        .friction(desc.friction)
        .collision_groups(InteractionGroups::new(BODY_GROUP, GROUND_GROUP))
        .build();
        self.collider_set
            .insert_with_parent(collider, rb, &mut self.rigid_body_set);

        let handle = BodyHandle(self.bodies.len() as u32);
        self.bodies.push((rb, desc));
        handle
    }

    fn step(&mut self, dt: f32) {
        if dt.is_nan() || dt <= 0.0 {
            return;
        }
        self.integration_parameters.dt = dt;

        self.physics_pipeline.step(
            &to_vector(self.gravity),
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
    }

    fn translation(&self, body: BodyHandle) -> Option<Vec3> {
        self.body(body).map(|b| to_vec3(b.translation()))
    }

    fn rotation(&self, body: BodyHandle) -> Option<Quat> {
        self.body(body).map(|b| {
            let r = b.rotation();
            Quat::from_xyzw(r.i, r.j, r.k, r.w)
        })
    }

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec3> {
        self.body(body).map(|b| to_vec3(b.linvel()))
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec3) {
        if let Some((b, _)) = self.body_mut(body) {
            b.set_linvel(to_vector(velocity), true);
        }
    }

    fn reset_body(&mut self, body: BodyHandle, position: Vec3) {
        if let Some((b, desc)) = self.body_mut(body) {
            let spin = to_vector(desc.spin);
            b.set_translation(to_vector(position), true);
            b.set_rotation(Rotation::identity(), true);
            b.set_linvel(Vector::zeros(), true);
            b.set_angvel(spin, true);
        }
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3) {
        if let Some((b, _)) = self.body_mut(body) {
            b.apply_impulse(to_vector(impulse), true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn airborne(shape: BodyShape) -> BodyDesc {
        BodyDesc {
            position: Vec3::new(0.0, 5.0, 0.0),
            shape,
            ..Default::default()
        }
    }

    #[test]
    fn test_body_falls_and_rests_on_ground() {
        let mut world = RapierWorld::new();
        let body = world.add_body(BodyDesc {
            restitution: 0.0,
            ..airborne(BodyShape::Ball { radius: 0.5 })
        });

        for _ in 0..600 {
            world.step(DT);
        }
        let pos = world.translation(body).unwrap();
        assert!((pos.y - 0.5).abs() < 0.02, "resting height {}", pos.y);
    }

    #[test]
    fn test_impulse_and_reset() {
        let mut world = RapierWorld::new();
        let body = world.add_body(airborne(BodyShape::Cuboid {
            half_extents: Vec3::splat(0.5),
        }));
        world.apply_impulse(body, Vec3::new(2.0, 0.0, 0.0));
        world.step(0.1);
        assert!(world.translation(body).unwrap().x > 0.0);

        world.reset_body(body, Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(world.linear_velocity(body), Some(Vec3::ZERO));
        assert_eq!(world.translation(body), Some(Vec3::new(0.0, 0.5, 0.0)));
        assert_eq!(world.rotation(body), Some(Quat::IDENTITY));
    }

    #[test]
    fn test_unknown_handle_is_ignored() {
        let mut world = RapierWorld::new();
        world.apply_impulse(BodyHandle(7), Vec3::ONE);
        world.reset_body(BodyHandle(7), Vec3::ZERO);
        assert!(world.translation(BodyHandle(7)).is_none());
    }

    #[test]
    fn test_spin_rotates() {
        let mut world = RapierWorld::new();
        let body = world.add_body(BodyDesc {
            spin: Vec3::new(0.0, 1.0, 0.0),
            ..airborne(BodyShape::Ball { radius: 0.5 })
        });
        world.step(0.5);
        assert_ne!(world.rotation(body), Some(Quat::IDENTITY));
    }

    #[test]
    fn test_bodies_pass_through_each_other() {
        let mut world = RapierWorld::new();
        let a = world.add_body(airborne(BodyShape::Ball { radius: 0.5 }));
        let b = world.add_body(BodyDesc {
            position: Vec3::new(0.2, 5.0, 0.0),
            ..airborne(BodyShape::Ball { radius: 0.5 })
        });
        world.step(DT);
        // Overlapping bodies are not pushed apart
        assert!(world.translation(a).unwrap().x.abs() < 1e-6);
        assert!((world.translation(b).unwrap().x - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_non_positive_dt_does_not_step() {
        let mut world = RapierWorld::new();
        let body = world.add_body(airborne(BodyShape::Ball { radius: 0.5 }));
        world.step(0.0);
        world.step(f32::NAN);
        assert_eq!(world.translation(body), Some(Vec3::new(0.0, 5.0, 0.0)));
    }
}

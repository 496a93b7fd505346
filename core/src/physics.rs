//! Physics seam. The game only needs bodies, a fixed step, poses and the
//! contacts that started during the last step.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Mutex;

use rapier3d::na::{Isometry3, Quaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::*;

use crate::math::{Pose, Quat, Vec3};

/// Collision filter layer. Movers collide with static geometry only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionLayer {
    Static,
    Mover,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    Sphere { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

/// Everything needed to create one rigid body with a single collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub pose: Pose,
    pub shape: BodyShape,
    /// 0 = static, > 0 = dynamic
    pub mass: f32,
    pub restitution: f32,
    pub friction: f32,
    pub layer: CollisionLayer,
    /// Emit contact-start events for this body
    pub report_contacts: bool,
}

impl BodyDesc {
    pub fn fixed(pose: Pose, shape: BodyShape) -> Self {
        Self {
            pose,
            shape,
            mass: 0.0,
            restitution: 0.0,
            friction: 0.5,
            layer: CollisionLayer::Static,
            report_contacts: false,
        }
    }

    pub fn dynamic(pose: Pose, shape: BodyShape, mass: f32) -> Self {
        Self {
            mass,
            layer: CollisionLayer::Mover,
            ..Self::fixed(pose, shape)
        }
    }

    pub fn with_restitution(self, restitution: f32) -> Self {
        Self {
            restitution,
            ..self
        }
    }

    pub fn with_friction(self, friction: f32) -> Self {
        Self { friction, ..self }
    }

    pub fn reporting_contacts(self) -> Self {
        Self {
            report_contacts: true,
            ..self
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.mass > 0.0
    }
}

/// Two bodies that started touching during the last step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact<H> {
    pub a: H,
    pub b: H,
}

pub trait PhysicsWorld {
    type Handle: Copy + Eq + Hash + Debug;

    fn insert(&mut self, desc: &BodyDesc) -> Self::Handle;

    /// Remove a body. Unknown handles return `false`.
    fn remove(&mut self, handle: Self::Handle) -> bool;

    /// Advance the simulation by `dt` seconds.
    fn step(&mut self, dt: f32);

    fn pose(&self, handle: Self::Handle) -> Option<Pose>;

    /// Move contacts that started since the last drain into `out`, in engine order.
    fn drain_contacts(&mut self, out: &mut Vec<Contact<Self::Handle>>);

    fn body_count(&self) -> usize;
}

/// Collects contact starts during a step. Plain mutex, no channels, so it also runs on wasm.
#[derive(Default)]
struct ContactCollector {
    started: Mutex<Vec<(ColliderHandle, ColliderHandle)>>,
}

impl ContactCollector {
    fn take(&self) -> Vec<(ColliderHandle, ColliderHandle)> {
        let mut started = self.started.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *started)
    }
}

impl EventHandler for ContactCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let CollisionEvent::Started(a, b, _) = event {
            self.started
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push((a, b));
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

fn to_isometry(pose: Pose) -> Isometry3<Real> {
    let p = pose.position;
    let r = pose.rotation;
    Isometry3::from_parts(
        Translation3::new(p.x, p.y, p.z),
        UnitQuaternion::from_quaternion(Quaternion::new(r.w, r.x, r.y, r.z)),
    )
}

fn from_isometry(iso: &Isometry3<Real>) -> Pose {
    let t = iso.translation.vector;
    let r = iso.rotation;
    Pose {
        position: Vec3::new(t.x, t.y, t.z),
        rotation: Quat::from_xyzw(r.i, r.j, r.k, r.w),
    }
}

fn interaction_groups(layer: CollisionLayer) -> InteractionGroups {
    match layer {
        CollisionLayer::Static => InteractionGroups::new(Group::GROUP_1, Group::ALL),
        CollisionLayer::Mover => InteractionGroups::new(Group::GROUP_2, Group::GROUP_1),
    }
}

/// Rapier-backed world.
pub struct RapierWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    collector: ContactCollector,
}

impl RapierWorld {
    pub fn new(gravity_y: f32) -> Self {
        Self {
            gravity: vector![0.0, gravity_y, 0.0],
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            collector: ContactCollector::default(),
        }
    }
}

impl PhysicsWorld for RapierWorld {
    type Handle = RigidBodyHandle;

    fn insert(&mut self, desc: &BodyDesc) -> RigidBodyHandle {
        let builder = if desc.is_dynamic() {
            RigidBodyBuilder::dynamic().ccd_enabled(true)
        } else {
            RigidBodyBuilder::fixed()
        };
        let handle = self.bodies.insert(builder.position(to_isometry(desc.pose)).build());

        let mut collider = match desc.shape {
            BodyShape::Sphere { radius } => ColliderBuilder::ball(radius),
            BodyShape::Cuboid { half_extents: h } => ColliderBuilder::cuboid(h.x, h.y, h.z),
        }
        .restitution(desc.restitution)
        .friction(desc.friction)
        .collision_groups(interaction_groups(desc.layer));
        if desc.is_dynamic() {
            collider = collider.mass(desc.mass);
        }
        if desc.report_contacts {
            collider = collider.active_events(ActiveEvents::COLLISION_EVENTS);
        }

        self.colliders
            .insert_with_parent(collider.build(), handle, &mut self.bodies);
        handle
    }

    fn remove(&mut self, handle: RigidBodyHandle) -> bool {
        self.bodies
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.pipeline.step(
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
            None,
            &(),
            &self.collector,
        );
    }

    fn pose(&self, handle: RigidBodyHandle) -> Option<Pose> {
        self.bodies.get(handle).map(|body| from_isometry(body.position()))
    }

    fn drain_contacts(&mut self, out: &mut Vec<Contact<RigidBodyHandle>>) {
        for (c1, c2) in self.collector.take() {
            let parent = |c: ColliderHandle| self.colliders.get(c).and_then(|col| col.parent());
            if let (Some(a), Some(b)) = (parent(c1), parent(c2)) {
                out.push(Contact { a, b });
            }
        }
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3;

    const DT: f32 = 1.0 / 60.0;

    fn floor() -> BodyDesc {
        BodyDesc::fixed(
            Pose::from_position(vec3(0.0, 0.0, 0.0)),
            BodyShape::Cuboid {
                half_extents: vec3(5.0, 0.2, 5.0),
            },
        )
    }

    fn ball_at(y: f32) -> BodyDesc {
        BodyDesc::dynamic(
            Pose::from_position(vec3(0.0, y, 0.0)),
            BodyShape::Sphere { radius: 0.4 },
            1.0,
        )
    }

    #[test]
    fn dynamic_body_falls_under_gravity() {
        let mut world = RapierWorld::new(-9.0);
        let ball = world.insert(&ball_at(10.0));
        for _ in 0..30 {
            world.step(DT);
        }
        let pose = world.pose(ball).unwrap();
        assert!(pose.position.y < 10.0);
    }

    #[test]
    fn static_body_stays_put() {
        let mut world = RapierWorld::new(-9.0);
        let f = world.insert(&floor());
        for _ in 0..30 {
            world.step(DT);
        }
        assert_eq!(world.pose(f).unwrap().position, vec3(0.0, 0.0, 0.0));
    }

    #[test]
    fn reporting_body_produces_contact_with_floor() {
        let mut world = RapierWorld::new(-9.0);
        let f = world.insert(&floor());
        let ball = world.insert(&ball_at(2.0).reporting_contacts());

        let mut contacts = Vec::new();
        for _ in 0..120 {
            world.step(DT);
            world.drain_contacts(&mut contacts);
        }
        assert!(contacts
            .iter()
            .any(|c| (c.a == ball && c.b == f) || (c.a == f && c.b == ball)));
    }

    #[test]
    fn movers_do_not_collide_with_each_other() {
        let mut world = RapierWorld::new(0.0);
        let a = world.insert(&ball_at(0.0).reporting_contacts());
        let b = world.insert(&ball_at(0.1).reporting_contacts());

        let mut contacts = Vec::new();
        for _ in 0..10 {
            world.step(DT);
            world.drain_contacts(&mut contacts);
        }
        assert!(contacts.is_empty());
        // Overlapping movers are not pushed apart.
        let dy = world.pose(b).unwrap().position.y - world.pose(a).unwrap().position.y;
        assert!((dy - 0.1).abs() < 1e-4);
    }

    #[test]
    fn removed_body_has_no_pose() {
        let mut world = RapierWorld::new(-9.0);
        let ball = world.insert(&ball_at(3.0));
        assert_eq!(world.body_count(), 1);
        assert!(world.remove(ball));
        assert!(world.pose(ball).is_none());
        assert!(!world.remove(ball));
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn pose_round_trips_rotation() {
        let mut world = RapierWorld::new(0.0);
        let q = Quat::from_rotation_y(0.7);
        let body = world.insert(&BodyDesc::fixed(
            Pose::from_position(vec3(1.0, 2.0, 3.0)).with_rotation(q),
            BodyShape::Sphere { radius: 1.0 },
        ));
        let pose = world.pose(body).unwrap();
        assert!((pose.rotation.y - q.y).abs() < 1e-5);
        assert!((pose.rotation.w - q.w).abs() < 1e-5);
    }
}

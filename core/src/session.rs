//! One game session: the physics world, the entity table, the wallet and the
//! per-frame loop that keeps them consistent with the scene.
//!
//! A frame is strictly: step physics once, drain the contacts that step
//! produced, run them through the scoring state machine, then copy every live
//! body's pose into its visual. The caller renders after `frame` returns.

use std::collections::HashMap;

use crate::board::{bucket_placements, wall_placements, BoardLayout, BoxPlacement, PinCue};
use crate::buckets::BucketZones;
use crate::clock::FrameClock;
use crate::config::GameConfig;
use crate::math::{Pose, Quat, Vec3};
use crate::physics::{BodyDesc, BodyShape, Contact, PhysicsWorld};
use crate::registry::{EntityId, EntityKind, EntityPair, EntityRegistry};
use crate::scene::{SceneGraph, VisualKind};
use crate::scoring::{self, BallState, Outcome, StaticRole};
use crate::spawner::DropSpawner;
use crate::wallet::Wallet;

/// Something that happened during a frame, for audio, HUD and logs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    PinStruck {
        ball: EntityId,
        cue: PinCue,
        position: Vec3,
        wallet: u64,
    },
    BallScored {
        ball: EntityId,
        /// Bucket whose floor the ball touched
        bucket: usize,
        /// Zone the landing x fell into, if any
        zone: Option<usize>,
        multiplier: u32,
        landing: Vec3,
        wallet: u64,
    },
    CoinSpawned {
        coin: EntityId,
        position: Vec3,
    },
    BallRemoved {
        ball: EntityId,
    },
    CoinExpired {
        coin: EntityId,
    },
}

/// Result of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub step: u64,
    pub sim_time: f64,
    pub events: Vec<GameEvent>,
}

type BallContact<V, H> = (EntityId, EntityPair<V, H>, H);

pub struct GameSession<W: PhysicsWorld, V> {
    config: GameConfig,
    zones: BucketZones,
    world: W,
    registry: EntityRegistry<V, W::Handle>,
    statics: HashMap<W::Handle, StaticRole>,
    ball_states: HashMap<EntityId, BallState>,
    wallet: Wallet,
    clock: FrameClock,
    spawner: DropSpawner,
    /// Contacts waiting for dispatch, filled right after each step
    contacts: Vec<Contact<W::Handle>>,
    board_built: bool,
}

impl<W: PhysicsWorld, V: Copy> GameSession<W, V> {
    pub fn new(config: GameConfig, world: W) -> Result<Self, String> {
        config.validate()?;
        let zones = BucketZones::new(config.buckets.zones.clone())?;
        let clock = FrameClock::new(config.physics.fixed_dt);
        let spawner = DropSpawner::new(&config.ball, config.rng_seed);

        Ok(Self {
            config,
            zones,
            world,
            registry: EntityRegistry::new(),
            statics: HashMap::new(),
            ball_states: HashMap::new(),
            wallet: Wallet::new(),
            clock,
            spawner,
            contacts: Vec::new(),
            board_built: false,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn wallet(&self) -> u64 {
        self.wallet.balance()
    }

    pub fn clock(&self) -> FrameClock {
        self.clock
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn registry(&self) -> &EntityRegistry<V, W::Handle> {
        &self.registry
    }

    pub fn is_board_built(&self) -> bool {
        self.board_built
    }

    pub fn ball_count(&self) -> usize {
        self.registry.len(EntityKind::Ball)
    }

    pub fn coin_count(&self) -> usize {
        self.registry.len(EntityKind::Coin)
    }

    pub fn ball_state(&self, id: EntityId) -> Option<BallState> {
        self.ball_states.get(&id).copied()
    }

    /// Create the static board: pins, containment walls and buckets.
    /// Only the first call has an effect.
    pub fn build_board<S>(&mut self, layout: &BoardLayout, scene: &mut S) -> bool
    where
        S: SceneGraph<Handle = V>,
    {
        if self.board_built {
            tracing::warn!("board already built, ignoring");
            return false;
        }

        for pin in &layout.pins {
            let desc = BodyDesc::fixed(
                Pose::from_position(pin.position),
                BodyShape::Sphere {
                    radius: pin.radius * self.config.pins.collider_scale,
                },
            )
            .with_restitution(self.config.pins.restitution);
            let handle = self.world.insert(&desc);
            self.statics.insert(
                handle,
                StaticRole::Pin {
                    cue: pin.cue,
                    position: pin.position,
                },
            );
            scene.spawn_visual(
                VisualKind::Pin {
                    radius: pin.radius,
                    cue: pin.cue,
                },
                Pose::from_position(pin.position),
            );
        }

        for wall in wall_placements(layout, &self.config) {
            self.insert_static_box(wall, StaticRole::Wall);
        }

        let bucket_yaw = Quat::from_rotation_y(-std::f32::consts::FRAC_PI_2);
        for bucket in bucket_placements(&self.config) {
            scene.spawn_visual(
                VisualKind::Bucket {
                    index: bucket.index,
                    scale: self.config.buckets.model_scale,
                },
                Pose::from_position(bucket.origin).with_rotation(bucket_yaw),
            );
            self.insert_static_box(
                bucket.floor,
                StaticRole::BucketFloor {
                    bucket: bucket.index,
                },
            );
            self.insert_static_box(bucket.side_wall, StaticRole::Wall);
            self.insert_static_box(bucket.side_wall_cap, StaticRole::Wall);
        }

        self.board_built = true;
        tracing::info!(
            pins = layout.pins.len(),
            statics = self.statics.len(),
            "board built"
        );
        true
    }

    fn insert_static_box(&mut self, placement: BoxPlacement, role: StaticRole) {
        let desc = BodyDesc::fixed(
            Pose::from_position(placement.center).with_rotation(placement.rotation),
            BodyShape::Cuboid {
                half_extents: placement.half_extents,
            },
        );
        let handle = self.world.insert(&desc);
        self.statics.insert(handle, role);
    }

    /// Spawn a ball at `position`. Refused until the board exists.
    pub fn spawn_ball<S>(&mut self, position: Vec3, scene: &mut S) -> Option<EntityId>
    where
        S: SceneGraph<Handle = V>,
    {
        if !self.board_built {
            tracing::warn!("ball spawn before board is built, ignoring");
            return None;
        }

        let ball = &self.config.ball;
        let pose = Pose::from_position(position);
        let desc = BodyDesc::dynamic(pose, BodyShape::Sphere { radius: ball.radius }, ball.mass)
            .with_restitution(ball.restitution)
            .with_friction(ball.friction)
            .reporting_contacts();
        let kind = VisualKind::Ball {
            radius: ball.radius,
            color: ball.color,
        };

        let physics = self.world.insert(&desc);
        let visual = scene.spawn_visual(kind, pose);
        let id = self.registry.spawn(EntityKind::Ball, visual, physics);
        self.ball_states.insert(id, BallState::Falling);
        tracing::debug!(ball = %id, x = position.x, y = position.y, "ball spawned");
        Some(id)
    }

    /// Spawn a ball at the next random drop position.
    pub fn drop_ball<S>(&mut self, scene: &mut S) -> Option<EntityId>
    where
        S: SceneGraph<Handle = V>,
    {
        if !self.board_built {
            tracing::warn!("ball drop before board is built, ignoring");
            return None;
        }
        let position = self.spawner.next_position();
        self.spawn_ball(position, scene)
    }

    /// Remove both halves of an entity. Unknown ids are a no-op returning `false`.
    pub fn despawn<S>(&mut self, id: EntityId, scene: &mut S) -> bool
    where
        S: SceneGraph<Handle = V>,
    {
        let Some(pair) = self.registry.despawn(id) else {
            return false;
        };
        self.world.remove(pair.physics);
        scene.despawn_visual(pair.visual);
        self.ball_states.remove(&id);
        true
    }

    /// Advance one frame: step, dispatch contacts, sync poses.
    pub fn frame<S>(&mut self, scene: &mut S) -> FrameReport
    where
        S: SceneGraph<Handle = V>,
    {
        self.world.step(self.clock.dt());
        let step = self.clock.advance();

        self.world.drain_contacts(&mut self.contacts);
        let mut events = Vec::new();
        let contacts = std::mem::take(&mut self.contacts);
        for contact in &contacts {
            self.dispatch(*contact, scene, &mut events);
        }
        // Keep the allocation for the next frame.
        self.contacts = contacts;
        self.contacts.clear();

        self.expire_coins(scene, &mut events);
        self.sync_poses(scene);

        FrameReport {
            step,
            sim_time: self.clock.elapsed(),
            events,
        }
    }

    /// Split a contact into (ball id, ball pair, other body), if one side is a live ball.
    fn ball_side(&self, contact: Contact<W::Handle>) -> Option<BallContact<V, W::Handle>> {
        let is_ball = |h: W::Handle| {
            self.registry
                .find_by_physics(h)
                .filter(|(_, pair)| pair.kind == EntityKind::Ball)
                .map(|(id, pair)| (id, *pair))
        };
        if let Some((id, pair)) = is_ball(contact.a) {
            return Some((id, pair, contact.b));
        }
        is_ball(contact.b).map(|(id, pair)| (id, pair, contact.a))
    }

    fn dispatch<S>(&mut self, contact: Contact<W::Handle>, scene: &mut S, events: &mut Vec<GameEvent>)
    where
        S: SceneGraph<Handle = V>,
    {
        // Stale contacts (ball already removed) and coin contacts fall out here.
        let Some((ball, pair, other)) = self.ball_side(contact) else {
            return;
        };
        let Some(role) = self.statics.get(&other).copied() else {
            return;
        };
        let Some(state) = self.ball_states.get(&ball).copied() else {
            return;
        };

        let (next, outcome) = scoring::on_contact(state, &role);
        self.ball_states.insert(ball, next);

        match outcome {
            Outcome::Ignored => {}
            Outcome::PinHit { cue, position } => {
                let wallet = self.wallet.credit(self.config.pins.score);
                events.push(GameEvent::PinStruck {
                    ball,
                    cue,
                    position,
                    wallet,
                });
            }
            Outcome::Landed { bucket } => {
                let landing = self
                    .world
                    .pose(pair.physics)
                    .map_or(Vec3::ZERO, |p| p.position);
                let zone = self.zones.classify(landing.x);
                let multiplier = zone.map_or(0, |(_, m)| m);
                let wallet = self.wallet.credit(multiplier);
                tracing::debug!(ball = %ball, bucket, multiplier, wallet, "ball scored");
                events.push(GameEvent::BallScored {
                    ball,
                    bucket,
                    zone: zone.map(|(i, _)| i),
                    multiplier,
                    landing,
                    wallet,
                });

                if let Some(coin) = self.spawn_coin(landing, scene) {
                    events.push(GameEvent::CoinSpawned {
                        coin,
                        position: landing,
                    });
                }

                debug_assert_eq!(scoring::finish(next), BallState::Removed);
                self.despawn(ball, scene);
                events.push(GameEvent::BallRemoved { ball });
            }
        }
    }

    fn spawn_coin<S>(&mut self, position: Vec3, scene: &mut S) -> Option<EntityId>
    where
        S: SceneGraph<Handle = V>,
    {
        if self.config.coin.max_live == 0 {
            return None;
        }
        let coin = &self.config.coin;
        let pose = Pose::from_position(position);
        let desc = BodyDesc::dynamic(pose, BodyShape::Sphere { radius: coin.radius }, coin.mass);
        let physics = self.world.insert(&desc);
        let visual = scene.spawn_visual(VisualKind::Coin, pose);
        Some(self.registry.spawn(EntityKind::Coin, visual, physics))
    }

    fn expire_coins<S>(&mut self, scene: &mut S, events: &mut Vec<GameEvent>)
    where
        S: SceneGraph<Handle = V>,
    {
        while self.coin_count() > self.config.coin.max_live {
            let Some(coin) = self.registry.oldest(EntityKind::Coin) else {
                break;
            };
            self.despawn(coin, scene);
            events.push(GameEvent::CoinExpired { coin });
        }
    }

    fn sync_poses<S>(&mut self, scene: &mut S)
    where
        S: SceneGraph<Handle = V>,
    {
        for (_, pair) in self.registry.iter() {
            // A pair whose body is gone is skipped rather than fatal.
            if let Some(pose) = self.world.pose(pair.physics) {
                scene.set_pose(pair.visual, pose);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Aabb, PinPlacement};
    use crate::math::{sub, vec3};

    /// Physics double: dynamic bodies drop 0.1 per step, contacts are scripted.
    #[derive(Default)]
    struct ScriptedWorld {
        next: u32,
        bodies: HashMap<u32, (BodyDesc, Pose)>,
        pending: Vec<Contact<u32>>,
        scripted: Vec<Contact<u32>>,
        steps: u32,
    }

    impl ScriptedWorld {
        fn queue(&mut self, a: u32, b: u32) {
            self.scripted.push(Contact { a, b });
        }

        fn place(&mut self, handle: u32, position: Vec3) {
            if let Some((_, pose)) = self.bodies.get_mut(&handle) {
                pose.position = position;
            }
        }
    }

    impl PhysicsWorld for ScriptedWorld {
        type Handle = u32;

        fn insert(&mut self, desc: &BodyDesc) -> u32 {
            self.next += 1;
            self.bodies.insert(self.next, (*desc, desc.pose));
            self.next
        }

        fn remove(&mut self, handle: u32) -> bool {
            self.bodies.remove(&handle).is_some()
        }

        fn step(&mut self, _dt: f32) {
            self.steps += 1;
            for (desc, pose) in self.bodies.values_mut() {
                if desc.is_dynamic() {
                    pose.position = sub(pose.position, vec3(0.0, 0.1, 0.0));
                }
            }
            self.pending.append(&mut self.scripted);
        }

        fn pose(&self, handle: u32) -> Option<Pose> {
            self.bodies.get(&handle).map(|(_, pose)| *pose)
        }

        fn drain_contacts(&mut self, out: &mut Vec<Contact<u32>>) {
            out.append(&mut self.pending);
        }

        fn body_count(&self) -> usize {
            self.bodies.len()
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum SceneOp {
        Spawn(u32, VisualKind),
        Despawn(u32),
        SetPose(u32, Pose),
    }

    #[derive(Default)]
    struct RecordingScene {
        next: u32,
        ops: Vec<SceneOp>,
    }

    impl SceneGraph for RecordingScene {
        type Handle = u32;

        fn spawn_visual(&mut self, kind: VisualKind, _pose: Pose) -> u32 {
            self.next += 1;
            self.ops.push(SceneOp::Spawn(self.next, kind));
            self.next
        }

        fn despawn_visual(&mut self, handle: u32) {
            self.ops.push(SceneOp::Despawn(handle));
        }

        fn set_pose(&mut self, handle: u32, pose: Pose) {
            self.ops.push(SceneOp::SetPose(handle, pose));
        }
    }

    fn layout() -> BoardLayout {
        BoardLayout {
            pins: vec![PinPlacement {
                position: vec3(0.0, 8.0, 0.0),
                radius: 0.1,
                cue: PinCue::Low,
            }],
            bounds: Aabb::new(vec3(-7.0, 0.0, -0.5), vec3(7.0, 13.0, 0.5)),
            origin_y: 0.0,
        }
    }

    fn session() -> (GameSession<ScriptedWorld, u32>, RecordingScene) {
        let mut config = GameConfig::default();
        config.rng_seed = Some(3);
        let mut session = GameSession::new(config, ScriptedWorld::default()).unwrap();
        let mut scene = RecordingScene::default();
        assert!(session.build_board(&layout(), &mut scene));
        (session, scene)
    }

    fn role_handle(session: &GameSession<ScriptedWorld, u32>, wanted: impl Fn(&StaticRole) -> bool) -> u32 {
        *session
            .statics
            .iter()
            .find(|(_, role)| wanted(*role))
            .map(|(h, _)| h)
            .unwrap()
    }

    fn pin_handle(session: &GameSession<ScriptedWorld, u32>) -> u32 {
        role_handle(session, |r| matches!(r, StaticRole::Pin { .. }))
    }

    fn floor_handle(session: &GameSession<ScriptedWorld, u32>, bucket: usize) -> u32 {
        role_handle(session, |r| *r == StaticRole::BucketFloor { bucket })
    }

    fn physics_of(session: &GameSession<ScriptedWorld, u32>, id: EntityId) -> u32 {
        session.registry().get(id).unwrap().physics
    }

    #[test]
    fn build_board_creates_pins_walls_and_buckets() {
        let (session, scene) = session();
        // 1 pin + 5 walls + 5 floors + 5 bucket side walls + 5 caps
        assert_eq!(session.world().body_count(), 21);
        let buckets = scene
            .ops
            .iter()
            .filter(|op| matches!(op, SceneOp::Spawn(_, VisualKind::Bucket { .. })))
            .count();
        assert_eq!(buckets, 5);
    }

    #[test]
    fn board_builds_once() {
        let (mut session, mut scene) = session();
        assert!(!session.build_board(&layout(), &mut scene));
        assert_eq!(session.world().body_count(), 21);
    }

    #[test]
    fn ball_spawn_refused_before_board() {
        let mut session: GameSession<ScriptedWorld, u32> =
            GameSession::new(GameConfig::default(), ScriptedWorld::default()).unwrap();
        let mut scene = RecordingScene::default();
        assert!(session.spawn_ball(vec3(0.0, 14.0, 0.0), &mut scene).is_none());
        assert!(session.drop_ball(&mut scene).is_none());
        assert!(scene.ops.is_empty());
    }

    #[test]
    fn pin_hit_credits_one_and_keeps_falling() {
        let (mut session, mut scene) = session();
        let ball = session.spawn_ball(vec3(0.0, 14.0, 0.0), &mut scene).unwrap();
        let pin = pin_handle(&session);
        let body = physics_of(&session, ball);
        session.world.queue(body, pin);

        let report = session.frame(&mut scene);
        assert_eq!(session.wallet(), 1);
        assert_eq!(session.ball_state(ball), Some(BallState::Falling));
        assert!(matches!(
            report.events[..],
            [GameEvent::PinStruck { cue: PinCue::Low, wallet: 1, .. }]
        ));
    }

    #[test]
    fn contact_order_within_pair_does_not_matter() {
        let (mut session, mut scene) = session();
        let ball = session.spawn_ball(vec3(0.0, 14.0, 0.0), &mut scene).unwrap();
        let pin = pin_handle(&session);
        let body = physics_of(&session, ball);
        session.world.queue(pin, body);
        session.frame(&mut scene);
        assert_eq!(session.wallet(), 1);
    }

    #[test]
    fn bucket_landing_scores_spawns_coin_and_removes_ball() {
        let (mut session, mut scene) = session();
        let ball = session.spawn_ball(vec3(0.0, 14.0, 0.0), &mut scene).unwrap();
        let body = physics_of(&session, ball);
        // Step moves the ball down by 0.1 before dispatch.
        session.world.place(body, vec3(-0.5, 1.6, 0.0));
        session.world.queue(body, floor_handle(&session, 2));

        let report = session.frame(&mut scene);
        assert_eq!(session.wallet(), 3);
        assert_eq!(session.ball_count(), 0);
        assert_eq!(session.coin_count(), 1);
        assert!(session.registry().get(ball).is_none());
        assert!(session.world().pose(body).is_none());
        assert!(matches!(
            report.events[0],
            GameEvent::BallScored { bucket: 2, zone: Some(2), multiplier: 3, wallet: 3, .. }
        ));
        assert!(matches!(report.events[1], GameEvent::CoinSpawned { .. }));
        assert_eq!(report.events[2], GameEvent::BallRemoved { ball });
    }

    #[test]
    fn landing_outside_zones_spawns_coin_without_credit() {
        let (mut session, mut scene) = session();
        let ball = session.spawn_ball(vec3(0.0, 14.0, 0.0), &mut scene).unwrap();
        let body = physics_of(&session, ball);
        session.world.place(body, vec3(7.0, 1.6, 0.0));
        session.world.queue(body, floor_handle(&session, 4));

        let report = session.frame(&mut scene);
        assert_eq!(session.wallet(), 0);
        assert_eq!(session.coin_count(), 1);
        assert!(matches!(
            report.events[0],
            GameEvent::BallScored { zone: None, multiplier: 0, .. }
        ));
    }

    #[test]
    fn multiplier_follows_landing_x_not_floor() {
        let (mut session, mut scene) = session();
        let ball = session.spawn_ball(vec3(0.0, 14.0, 0.0), &mut scene).unwrap();
        let body = physics_of(&session, ball);
        session.world.place(body, vec3(-5.5, 1.6, 0.0));
        // Floors overlap; the far-left landing pays x1 whichever floor reports.
        session.world.queue(body, floor_handle(&session, 1));
        session.frame(&mut scene);
        assert_eq!(session.wallet(), 1);
    }

    #[test]
    fn first_bucket_contact_wins() {
        let (mut session, mut scene) = session();
        let ball = session.spawn_ball(vec3(0.0, 14.0, 0.0), &mut scene).unwrap();
        let body = physics_of(&session, ball);
        session.world.place(body, vec3(3.0, 1.6, 0.0));
        session.world.queue(body, floor_handle(&session, 3));
        session.world.queue(body, floor_handle(&session, 4));
        session.world.queue(body, pin_handle(&session));

        let report = session.frame(&mut scene);
        assert_eq!(session.wallet(), 4);
        assert_eq!(session.coin_count(), 1);
        let scored = report
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::BallScored { .. }))
            .count();
        assert_eq!(scored, 1);
        assert!(!report.events.iter().any(|e| matches!(e, GameEvent::PinStruck { .. })));
    }

    #[test]
    fn contacts_for_removed_ball_in_later_frames_are_ignored() {
        let (mut session, mut scene) = session();
        let ball = session.spawn_ball(vec3(0.0, 14.0, 0.0), &mut scene).unwrap();
        let body = physics_of(&session, ball);
        session.world.queue(body, floor_handle(&session, 2));
        session.frame(&mut scene);
        let wallet = session.wallet();

        session.world.queue(body, pin_handle(&session));
        let report = session.frame(&mut scene);
        assert!(report.events.is_empty());
        assert_eq!(session.wallet(), wallet);
    }

    #[test]
    fn removed_ball_visual_never_gets_a_pose_again() {
        let (mut session, mut scene) = session();
        let ball = session.spawn_ball(vec3(0.0, 14.0, 0.0), &mut scene).unwrap();
        let visual = session.registry().get(ball).unwrap().visual;
        let body = physics_of(&session, ball);
        session.world.queue(body, floor_handle(&session, 2));
        session.frame(&mut scene);

        let despawn_at = scene
            .ops
            .iter()
            .position(|op| *op == SceneOp::Despawn(visual))
            .unwrap();
        for _ in 0..5 {
            session.frame(&mut scene);
        }
        assert!(!scene.ops[despawn_at..]
            .iter()
            .any(|op| matches!(op, SceneOp::SetPose(h, _) if *h == visual)));
    }

    #[test]
    fn poses_are_copied_after_the_step() {
        let (mut session, mut scene) = session();
        let ball = session.spawn_ball(vec3(1.0, 14.0, 0.0), &mut scene).unwrap();
        let visual = session.registry().get(ball).unwrap().visual;

        for frame in 1..=3 {
            session.frame(&mut scene);
            let last = scene
                .ops
                .iter()
                .rev()
                .find_map(|op| match op {
                    SceneOp::SetPose(h, pose) if *h == visual => Some(*pose),
                    _ => None,
                })
                .unwrap();
            let expected = 14.0 - 0.1 * frame as f32;
            assert!((last.position.y - expected).abs() < 1e-4);
        }
        assert_eq!(session.world().steps, 3);
    }

    #[test]
    fn one_step_per_frame() {
        let (mut session, mut scene) = session();
        for n in 1..=10u64 {
            let report = session.frame(&mut scene);
            assert_eq!(report.step, n);
        }
        assert_eq!(session.world().steps, 10);
        assert_eq!(session.clock().steps(), 10);
    }

    #[test]
    fn coin_and_wall_contacts_do_nothing() {
        let (mut session, mut scene) = session();
        let ball = session.spawn_ball(vec3(0.0, 14.0, 0.0), &mut scene).unwrap();
        let body = physics_of(&session, ball);
        let wall = role_handle(&session, |r| *r == StaticRole::Wall);
        session.world.queue(body, wall);
        session.world.queue(body, 9999);
        let report = session.frame(&mut scene);
        assert!(report.events.is_empty());
        assert_eq!(session.ball_state(ball), Some(BallState::Falling));
    }

    #[test]
    fn oldest_coins_expire_past_the_limit() {
        let mut config = GameConfig::default();
        config.coin.max_live = 2;
        let mut session = GameSession::new(config, ScriptedWorld::default()).unwrap();
        let mut scene = RecordingScene::default();
        session.build_board(&layout(), &mut scene);

        let mut coins = Vec::new();
        for _ in 0..3 {
            let ball = session.spawn_ball(vec3(0.0, 14.0, 0.0), &mut scene).unwrap();
            let body = physics_of(&session, ball);
            session.world.queue(body, floor_handle(&session, 2));
            let report = session.frame(&mut scene);
            for event in report.events {
                if let GameEvent::CoinSpawned { coin, .. } = event {
                    coins.push(coin);
                }
                if let GameEvent::CoinExpired { coin } = event {
                    assert_eq!(coin, coins[0]);
                }
            }
        }
        assert_eq!(session.coin_count(), 2);
        assert!(session.registry().get(coins[0]).is_none());
        assert!(session.registry().get(coins[2]).is_some());
    }

    #[test]
    fn despawn_unknown_id_is_noop() {
        let (mut session, mut scene) = session();
        let ball = session.spawn_ball(vec3(0.0, 14.0, 0.0), &mut scene).unwrap();
        assert!(session.despawn(ball, &mut scene));
        assert!(!session.despawn(ball, &mut scene));
    }
}

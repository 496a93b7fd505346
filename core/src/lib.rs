//! Game core for a 3D Plinko board: entity bookkeeping, the fixed-step frame
//! loop and collision-driven scoring. Rendering and physics sit behind the
//! [`scene::SceneGraph`] and [`physics::PhysicsWorld`] traits.

pub mod board;
pub mod buckets;
pub mod clock;
pub mod config;
pub mod math;
pub mod physics;
pub mod picking;
pub mod registry;
pub mod scene;
pub mod scoring;
pub mod session;
pub mod spawner;
pub mod wallet;

pub use config::GameConfig;
pub use session::{FrameReport, GameEvent, GameSession};

//! Headless Plinko run on the real physics engine, no rendering.
//!
//! Drops one ball every 20 frames until `--balls` have been dropped, then keeps
//! stepping until `--frames` have run.
//!
//! Usage: cargo run --bin plinko-sim -- [OPTIONS]
//!
//! Options:
//!   --balls N        Balls to drop (default: 10)
//!   --frames F       Frames to simulate (default: 1800)
//!   --seed S         Drop position seed (default: config value, else entropy)
//!   --config PATH    JSON config file (default: built-in defaults)

use plinko_core::board::synthetic_layout;
use plinko_core::math::Pose;
use plinko_core::physics::RapierWorld;
use plinko_core::scene::{SceneGraph, VisualKind};
use plinko_core::{GameConfig, GameEvent, GameSession};

const DROP_INTERVAL: u64 = 20;

/// Scene that renders nothing.
struct NullScene;

impl SceneGraph for NullScene {
    type Handle = ();

    fn spawn_visual(&mut self, _kind: VisualKind, _pose: Pose) {}

    fn despawn_visual(&mut self, _handle: ()) {}

    fn set_pose(&mut self, _handle: (), _pose: Pose) {}
}

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();

    let mut balls: u64 = 10;
    let mut frames: u64 = 1800;
    let mut seed: Option<u64> = None;
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--balls" => {
                i += 1;
                balls = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(10);
            }
            "--frames" => {
                i += 1;
                frames = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(1800);
            }
            "--seed" => {
                i += 1;
                seed = args.get(i).and_then(|s| s.parse().ok());
            }
            "--config" => {
                i += 1;
                config_path = args.get(i).cloned();
            }
            _ => {}
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => GameConfig::load(&path),
        None => Ok(GameConfig::default()),
    };
    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid game configuration: {}", e);
            std::process::exit(1);
        }
    };
    if seed.is_some() {
        config.rng_seed = seed;
    }

    let world = RapierWorld::new(config.physics.gravity_y);
    let layout = synthetic_layout(&config);
    let mut session = match GameSession::new(config, world) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Invalid game configuration: {}", e);
            std::process::exit(1);
        }
    };
    let mut scene = NullScene;
    session.build_board(&layout, &mut scene);

    println!("=== Plinko Simulation ===");
    println!("Balls: {}", balls);
    println!("Frames: {}", frames);
    println!();

    let mut dropped = 0u64;
    let mut pin_hits = 0u64;
    let mut scored = 0u64;

    for frame in 0..frames {
        if dropped < balls && frame % DROP_INTERVAL == 0 && session.drop_ball(&mut scene).is_some() {
            dropped += 1;
        }

        let report = session.frame(&mut scene);
        for event in &report.events {
            match event {
                GameEvent::PinStruck { .. } => pin_hits += 1,
                GameEvent::BallScored {
                    ball,
                    multiplier,
                    landing,
                    wallet,
                    ..
                } => {
                    scored += 1;
                    tracing::info!(
                        ball = %ball,
                        x = landing.x,
                        multiplier,
                        wallet,
                        "ball landed"
                    );
                }
                _ => {}
            }
        }
    }

    let clock = session.clock();
    println!("=== Results ===");
    println!("Simulated time: {:.3}s ({} steps)", clock.elapsed(), clock.steps());
    println!("Dropped: {}", dropped);
    println!("Scored: {}", scored);
    println!("Still falling: {}", session.ball_count());
    println!("Coins: {}", session.coin_count());
    println!("Pin hits: {}", pin_hits);
    println!("Wallet: {}", session.wallet());
}

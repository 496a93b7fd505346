//! The per-frame game loop: drop requested balls, then run exactly one
//! session frame (step, dispatch, sync) per rendered frame.

use bevy::prelude::*;
use plinko_core::GameEvent;

use super::scene::BevyScene;
use super::{AppState, DropBallMessage, FrameEvent, Game, UpdateSet};

pub struct PlayPlugin;

impl Plugin for PlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (drop_requested_balls, run_frame)
                .chain()
                .in_set(UpdateSet::Simulate)
                .run_if(in_state(AppState::Playing)),
        );
    }
}

fn drop_requested_balls(
    mut drops: MessageReader<DropBallMessage>,
    mut game: ResMut<Game>,
    mut scene: BevyScene,
) {
    for _ in drops.read() {
        if let Some(ball) = game.drop_ball(&mut scene) {
            debug!("Dropped ball {}", ball);
        }
    }
}

fn run_frame(mut game: ResMut<Game>, mut scene: BevyScene, mut events: MessageWriter<FrameEvent>) {
    let report = game.frame(&mut scene);
    for event in report.events {
        if let GameEvent::BallScored {
            ball,
            multiplier,
            wallet,
            ..
        } = event
        {
            info!("Ball {} landed: x{} (wallet {})", ball, multiplier, wallet);
        }
        events.write(FrameEvent(event));
    }
}

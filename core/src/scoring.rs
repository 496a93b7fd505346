//! Per-ball scoring state machine.
//!
//! `Falling` balls stay `Falling` on pin hits and become `Scored` on a bucket
//! floor. `Scored` balls are removed in the same dispatch. Anything touching a
//! ball that is no longer `Falling` is ignored.

use crate::board::PinCue;
use crate::math::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallState {
    Falling,
    Scored,
    Removed,
}

/// Game meaning of a static body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StaticRole {
    Pin { cue: PinCue, position: Vec3 },
    BucketFloor { bucket: usize },
    Wall,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Ignored,
    PinHit { cue: PinCue, position: Vec3 },
    Landed { bucket: usize },
}

/// Apply one contact between a ball in `state` and a static body.
pub fn on_contact(state: BallState, role: &StaticRole) -> (BallState, Outcome) {
    match (state, *role) {
        (BallState::Falling, StaticRole::Pin { cue, position }) => {
            (BallState::Falling, Outcome::PinHit { cue, position })
        }
        (BallState::Falling, StaticRole::BucketFloor { bucket }) => {
            (BallState::Scored, Outcome::Landed { bucket })
        }
        (state, _) => (state, Outcome::Ignored),
    }
}

/// `Scored` moves on to `Removed`; other states are unchanged.
pub fn finish(state: BallState) -> BallState {
    match state {
        BallState::Scored => BallState::Removed,
        other => other,
    }
}

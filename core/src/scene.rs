//! Scene seam. The game tells the renderer what to show and where; it never
//! reads rendering state back.

use crate::board::PinCue;
use crate::math::{Pose, Vec3};

/// What a visual represents. The scene picks meshes and materials from this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualKind {
    Ball { radius: f32, color: u32 },
    Coin,
    Pin { radius: f32, cue: PinCue },
    Bucket { index: usize, scale: Vec3 },
}

pub trait SceneGraph {
    type Handle: Copy;

    fn spawn_visual(&mut self, kind: VisualKind, pose: Pose) -> Self::Handle;

    /// Destroy a visual. Already-gone handles are ignored.
    fn despawn_visual(&mut self, handle: Self::Handle);

    fn set_pose(&mut self, handle: Self::Handle, pose: Pose);
}

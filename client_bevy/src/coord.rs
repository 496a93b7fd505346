//! Conversions between core math types and Bevy's. Both are right-handed Y-up
//! in the same units, so these are plain field copies.

use bevy::prelude::{Quat, Transform, Vec3};
use plinko_core::math::{self, Pose};

pub fn to_bevy_vec3(v: math::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn from_bevy_vec3(v: Vec3) -> math::Vec3 {
    math::Vec3::new(v.x, v.y, v.z)
}

pub fn to_bevy_quat(q: math::Quat) -> Quat {
    Quat::from_xyzw(q.x, q.y, q.z, q.w)
}

/// Write a pose into a transform, leaving its scale alone.
pub fn apply_pose(transform: &mut Transform, pose: Pose) {
    transform.translation = to_bevy_vec3(pose.position);
    transform.rotation = to_bevy_quat(pose.rotation);
}

pub fn pose_to_transform(pose: Pose) -> Transform {
    let mut transform = Transform::IDENTITY;
    apply_pose(&mut transform, pose);
    transform
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec3_roundtrip() {
        for (x, y, z) in [(0.0, 0.0, 0.0), (1.5, -2.0, 17.0), (-6.0, 14.0, -0.5)] {
            let v = math::Vec3::new(x, y, z);
            assert_eq!(from_bevy_vec3(to_bevy_vec3(v)), v);
        }
    }

    #[test]
    fn yaw_matches_bevy_rotation() {
        let angle = 0.9_f32;
        let ours = to_bevy_quat(math::Quat::from_rotation_y(angle));
        let theirs = Quat::from_rotation_y(angle);
        assert!(ours.abs_diff_eq(theirs, 1e-6));

        let v = math::Vec3::new(1.0, 2.0, 3.0);
        let rotated = math::Quat::from_rotation_y(angle).rotate(v);
        let expected = theirs * to_bevy_vec3(v);
        assert!(to_bevy_vec3(rotated).abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn apply_pose_keeps_scale() {
        let mut transform = Transform::from_scale(Vec3::splat(0.4));
        let pose = Pose::from_position(math::Vec3::new(1.0, 2.0, 3.0));
        apply_pose(&mut transform, pose);
        assert_eq!(transform.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.scale, Vec3::splat(0.4));
        assert_eq!(pose_to_transform(pose).scale, Vec3::ONE);
    }
}

//! Conversions between the core's nalgebra types and Bevy's glam types.

use bevy::prelude::*;
use nalgebra as na;
use shared::camera::CameraPose;
use shared::movement::BodyPose;

#[inline]
pub fn vec3(v: &na::Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn point3(p: &na::Point3<f32>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

#[inline]
pub fn quat(q: &na::UnitQuaternion<f32>) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

#[inline]
pub fn to_point3(v: Vec3) -> na::Point3<f32> {
    na::Point3::new(v.x, v.y, v.z)
}

/// Centre and full size of a box.
#[inline]
pub fn aabb_center_size(aabb: &shared::collision::Aabb) -> (Vec3, Vec3) {
    (point3(&aabb.center()), vec3(&aabb.extents()))
}

/// Camera pose as a Bevy transform (local -Z toward the look-at target).
pub fn camera_transform(pose: &CameraPose) -> Transform {
    Transform::from_translation(point3(&pose.position)).with_rotation(quat(&pose.rotation))
}

/// Body pose as a Bevy transform, keeping the model's own scale.
pub fn body_transform(pose: &BodyPose, scale: Vec3) -> Transform {
    Transform {
        translation: vec3(&pose.translation),
        rotation: quat(&pose.rotation),
        scale,
    }
}

/*!
Core collision types and math aliases shared by the collision submodules.

This module intentionally contains no algorithms. It defines the data types
exchanged between:
- broad (the world spatial index and its candidate queries)
- narrow_phase (parry3d contact queries against single triangles)
- resolver (single-contact depenetration)
- the integrator and camera rig built on top
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Point3 = na::Point3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// A swept sphere around the segment `start..end`.
///
/// `end` is the upper end-point for an upright body. Only translation mutates a capsule;
/// the radius is fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Capsule {
    pub start: Point3,
    pub end: Point3,
    pub radius: f32,
}

impl Capsule {
    #[inline]
    pub fn new(start: Point3, end: Point3, radius: f32) -> Self {
        Self { start, end, radius }
    }

    /// Move both end-points by `delta`.
    #[inline]
    pub fn translate(&mut self, delta: &Vec3) {
        self.start += delta;
        self.end += delta;
    }

    /// World-space bounds of the capsule inflated by `margin`.
    pub fn bounds(&self, margin: f32) -> (Point3, Point3) {
        let r = Vec3::repeat(self.radius + margin.max(0.0));
        (self.start.inf(&self.end) - r, self.start.sup(&self.end) + r)
    }
}

/// A sphere in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Point3,
    pub radius: f32,
}

impl Sphere {
    #[inline]
    pub fn new(center: Point3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// World-space bounds of the sphere inflated by `margin`.
    pub fn bounds(&self, margin: f32) -> (Point3, Point3) {
        let r = Vec3::repeat(self.radius + margin.max(0.0));
        (self.center - r, self.center + r)
    }
}

/// The single representative contact reported by a world query.
///
/// Translating the queried shape by `normal * depth` pushes it out of the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// Unit normal pointing away from the world surface, toward the queried shape.
    pub normal: Vec3,
    /// Penetration depth along `normal` (0 when merely touching).
    pub depth: f32,
}

impl Contact {
    /// Floor contacts are any contact whose normal has an upward component.
    #[inline]
    pub fn is_floor(&self) -> bool {
        self.normal.y > 0.0
    }
}

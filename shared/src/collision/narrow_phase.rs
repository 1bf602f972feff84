use nalgebra as na;
use rapier3d::parry::{
    query,
    shape::{self as pshape, Shape},
};

use super::{
    settings::CONTACT_PREDICTION,
    types::{Capsule, Contact, Iso, Point3, Sphere, Vec3},
};

/// Contact between a shape placed at `shape_iso` and a single world-space triangle.
///
/// Returns the push-out normal (on the triangle, pointing toward the shape) and the
/// penetration depth. Shapes closer than [`CONTACT_PREDICTION`] are reported as touching
/// with depth 0.
fn contact_with_triangle(
    shape_iso: &Iso,
    shape: &dyn Shape,
    triangle: &pshape::Triangle,
) -> Option<Contact> {
    let hit = query::contact(
        shape_iso,
        shape,
        &Iso::identity(),
        triangle as &dyn Shape,
        CONTACT_PREDICTION,
    )
    .ok()
    .flatten()?;

    // normal2 lives on the triangle (identity pose, so already world space) and points
    // out of it, toward the queried shape.
    let normal = hit.normal2.into_inner();
    if !(normal.x.is_finite() && normal.y.is_finite() && normal.z.is_finite()) {
        return None;
    }

    Some(Contact {
        normal,
        depth: (-hit.dist).max(0.0),
    })
}

/// Contact of a capsule against one world-space triangle.
pub fn capsule_triangle_contact(capsule: &Capsule, triangle: &[Point3; 3]) -> Option<Contact> {
    // The capsule is built directly from its world-space segment, so it sits at the identity.
    let shape = pshape::Capsule::new(capsule.start, capsule.end, capsule.radius);
    let tri = pshape::Triangle::new(triangle[0], triangle[1], triangle[2]);
    contact_with_triangle(&Iso::identity(), &shape, &tri)
}

/// Contact of a sphere against one world-space triangle.
pub fn sphere_triangle_contact(sphere: &Sphere, triangle: &[Point3; 3]) -> Option<Contact> {
    let ball = pshape::Ball::new(sphere.radius);
    let iso = Iso::from_parts(
        na::Translation3::new(sphere.center.x, sphere.center.y, sphere.center.z),
        na::UnitQuaternion::identity(),
    );
    let tri = pshape::Triangle::new(triangle[0], triangle[1], triangle[2]);
    contact_with_triangle(&iso, &ball, &tri)
}

/// Doubled area of a triangle; used to drop degenerate triangles at build time.
#[inline]
pub fn triangle_area2(triangle: &[Point3; 3]) -> f32 {
    let ab: Vec3 = triangle[1] - triangle[0];
    let ac: Vec3 = triangle[2] - triangle[0];
    ab.cross(&ac).norm()
}

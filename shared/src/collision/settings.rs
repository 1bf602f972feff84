/*!
Collision tolerances shared by the spatial index, the resolver and the camera rig.

Notes
- Distances are in world units, time in seconds.
- Favor practical world-space tolerances over machine epsilon for robust behavior.
*/

/// Shapes separated from a triangle by at most this distance are reported as touching
/// (depth 0). Keeps a body resting exactly on the floor classified as grounded.
pub const CONTACT_PREDICTION: f32 = 1.0e-4;

/// Practical small distance for comparisons.
/// Use for dot-product guards, normalization guards, equality checks in world space, etc.
pub const DIST_EPS: f32 = 1.0e-6;

/// Triangles with a doubled area below this are dropped while building the index.
pub const MIN_TRIANGLE_AREA2: f32 = 1.0e-12;

/// Default subdivision depth for the octree cells drawn by the debug overlay.
pub const DEBUG_CELL_DEPTH: u32 = 4;

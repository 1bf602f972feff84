/*!
Collision root module.

This module re-exports submodules that implement the static-world collision used by the
player capsule and the camera's clearance sphere, with parry3d (via rapier3d) for narrow-phase
queries and a BVH broad phase over the world's triangles. The code is split for clarity:

- types:        shared data types (Capsule, Sphere, Contact, math aliases)
- settings:     contact tolerances
- geometry:     the static triangle soup ingested from the scene loader
- broad:        the spatial index (BVH over triangles) and the `CollisionWorld` queries
- narrow_phase: thin wrappers over parry3d contact queries against one triangle
- resolver:     single-contact depenetration of the player capsule
*/

pub mod broad;
pub mod geometry;
pub mod narrow_phase;
pub mod resolver;
pub mod settings;
pub mod types;

// Re-export commonly used types and functions.
pub use rapier3d::parry::bounding_volume::Aabb;
pub use broad::{CollisionWorld, SpatialIndex};
pub use geometry::{GeometryError, StaticWorldGeometry};
pub use resolver::{CollisionResolver, SingleContactResolver};
pub use types::{Capsule, Contact, Point3, Quat, Sphere, Vec3};

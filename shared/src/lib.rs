pub mod animation;
pub mod camera;
pub mod collision;
pub mod constants;
pub mod movement;
pub mod viewer;

pub use animation::{Animator, ClipAction, ClipInfo, LoopMode, PlayOutcome};
pub use camera::{CameraOutput, CameraPose, CameraRig, CameraRigConfig, StereoCameraPair};
pub use collision::{
    Capsule, CollisionResolver, CollisionWorld, Contact, GeometryError, Point3, Quat,
    SingleContactResolver, SpatialIndex, Sphere, StaticWorldGeometry, Vec3,
};
pub use movement::{BodyPose, PhysicsConfig, Simulation, StepReport, damping_factor};
pub use viewer::{FrameSnapshot, ViewerConfig, ViewerCore};

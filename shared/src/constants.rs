use std::f32::consts::PI;

/// Gravity magnitude in units per second squared (positive value).
/// Integrated as a downward acceleration while the body is airborne.
pub const GRAVITY: f32 = 30.0;

/// Number of fixed physics sub-steps per rendered frame.
pub const STEPS_PER_FRAME: u32 = 5;

/// Upper bound on a single frame's delta time (seconds).
///
/// Protects the integrator from huge gaps after a suspended tab or a slow frame.
pub const MAX_FRAME_DELTA: f32 = 0.05;

/// Exponential velocity damping rate (per second) used while grounded.
pub const GROUND_DAMPING_RATE: f32 = 4.0;

/// Damping multiplier applied while airborne (airborne drag is weaker).
pub const AIR_DAMPING_SCALE: f32 = 0.1;

/// Reference height at or below which the body is teleported back to its default pose.
pub const OUT_OF_BOUNDS_HEIGHT: f32 = -25.0;

/// Default capsule bottom end-point, at the level of the street surface.
pub const DEFAULT_CAPSULE_START: [f32; 3] = [0.0, 0.0, 0.0];

/// Default capsule top end-point (standing height).
pub const DEFAULT_CAPSULE_END: [f32; 3] = [0.0, 0.3, 0.0];

/// Default capsule radius.
pub const DEFAULT_CAPSULE_RADIUS: f32 = 0.07;

/// Vertical distance from the capsule's top end-point down to the rendered body origin.
/// Half the default capsule segment length, so the model sits at the collider's middle.
pub const BODY_VERTICAL_OFFSET: f32 = 0.15;

/// Fixed vertical tilt of the third-person camera (radians).
pub const CAMERA_ANGLE_X: f32 = 0.2;

/// Fixed horizontal angle of the third-person camera (radians). PI puts it directly behind.
pub const CAMERA_ANGLE_Y: f32 = PI;

/// Distance from the reference point to the camera.
pub const CAMERA_DISTANCE: f32 = 0.4;

/// Extra camera height above the reference point.
pub const CAMERA_HEIGHT: f32 = 0.15;

/// Radius of the sphere used to keep the camera out of world geometry.
pub const CAMERA_SPHERE_RADIUS: f32 = 0.05;

/// Clearance added on top of the camera sphere's penetration depth when pulling the camera in.
pub const CAMERA_CLEARANCE: f32 = 0.05;

/// Vertical offset of the look-at target above the reference point.
pub const CAMERA_LOOK_AT_OFFSET: f32 = 0.05;

/// Per-frame lerp factor of the mono camera toward its target position.
pub const CAMERA_SMOOTHING: f32 = 0.1;

/// Full lateral separation between the two stereo eye cameras.
pub const INTERPUPILLARY_DISTANCE: f32 = 0.1;

/// Amount the collision copy of the city is lowered so it sits at the asphalt level.
pub const WORLD_COLLISION_DROP: f32 = 0.2;

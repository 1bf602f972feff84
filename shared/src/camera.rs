/*!
Third-person camera rig with an optional stereo (side-by-side) output.

The rig orbits the capsule's upper end-point at fixed angles, keeps itself out of the
world with a small collision sphere and always looks slightly above the reference point.

Conventions
- A pose's rotation maps the camera's local -Z onto the viewing direction, +Y up.
- Mono output is smoothed over frames; stereo output is not.
*/

use crate::{
    collision::{Capsule, CollisionWorld, Point3, Quat, Sphere, Vec3, settings::DIST_EPS},
    constants::{
        CAMERA_ANGLE_X, CAMERA_ANGLE_Y, CAMERA_CLEARANCE, CAMERA_DISTANCE, CAMERA_HEIGHT,
        CAMERA_LOOK_AT_OFFSET, CAMERA_SMOOTHING, CAMERA_SPHERE_RADIUS, INTERPUPILLARY_DISTANCE,
    },
};

#[derive(Clone, Copy, Debug)]
pub struct CameraRigConfig {
    /// Vertical orbit angle (radians).
    pub angle_x: f32,
    /// Horizontal orbit angle (radians).
    pub angle_y: f32,
    pub distance: f32,
    pub height: f32,
    pub sphere_radius: f32,
    pub clearance: f32,
    pub look_at_offset: f32,
    /// Per-frame lerp factor of the mono position, in `[0, 1]`.
    pub smoothing: f32,
    /// Full separation of the stereo eyes.
    pub ipd: f32,
}

impl Default for CameraRigConfig {
    fn default() -> Self {
        Self {
            angle_x: CAMERA_ANGLE_X,
            angle_y: CAMERA_ANGLE_Y,
            distance: CAMERA_DISTANCE,
            height: CAMERA_HEIGHT,
            sphere_radius: CAMERA_SPHERE_RADIUS,
            clearance: CAMERA_CLEARANCE,
            look_at_offset: CAMERA_LOOK_AT_OFFSET,
            smoothing: CAMERA_SMOOTHING,
            ipd: INTERPUPILLARY_DISTANCE,
        }
    }
}

/// A single camera placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Point3,
    pub look_at: Point3,
    pub rotation: Quat,
}

/// Two eye cameras straddling the unsmoothed rig position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StereoCameraPair {
    pub left: CameraPose,
    pub right: CameraPose,
    /// Rig position the eyes are offset from.
    pub center: Point3,
    pub look_at: Point3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraOutput {
    Mono(CameraPose),
    Stereo(StereoCameraPair),
}

/// Derives camera poses from the capsule every frame.
///
/// State is limited to smoothing: the live mono position and the last valid basis,
/// reused whenever the viewing direction degenerates.
#[derive(Clone, Debug)]
pub struct CameraRig {
    config: CameraRigConfig,
    live_position: Option<Point3>,
    rotation: Quat,
    right: Vec3,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(CameraRigConfig::default())
    }
}

impl CameraRig {
    pub fn new(config: CameraRigConfig) -> Self {
        Self {
            config,
            live_position: None,
            rotation: Quat::identity(),
            right: Vec3::x(),
        }
    }

    /// Forget the smoothed position; the next mono pose snaps to its target.
    pub fn reset(&mut self) {
        self.live_position = None;
    }

    /// Compute this frame's camera output for `capsule`.
    ///
    /// Steps:
    /// 1) Ideal position from the fixed orbit around `capsule.end`.
    /// 2) Sphere test at the ideal position; on contact, pull toward the reference point by
    ///    `depth + clearance`.
    /// 3) Mono: lerp the live position toward the target. Stereo: offset both eyes sideways.
    pub fn compute_pose(
        &mut self,
        capsule: &Capsule,
        world: &dyn CollisionWorld,
        vr_mode: bool,
    ) -> CameraOutput {
        let cfg = self.config;
        let reference = capsule.end;

        let (sin_x, cos_x) = cfg.angle_x.sin_cos();
        let (sin_y, cos_y) = cfg.angle_y.sin_cos();
        let ideal = reference
            + Vec3::new(
                sin_y * cos_x * cfg.distance,
                cfg.height + sin_x * cfg.distance,
                cos_y * cos_x * cfg.distance,
            );

        let target = self.clear_obstacles(ideal, reference, world);
        let look_at = reference + Vec3::new(0.0, cfg.look_at_offset, 0.0);

        if vr_mode {
            // Keep the mono camera in place so leaving VR does not swing it across the scene.
            self.live_position = Some(target);
            self.update_basis(&(look_at - target));

            let half = self.right * (cfg.ipd * 0.5);
            let eye = |position: Point3| CameraPose {
                position,
                look_at,
                rotation: self.rotation,
            };
            return CameraOutput::Stereo(StereoCameraPair {
                left: eye(target - half),
                right: eye(target + half),
                center: target,
                look_at,
            });
        }

        let position = match self.live_position {
            Some(live) => live + (target - live) * cfg.smoothing.clamp(0.0, 1.0),
            None => target,
        };
        self.live_position = Some(position);
        self.update_basis(&(look_at - position));

        CameraOutput::Mono(CameraPose {
            position,
            look_at,
            rotation: self.rotation,
        })
    }

    /// Keep the camera out of world geometry.
    fn clear_obstacles(&self, ideal: Point3, reference: Point3, world: &dyn CollisionWorld) -> Point3 {
        let sphere = Sphere::new(ideal, self.config.sphere_radius);
        let Some(hit) = world.intersect_sphere(&sphere) else {
            return ideal;
        };

        let toward = reference - ideal;
        let len = toward.norm();
        if !len.is_finite() || len <= DIST_EPS {
            return ideal;
        }
        ideal + toward * ((hit.depth + self.config.clearance) / len)
    }

    /// Refresh the orientation and right vector from a viewing direction.
    /// Degenerate directions keep the previous basis.
    fn update_basis(&mut self, view: &Vec3) {
        let len = view.norm();
        if !len.is_finite() || len <= DIST_EPS {
            return;
        }
        let forward = view / len;
        let right = forward.cross(&Vec3::y());
        let right_len = right.norm();
        if !right_len.is_finite() || right_len <= DIST_EPS {
            return;
        }

        self.right = right / right_len;
        self.rotation = Quat::face_towards(&(-forward), &Vec3::y());
    }
}

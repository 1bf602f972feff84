/*!
Per-frame orchestration of the core: integrate the body, then place the camera.

`ViewerCore` owns every piece of mutable viewer state. The renderer feeds it frame deltas
and asset-ready transitions and reads back an immutable [`FrameSnapshot`].
*/

use crate::{
    animation::Animator,
    camera::{CameraOutput, CameraRig, CameraRigConfig},
    collision::SpatialIndex,
    movement::{BodyPose, PhysicsConfig, Simulation},
};

#[derive(Clone, Copy, Debug, Default)]
pub struct ViewerConfig {
    pub physics: PhysicsConfig,
    pub camera: CameraRigConfig,
    /// Start in stereo mode.
    pub vr_mode: bool,
}

/// Everything the renderer needs to draw one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameSnapshot {
    pub body: BodyPose,
    pub camera: CameraOutput,
    pub on_floor: bool,
    /// The body was recovered from below the world this frame.
    pub teleported: bool,
}

pub struct ViewerCore {
    world: SpatialIndex,
    simulation: Simulation,
    rig: CameraRig,
    vr_mode: bool,
    /// Bumped by every `set_world`, so readers can tell worlds apart.
    world_generation: u64,
}

impl Default for ViewerCore {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl ViewerCore {
    /// Starts with an empty world until [`ViewerCore::set_world`] is called.
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            world: SpatialIndex::empty(),
            simulation: Simulation::new(config.physics),
            rig: CameraRig::new(config.camera),
            vr_mode: config.vr_mode,
            world_generation: 0,
        }
    }

    /// Install the world index once the city geometry has loaded.
    pub fn set_world(&mut self, world: SpatialIndex) {
        log::info!(
            "World collision ready: {} triangles",
            world.triangle_count()
        );
        self.world = world;
        self.world_generation += 1;
    }

    #[inline]
    pub fn world(&self) -> &SpatialIndex {
        &self.world
    }

    /// 0 for the initial empty world, then incremented on every `set_world`.
    #[inline]
    pub fn world_generation(&self) -> u64 {
        self.world_generation
    }

    pub fn set_vr_mode(&mut self, on: bool) {
        if self.vr_mode != on {
            log::info!("VR mode {}", if on { "enabled" } else { "disabled" });
        }
        self.vr_mode = on;
    }

    #[inline]
    pub fn vr_mode(&self) -> bool {
        self.vr_mode
    }

    #[inline]
    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    #[inline]
    pub fn animator(&self) -> &Animator {
        self.simulation.animator()
    }

    #[inline]
    pub fn animator_mut(&mut self) -> &mut Animator {
        self.simulation.animator_mut()
    }

    /// Advance physics and animation by `frame_dt` and derive the camera for the new pose.
    pub fn frame(&mut self, frame_dt: f32) -> FrameSnapshot {
        let report = self.simulation.step(&self.world, frame_dt);
        if report.teleported {
            self.rig.reset();
        }

        let camera = self
            .rig
            .compute_pose(self.simulation.capsule(), &self.world, self.vr_mode);

        FrameSnapshot {
            body: report.body,
            camera,
            on_floor: report.on_floor,
            teleported: report.teleported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{Point3, StaticWorldGeometry};

    #[test]
    fn core_without_world_falls_and_recovers() {
        let mut core = ViewerCore::default();
        let default_capsule = PhysicsConfig::default().default_capsule;

        let mut teleports = 0;
        for _ in 0..600 {
            let snapshot = core.frame(1.0 / 60.0);
            assert!(!snapshot.on_floor);
            if snapshot.teleported {
                teleports += 1;
                assert_eq!(*core.simulation().capsule(), default_capsule);
                // Camera snapped back onto the recovered body.
                let CameraOutput::Mono(pose) = snapshot.camera else {
                    panic!("expected mono output");
                };
                assert!(pose.position.y > 0.0);
            }
        }
        assert!(teleports >= 1);
    }

    #[test]
    fn vr_toggle_switches_camera_output() {
        let mut core = ViewerCore::default();
        assert!(matches!(core.frame(0.0).camera, CameraOutput::Mono(_)));

        core.set_vr_mode(true);
        assert!(core.vr_mode());
        assert!(matches!(core.frame(0.0).camera, CameraOutput::Stereo(_)));

        core.set_vr_mode(false);
        assert!(matches!(core.frame(0.0).camera, CameraOutput::Mono(_)));
    }

    #[test]
    fn every_installed_world_gets_a_new_generation() {
        let mut core = ViewerCore::default();
        assert_eq!(core.world_generation(), 0);

        let tri = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        core.set_world(SpatialIndex::build(&StaticWorldGeometry::from_triangles([tri])));
        let first = core.world_generation();

        // Same triangle count, different world.
        let moved = tri.map(|p| p + crate::collision::Vec3::new(5.0, 0.0, 0.0));
        core.set_world(SpatialIndex::build(&StaticWorldGeometry::from_triangles([moved])));

        assert_eq!(core.world().triangle_count(), 1);
        assert!(core.world_generation() > first);
        assert_eq!(first, 1);
    }

    #[test]
    fn installed_world_catches_the_body() {
        let mut core = ViewerCore::default();
        let a = Point3::new(-5.0, -0.2, -5.0);
        let b = Point3::new(5.0, -0.2, -5.0);
        let c = Point3::new(5.0, -0.2, 5.0);
        let d = Point3::new(-5.0, -0.2, 5.0);
        core.set_world(SpatialIndex::build(&StaticWorldGeometry::from_triangles([
            [a, c, b],
            [a, d, c],
        ])));

        let mut landed = false;
        for _ in 0..120 {
            landed |= core.frame(1.0 / 60.0).on_floor;
        }
        assert!(landed);
        assert!(core.simulation().capsule().start.y > -0.2);
    }
}

use crate::{
    animation::Animator,
    collision::{
        Capsule, CollisionResolver, CollisionWorld, Point3, Quat, SingleContactResolver, Vec3,
    },
    constants::{
        AIR_DAMPING_SCALE, BODY_VERTICAL_OFFSET, DEFAULT_CAPSULE_END, DEFAULT_CAPSULE_RADIUS,
        DEFAULT_CAPSULE_START, GRAVITY, GROUND_DAMPING_RATE, MAX_FRAME_DELTA,
        OUT_OF_BOUNDS_HEIGHT, STEPS_PER_FRAME,
    },
};

/// Tunables of the gravity integrator. `Default` mirrors the constants module.
#[derive(Clone, Copy, Debug)]
pub struct PhysicsConfig {
    /// Downward acceleration while airborne (units/s²).
    pub gravity: f32,
    /// Fixed sub-steps per frame.
    pub substeps: u32,
    /// Frame delta clamp (seconds).
    pub max_frame_dt: f32,
    /// Grounded exponential damping rate (1/s).
    pub damping_rate: f32,
    /// Multiplier applied to the damping factor while airborne.
    pub air_damping_scale: f32,
    /// Reference height at or below which the body is teleported home.
    pub out_of_bounds_height: f32,
    /// Pose restored by the out-of-bounds recovery, also the initial pose.
    pub default_capsule: Capsule,
    /// Distance from the capsule's top end-point down to the rendered body origin.
    pub body_offset: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            substeps: STEPS_PER_FRAME,
            max_frame_dt: MAX_FRAME_DELTA,
            damping_rate: GROUND_DAMPING_RATE,
            air_damping_scale: AIR_DAMPING_SCALE,
            out_of_bounds_height: OUT_OF_BOUNDS_HEIGHT,
            default_capsule: Capsule::new(
                Point3::from(DEFAULT_CAPSULE_START),
                Point3::from(DEFAULT_CAPSULE_END),
                DEFAULT_CAPSULE_RADIUS,
            ),
            body_offset: BODY_VERTICAL_OFFSET,
        }
    }
}

/// Rigid transform of the rendered body, derived from the capsule only.
///
/// Skeletal animation never feeds back into this pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyPose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl BodyPose {
    /// Place the body `offset` below the capsule's top end-point with a fixed orientation.
    #[inline]
    pub fn from_capsule(capsule: &Capsule, offset: f32) -> Self {
        Self {
            translation: capsule.end.coords - Vec3::new(0.0, offset, 0.0),
            rotation: Quat::identity(),
        }
    }
}

/// Output of a single `Simulation::step()` call.
#[derive(Clone, Copy, Debug)]
pub struct StepReport {
    /// Body pose after the frame.
    pub body: BodyPose,
    /// Floor contact flag after the last sub-step.
    pub on_floor: bool,
    /// Whether the out-of-bounds recovery fired this frame.
    pub teleported: bool,
    /// Sub-steps actually integrated (fewer than configured after a teleport).
    pub substeps_run: u32,
}

/// Exponential damping factor for one sub-step: `v += v * factor`.
///
/// Always in `(-1, 0]` for non-negative `dt`, so it only ever attenuates.
#[inline]
pub fn damping_factor(config: &PhysicsConfig, dt: f32, on_floor: bool) -> f32 {
    let damping = (-config.damping_rate * dt).exp() - 1.0;
    if on_floor {
        damping
    } else {
        damping * config.air_damping_scale
    }
}

/// State of the single dynamic body: capsule, velocity, floor flag and its animation clock.
///
/// There is no hidden global state; several simulations can run side by side.
pub struct Simulation<R = SingleContactResolver> {
    config: PhysicsConfig,
    resolver: R,
    capsule: Capsule,
    velocity: Vec3,
    on_floor: bool,
    body: BodyPose,
    animator: Animator,
}

impl Simulation<SingleContactResolver> {
    pub fn new(config: PhysicsConfig) -> Self {
        Self::with_resolver(config, SingleContactResolver)
    }
}

impl Default for Simulation<SingleContactResolver> {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl<R: CollisionResolver> Simulation<R> {
    /// Start at the configured default pose, at rest and airborne.
    pub fn with_resolver(config: PhysicsConfig, resolver: R) -> Self {
        let capsule = config.default_capsule;
        Self {
            config,
            resolver,
            capsule,
            velocity: Vec3::zeros(),
            on_floor: false,
            body: BodyPose::from_capsule(&capsule, config.body_offset),
            animator: Animator::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    #[inline]
    pub fn capsule(&self) -> &Capsule {
        &self.capsule
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    #[inline]
    pub fn on_floor(&self) -> bool {
        self.on_floor
    }

    #[inline]
    pub fn body(&self) -> BodyPose {
        self.body
    }

    #[inline]
    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    #[inline]
    pub fn animator_mut(&mut self) -> &mut Animator {
        &mut self.animator
    }

    /// Place the capsule explicitly (keeps velocity and the floor flag).
    pub fn set_capsule(&mut self, capsule: Capsule) {
        self.capsule = capsule;
        self.body = BodyPose::from_capsule(&self.capsule, self.config.body_offset);
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Advance one rendered frame.
    ///
    /// Behavior
    /// - `frame_dt` is clamped to `max_frame_dt` and split into `substeps` equal sub-steps.
    /// - Each sub-step: gravity (airborne only), damping, translate, resolve collisions,
    ///   refresh the body pose, check the out-of-bounds recovery.
    /// - The recovery restores the default pose, zeroes velocity and ends the frame's physics.
    /// - The animation clock then advances by the unclamped `frame_dt`.
    pub fn step(&mut self, world: &dyn CollisionWorld, frame_dt: f32) -> StepReport {
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.max(0.0)
        } else {
            0.0
        };
        let substeps = self.config.substeps.max(1);
        let dt = frame_dt.min(self.config.max_frame_dt) / substeps as f32;

        let mut teleported = false;
        let mut substeps_run = 0;

        for _ in 0..substeps {
            substeps_run += 1;
            self.integrate(dt);
            self.on_floor = self
                .resolver
                .resolve(world, &mut self.capsule, &mut self.velocity);
            self.body = BodyPose::from_capsule(&self.capsule, self.config.body_offset);

            if self.capsule.end.y <= self.config.out_of_bounds_height {
                self.teleport_home();
                teleported = true;
                break;
            }
        }

        self.animator.advance(frame_dt);
        self.body = BodyPose::from_capsule(&self.capsule, self.config.body_offset);

        StepReport {
            body: self.body,
            on_floor: self.on_floor,
            teleported,
            substeps_run,
        }
    }

    /// Gravity, damping and free translation for one sub-step.
    fn integrate(&mut self, dt: f32) {
        if !self.on_floor {
            self.velocity.y -= self.config.gravity * dt;
        }
        let damping = damping_factor(&self.config, dt, self.on_floor);
        self.velocity += self.velocity * damping;
        self.capsule.translate(&(self.velocity * dt));
    }

    fn teleport_home(&mut self) {
        log::info!(
            "Body fell below {} (y = {:.2}); teleporting to the default pose",
            self.config.out_of_bounds_height,
            self.capsule.end.y
        );
        self.capsule = self.config.default_capsule;
        self.velocity = Vec3::zeros();
        self.on_floor = false;
        self.body = BodyPose::from_capsule(&self.capsule, self.config.body_offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{Contact, SpatialIndex, Sphere};

    struct NoWorld;

    impl CollisionWorld for NoWorld {
        fn intersect_capsule(&self, _: &Capsule) -> Option<Contact> {
            None
        }
        fn intersect_sphere(&self, _: &Sphere) -> Option<Contact> {
            None
        }
    }

    #[test]
    fn grounded_damping_never_amplifies() {
        let config = PhysicsConfig::default();
        let velocities = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, -2.0, 3.0),
            Vec3::new(-40.0, 0.5, 12.0),
            Vec3::new(0.0, -7.7, 0.0),
        ];
        for dt in [0.0, 1.0 / 300.0, 0.01, 0.05] {
            for on_floor in [true, false] {
                let d = damping_factor(&config, dt, on_floor);
                assert!(d <= 0.0 && d > -1.0);
                for v in velocities {
                    let after = v + v * d;
                    assert!(after.norm() <= v.norm() + 1.0e-6);
                }
            }
        }
    }

    #[test]
    fn free_fall_accelerates_at_gravity() {
        let mut sim = Simulation::default();
        let dt = 1.0 / 60.0;
        let report = sim.step(&NoWorld, dt);

        assert!(!report.on_floor);
        assert_eq!(report.substeps_run, STEPS_PER_FRAME);
        // Airborne drag is weak, so the speed is only slightly below g * t.
        let vy = sim.velocity().y;
        assert!(vy < 0.0);
        assert!(vy > -GRAVITY * dt);
        assert!(vy < -GRAVITY * dt * 0.99);
    }

    #[test]
    fn frame_delta_is_clamped() {
        let mut a = Simulation::default();
        let mut b = Simulation::default();
        a.step(&NoWorld, MAX_FRAME_DELTA);
        b.step(&NoWorld, 10.0);

        assert_eq!(a.capsule(), b.capsule());
        assert_eq!(a.velocity(), b.velocity());
    }

    #[test]
    fn invalid_frame_delta_is_ignored() {
        let mut sim = Simulation::default();
        sim.step(&NoWorld, f32::NAN);
        sim.step(&NoWorld, -1.0);

        assert_eq!(*sim.capsule(), PhysicsConfig::default().default_capsule);
        assert_eq!(sim.velocity(), Vec3::zeros());
    }

    #[test]
    fn out_of_bounds_restores_default_pose_exactly() {
        let mut sim = Simulation::default();
        let mut fallen = PhysicsConfig::default().default_capsule;
        fallen.translate(&Vec3::new(3.0, -30.0, -2.0));
        sim.set_capsule(fallen);
        sim.set_velocity(Vec3::new(1.0, -50.0, 0.0));

        let report = sim.step(&SpatialIndex::empty(), 1.0 / 60.0);

        assert!(report.teleported);
        assert_eq!(report.substeps_run, 1);
        assert_eq!(sim.velocity(), Vec3::zeros());
        assert_eq!(*sim.capsule(), PhysicsConfig::default().default_capsule);
        assert!(!sim.on_floor());
    }

    #[test]
    fn body_pose_tracks_capsule_top() {
        let mut sim = Simulation::default();
        sim.step(&NoWorld, 1.0 / 60.0);

        let body = sim.body();
        let expected = sim.capsule().end.y - BODY_VERTICAL_OFFSET;
        assert!((body.translation.y - expected).abs() < 1.0e-6);
        assert_eq!(body.rotation, Quat::identity());
    }

    #[test]
    fn animation_clock_uses_unclamped_frame_delta() {
        use crate::animation::{ClipInfo, LoopMode};

        let mut sim = Simulation::default();
        sim.animator_mut()
            .register_clip(ClipInfo::new("dance", 10.0, 3), LoopMode::Repeat);
        sim.animator_mut().play_clip("dance");

        sim.step(&NoWorld, 0.2);

        let time = sim.animator().action("dance").unwrap().time();
        assert!((time - 0.2).abs() < 1.0e-6);
    }
}

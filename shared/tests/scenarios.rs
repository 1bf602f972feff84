//! End-to-end integrator scenarios against a real triangle floor.

use shared::{
    Capsule, PhysicsConfig, Point3, Simulation, SpatialIndex, StaticWorldGeometry,
    collision::settings::CONTACT_PREDICTION,
};

const FRAME: f32 = 1.0 / 60.0;

/// A 40x40 floor made of two triangles at y = 0.
fn floor() -> SpatialIndex {
    let a = Point3::new(-20.0, 0.0, -20.0);
    let b = Point3::new(20.0, 0.0, -20.0);
    let c = Point3::new(20.0, 0.0, 20.0);
    let d = Point3::new(-20.0, 0.0, 20.0);
    SpatialIndex::build(&StaticWorldGeometry::from_triangles([[a, c, b], [a, d, c]]))
}

fn simulation_at(bottom: f32) -> Simulation {
    let mut sim = Simulation::new(PhysicsConfig::default());
    let radius = sim.config().default_capsule.radius;
    sim.set_capsule(Capsule::new(
        Point3::new(1.5, bottom, -2.5),
        Point3::new(1.5, bottom + 0.3, -2.5),
        radius,
    ));
    sim
}

#[test]
fn body_resting_on_floor_stays_put() {
    let world = floor();
    let radius = PhysicsConfig::default().default_capsule.radius;
    let mut sim = simulation_at(radius + 0.5 * CONTACT_PREDICTION);

    for _ in 0..100 {
        sim.step(&world, FRAME);
    }

    assert!(sim.on_floor());
    assert!(sim.velocity().y.abs() < 1.0e-2);
    assert!((sim.capsule().start.y - radius).abs() < 1.0e-3);
    assert!((sim.capsule().start.x - 1.5).abs() < 1.0e-6);
    assert!((sim.capsule().start.z + 2.5).abs() < 1.0e-6);
}

#[test]
fn body_dropped_from_height_lands_once_without_bouncing() {
    let world = floor();
    let radius = PhysicsConfig::default().default_capsule.radius;
    let mut sim = simulation_at(1.0);

    let mut was_on_floor = sim.on_floor();
    let mut landings = 0;

    for _ in 0..300 {
        let report = sim.step(&world, FRAME);
        assert!(!report.teleported);
        assert!(sim.velocity().y <= 0.0);

        if report.on_floor && !was_on_floor {
            landings += 1;
        }
        was_on_floor = report.on_floor;
    }

    assert_eq!(landings, 1);
    assert!(sim.on_floor());
    assert!(sim.velocity().y.abs() < 1.0e-3);
    assert!((sim.capsule().start.y - radius).abs() < 1.0e-3);
}

#[test]
fn contact_reported_after_resolution_has_no_residual_penetration() {
    use shared::{CollisionResolver, CollisionWorld, SingleContactResolver, Vec3};

    let world = floor();
    let mut capsule = Capsule::new(
        Point3::new(0.3, 0.01, 0.4),
        Point3::new(0.3, 0.31, 0.4),
        0.07,
    );
    let mut velocity = Vec3::new(0.0, -2.0, 0.0);

    assert!(SingleContactResolver.resolve(&world, &mut capsule, &mut velocity));

    let residual = world.intersect_capsule(&capsule).map_or(0.0, |c| c.depth);
    assert!(residual < 1.0e-4);
}

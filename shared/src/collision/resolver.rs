use super::{
    broad::CollisionWorld,
    types::{Capsule, Vec3},
};

/// Keeps the dynamic capsule out of the static world for one sub-step.
///
/// Implementations correct the capsule position and velocity in place and report whether
/// the body ended the sub-step standing on a floor.
pub trait CollisionResolver {
    fn resolve(
        &self,
        world: &dyn CollisionWorld,
        capsule: &mut Capsule,
        velocity: &mut Vec3,
    ) -> bool;
}

/// One-shot resolution against the single contact reported by the world.
///
/// Algorithm:
/// - Query the world with the capsule.
/// - No contact: not on floor, nothing to correct.
/// - Wall/ceiling contact (`normal.y <= 0`): remove the velocity component along the normal.
/// - Any contact: translate the capsule by `normal * depth`.
///
/// Simultaneous contacts are not relaxed iteratively; only the reported contact is honored.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleContactResolver;

impl CollisionResolver for SingleContactResolver {
    fn resolve(
        &self,
        world: &dyn CollisionWorld,
        capsule: &mut Capsule,
        velocity: &mut Vec3,
    ) -> bool {
        let Some(contact) = world.intersect_capsule(capsule) else {
            return false;
        };

        let on_floor = contact.is_floor();
        if !on_floor {
            *velocity -= contact.normal * contact.normal.dot(&*velocity);
        }
        capsule.translate(&(contact.normal * contact.depth));

        on_floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::types::{Contact, Point3, Sphere};

    /// World that reports the same contact for every capsule query.
    struct FixedContact(Option<Contact>);

    impl CollisionWorld for FixedContact {
        fn intersect_capsule(&self, _: &Capsule) -> Option<Contact> {
            self.0
        }
        fn intersect_sphere(&self, _: &Sphere) -> Option<Contact> {
            self.0
        }
    }

    fn capsule() -> Capsule {
        Capsule::new(Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.3, 0.0), 0.07)
    }

    #[test]
    fn no_contact_leaves_state_untouched() {
        let mut c = capsule();
        let mut v = Vec3::new(1.0, -2.0, 3.0);

        let on_floor = SingleContactResolver.resolve(&FixedContact(None), &mut c, &mut v);

        assert!(!on_floor);
        assert_eq!(c, capsule());
        assert_eq!(v, Vec3::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn floor_contact_pushes_out_but_keeps_velocity() {
        let world = FixedContact(Some(Contact {
            normal: Vec3::y(),
            depth: 0.02,
        }));
        let mut c = capsule();
        let mut v = Vec3::new(0.5, -3.0, 0.0);

        let on_floor = SingleContactResolver.resolve(&world, &mut c, &mut v);

        assert!(on_floor);
        assert!((c.start.y - 0.02).abs() < 1.0e-6);
        assert!((c.end.y - 0.32).abs() < 1.0e-6);
        assert_eq!(v, Vec3::new(0.5, -3.0, 0.0));
    }

    #[test]
    fn wall_contact_removes_normal_velocity() {
        let world = FixedContact(Some(Contact {
            normal: -Vec3::x(),
            depth: 0.01,
        }));
        let mut c = capsule();
        let mut v = Vec3::new(2.0, -1.0, 0.5);

        let on_floor = SingleContactResolver.resolve(&world, &mut c, &mut v);

        assert!(!on_floor);
        assert!(v.x.abs() < 1.0e-6);
        assert!((v.y + 1.0).abs() < 1.0e-6);
        assert!((v.z - 0.5).abs() < 1.0e-6);
        assert!((c.start.x + 0.01).abs() < 1.0e-6);
        assert!((c.radius - 0.07).abs() < f32::EPSILON);
    }

    #[test]
    fn ceiling_contact_is_not_a_floor() {
        let world = FixedContact(Some(Contact {
            normal: -Vec3::y(),
            depth: 0.0,
        }));
        let mut c = capsule();
        let mut v = Vec3::new(0.0, 4.0, 0.0);

        assert!(!SingleContactResolver.resolve(&world, &mut c, &mut v));
        assert!(v.y.abs() < 1.0e-6);
    }
}

use rapier3d::parry::{
    bounding_volume::Aabb,
    partitioning::{Bvh, BvhBuildStrategy},
};

use super::{
    geometry::StaticWorldGeometry,
    narrow_phase,
    settings::{CONTACT_PREDICTION, DIST_EPS, MIN_TRIANGLE_AREA2},
    types::{Capsule, Contact, Point3, Sphere, Vec3},
};

/// Shape-vs-world queries the resolver, integrator and camera rig are written against.
///
/// Each query reports at most one representative contact.
pub trait CollisionWorld {
    fn intersect_capsule(&self, capsule: &Capsule) -> Option<Contact>;
    fn intersect_sphere(&self, sphere: &Sphere) -> Option<Contact>;
}

/// Static bounding-volume hierarchy over the world's triangles.
///
/// Notes:
/// - Built once from [`StaticWorldGeometry`] and read-only afterwards.
/// - BVH leaf `i` is the world-space AABB of `triangles[i]`.
/// - Contacts are expressed in the geometry's coordinate frame.
pub struct SpatialIndex {
    bvh: Bvh,
    triangles: Vec<[Point3; 3]>,
    bounds: Option<Aabb>,
}

impl SpatialIndex {
    /// An index over no geometry; it never reports intersections.
    pub fn empty() -> Self {
        Self {
            bvh: Bvh::from_leaves(BvhBuildStrategy::Binned, &[]),
            triangles: Vec::new(),
            bounds: None,
        }
    }

    /// Build the index over every non-degenerate triangle of `geometry`.
    pub fn build(geometry: &StaticWorldGeometry) -> Self {
        let mut triangles = Vec::with_capacity(geometry.triangle_count());
        let mut aabbs = Vec::with_capacity(geometry.triangle_count());
        let mut skipped = 0usize;

        for tri in geometry.triangles() {
            if narrow_phase::triangle_area2(&tri) < MIN_TRIANGLE_AREA2 {
                skipped += 1;
                continue;
            }
            aabbs.push(triangle_aabb(&tri));
            triangles.push(tri);
        }

        if skipped > 0 {
            log::debug!("Skipped {skipped} degenerate triangles while building the world index");
        }
        if triangles.is_empty() {
            log::warn!("World index built from zero triangles; nothing will collide");
            return Self::empty();
        }

        let bounds = aabbs.iter().skip(1).fold(aabbs[0], |acc, b| aabb_union(&acc, b));

        Self {
            bvh: Bvh::from_leaves(BvhBuildStrategy::Binned, &aabbs),
            triangles,
            bounds: Some(bounds),
        }
    }

    /// Number of indexed triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Bounds of all indexed geometry, `None` for an empty index.
    #[inline]
    pub fn aabb(&self) -> Option<Aabb> {
        self.bounds
    }

    /// Indices of triangles whose AABB intersects `query`.
    fn candidates<'a>(&'a self, query: &'a Aabb) -> impl Iterator<Item = usize> + 'a {
        self.bvh.intersect_aabb(query).map(|leaf| leaf as usize)
    }

    /// Octree subdivision of the index bounds down to `max_depth`, keeping only cells
    /// that overlap at least one triangle AABB. Depth 0 yields the root bounds alone.
    ///
    /// Intended for debug visualization; the result is not used by any query.
    pub fn debug_cells(&self, max_depth: u32) -> Vec<Aabb> {
        let mut cells = Vec::new();
        if let Some(root) = self.bounds {
            self.collect_cells(root, max_depth, &mut cells);
        }
        cells
    }

    fn collect_cells(&self, cell: Aabb, depth: u32, out: &mut Vec<Aabb>) {
        if self.candidates(&cell).next().is_none() {
            return;
        }
        if depth == 0 {
            out.push(cell);
            return;
        }

        let center = nalgebra::center(&cell.mins, &cell.maxs);
        for octant in 0..8u8 {
            let pick = |bit: u8, lo: f32, mid: f32, hi: f32| {
                if octant & bit == 0 { (lo, mid) } else { (mid, hi) }
            };
            let (x0, x1) = pick(1, cell.mins.x, center.x, cell.maxs.x);
            let (y0, y1) = pick(2, cell.mins.y, center.y, cell.maxs.y);
            let (z0, z1) = pick(4, cell.mins.z, center.z, cell.maxs.z);
            let child = Aabb {
                mins: Point3::new(x0, y0, z0),
                maxs: Point3::new(x1, y1, z1),
            };
            self.collect_cells(child, depth - 1, out);
        }
    }

    /// Push a scratch copy of a shape out of every candidate triangle in turn and fold the
    /// individual corrections into one representative contact.
    ///
    /// - `contact_at(offset, tri)` tests the shape translated by `offset` against `tri`.
    /// - A net displacement gives `normal = displacement / |displacement|`, `depth = |displacement|`.
    /// - Touching-only hits (no displacement) report depth 0 with the last touching normal.
    fn depenetrate(
        &self,
        query: &Aabb,
        contact_at: impl Fn(&Vec3, &[Point3; 3]) -> Option<Contact>,
    ) -> Option<Contact> {
        let mut offset = Vec3::zeros();
        let mut touching: Option<Vec3> = None;

        for idx in self.candidates(query) {
            if let Some(hit) = contact_at(&offset, &self.triangles[idx]) {
                offset += hit.normal * hit.depth;
                touching = Some(hit.normal);
            }
        }

        let last_normal = touching?;
        let depth = offset.norm();
        if depth > DIST_EPS {
            Some(Contact {
                normal: offset / depth,
                depth,
            })
        } else {
            Some(Contact {
                normal: last_normal,
                depth: 0.0,
            })
        }
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::empty()
    }
}

impl CollisionWorld for SpatialIndex {
    fn intersect_capsule(&self, capsule: &Capsule) -> Option<Contact> {
        if self.is_empty() {
            return None;
        }
        let (mins, maxs) = capsule.bounds(CONTACT_PREDICTION);
        let query = Aabb { mins, maxs };

        self.depenetrate(&query, |offset, tri| {
            let mut moved = *capsule;
            moved.translate(offset);
            narrow_phase::capsule_triangle_contact(&moved, tri)
        })
    }

    fn intersect_sphere(&self, sphere: &Sphere) -> Option<Contact> {
        if self.is_empty() {
            return None;
        }
        let (mins, maxs) = sphere.bounds(CONTACT_PREDICTION);
        let query = Aabb { mins, maxs };

        self.depenetrate(&query, |offset, tri| {
            let moved = Sphere::new(sphere.center + offset, sphere.radius);
            narrow_phase::sphere_triangle_contact(&moved, tri)
        })
    }
}

/// World-space AABB of a triangle.
fn triangle_aabb(tri: &[Point3; 3]) -> Aabb {
    Aabb {
        mins: tri[0].inf(&tri[1]).inf(&tri[2]),
        maxs: tri[0].sup(&tri[1]).sup(&tri[2]),
    }
}

/// Compute the union of two AABBs.
fn aabb_union(a: &Aabb, b: &Aabb) -> Aabb {
    Aabb {
        mins: a.mins.inf(&b.mins),
        maxs: a.maxs.sup(&b.maxs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two triangles forming a 20x20 floor at height `y`.
    fn floor(y: f32) -> StaticWorldGeometry {
        let a = Point3::new(-10.0, y, -10.0);
        let b = Point3::new(10.0, y, -10.0);
        let c = Point3::new(10.0, y, 10.0);
        let d = Point3::new(-10.0, y, 10.0);
        StaticWorldGeometry::from_triangles([[a, c, b], [a, d, c]])
    }

    fn wall_at_x(x: f32) -> [Point3; 3] {
        [
            Point3::new(x, -10.0, -10.0),
            Point3::new(x, 10.0, -10.0),
            Point3::new(x, 0.0, 10.0),
        ]
    }

    #[test]
    fn empty_index_never_intersects() {
        let index = SpatialIndex::build(&StaticWorldGeometry::new());
        let capsule = Capsule::new(Point3::origin(), Point3::new(0.0, 0.3, 0.0), 0.07);

        assert!(index.is_empty());
        assert!(index.aabb().is_none());
        assert!(index.intersect_capsule(&capsule).is_none());
        assert!(
            index
                .intersect_sphere(&Sphere::new(Point3::origin(), 1.0))
                .is_none()
        );
        assert!(index.debug_cells(3).is_empty());
    }

    #[test]
    fn build_skips_degenerate_triangles() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let mut geometry = floor(0.0);
        geometry
            .push_mesh(&[p, p, Point3::new(2.0, 2.0, 2.0)], None)
            .unwrap();

        let index = SpatialIndex::build(&geometry);
        assert_eq!(index.triangle_count(), 2);
    }

    #[test]
    fn capsule_sunk_into_floor_reports_single_upward_contact() {
        let index = SpatialIndex::build(&floor(0.0));
        // Well inside one triangle, away from the shared diagonal.
        let capsule = Capsule::new(
            Point3::new(4.0, 0.04, -3.0),
            Point3::new(4.0, 0.34, -3.0),
            0.07,
        );

        let contact = index.intersect_capsule(&capsule).unwrap();
        assert!(contact.is_floor());
        assert!((contact.normal - Vec3::y()).norm() < 1.0e-3);
        assert!((contact.depth - 0.03).abs() < 1.0e-3);
    }

    #[test]
    fn capsule_on_shared_edge_is_pushed_up_once() {
        let index = SpatialIndex::build(&floor(0.0));
        // Sits exactly on the diagonal shared by the two floor triangles; the edge
        // contact normal is only approximately vertical.
        let capsule = Capsule::new(
            Point3::new(0.0, 0.04, 0.0),
            Point3::new(0.0, 0.34, 0.0),
            0.07,
        );

        let contact = index.intersect_capsule(&capsule).unwrap();
        assert!(contact.is_floor());
        assert!(contact.normal.y > 0.99);
        assert!((contact.depth - 0.03).abs() < 2.0e-3);

        // The folded correction leaves the capsule above the floor, not sunk into the
        // second triangle.
        let mut resolved = capsule;
        resolved.translate(&(contact.normal * contact.depth));
        assert!(resolved.start.y > 0.069);
        let after = index.intersect_capsule(&resolved);
        assert!(after.map_or(true, |c| c.depth < 1.0e-3));
    }

    #[test]
    fn resting_capsule_reports_touching_floor() {
        let index = SpatialIndex::build(&floor(0.0));
        let capsule = Capsule::new(
            Point3::new(3.0, 0.07005, 2.0),
            Point3::new(3.0, 0.37005, 2.0),
            0.07,
        );

        let contact = index.intersect_capsule(&capsule).unwrap();
        assert!(contact.is_floor());
        assert!(contact.depth < 1.0e-4);
    }

    #[test]
    fn capsule_in_corner_is_pushed_out_of_both_surfaces() {
        let mut geometry = floor(0.0);
        let wall = wall_at_x(1.0);
        geometry.push_mesh(&wall, None).unwrap();
        let index = SpatialIndex::build(&geometry);

        let capsule = Capsule::new(
            Point3::new(0.95, 0.05, 0.0),
            Point3::new(0.95, 0.35, 0.0),
            0.07,
        );
        let contact = index.intersect_capsule(&capsule).unwrap();

        // Net correction points up and away from the wall.
        assert!(contact.normal.y > 0.0);
        assert!(contact.normal.x < 0.0);

        let mut resolved = capsule;
        resolved.translate(&(contact.normal * contact.depth));
        let after = index.intersect_capsule(&resolved);
        assert!(after.map_or(true, |c| c.depth < 1.0e-3));
    }

    #[test]
    fn sphere_reports_wall_contact() {
        let geometry = StaticWorldGeometry::from_triangles([wall_at_x(0.0)]);
        let index = SpatialIndex::build(&geometry);

        let contact = index
            .intersect_sphere(&Sphere::new(Point3::new(-0.02, 0.0, 0.0), 0.05))
            .unwrap();
        assert!(contact.normal.x < -0.99);
        assert!((contact.depth - 0.03).abs() < 1.0e-4);

        assert!(
            index
                .intersect_sphere(&Sphere::new(Point3::new(-1.0, 0.0, 0.0), 0.05))
                .is_none()
        );
    }

    #[test]
    fn debug_cells_cover_geometry_only() {
        let index = SpatialIndex::build(&floor(0.0));
        let root = index.debug_cells(0);
        assert_eq!(root.len(), 1);

        let cells = index.debug_cells(2);
        assert!(!cells.is_empty());
        assert!(cells.len() <= 64);
        for cell in &cells {
            assert!(cell.mins.y <= 0.0 && cell.maxs.y >= 0.0);
        }
    }
}

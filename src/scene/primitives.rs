use std::f64::consts::PI;
use std::sync::Arc;

use rand::Rng;

use crate::geometry::{Aabb, FloatType, Ray, TexturePoint, WorldPoint, WorldVector};
use crate::material::Material;

use super::{HitRecord, HittableList};

/// Padding applied to the degenerate axis of flat primitives so their boxes
/// keep a nonzero volume for BVH partitioning.
const RECT_PAD: FloatType = 1e-4;

pub struct Sphere {
    pub center: WorldPoint,
    pub radius: FloatType,
    pub material: Arc<Material>,
}

impl Sphere {
    pub fn new(center: WorldPoint, radius: FloatType, material: Arc<Material>) -> Sphere {
        Sphere {
            center,
            radius,
            material,
        }
    }

    pub fn hit(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord> {
        let t = sphere_intersection(&self.center, self.radius, ray, t_min, t_max)?;
        let position = ray.point_at(t);
        let outward_normal = (position - self.center) / self.radius;
        Some(HitRecord::new(
            ray,
            t,
            position,
            outward_normal,
            sphere_uv(&outward_normal),
            Arc::clone(&self.material),
        ))
    }

    pub fn bounding_box(&self) -> Aabb {
        let half_extent = WorldVector::repeat(self.radius);
        Aabb::new(self.center - half_extent, self.center + half_extent)
    }
}

/// Sphere whose center moves linearly between two keyframes; the sampled
/// position depends on the time carried by the ray.
pub struct MovingSphere {
    pub center0: WorldPoint,
    pub center1: WorldPoint,
    pub time0: FloatType,
    pub time1: FloatType,
    pub radius: FloatType,
    pub material: Arc<Material>,
}

impl MovingSphere {
    pub fn new(
        center0: WorldPoint,
        center1: WorldPoint,
        time0: FloatType,
        time1: FloatType,
        radius: FloatType,
        material: Arc<Material>,
    ) -> MovingSphere {
        MovingSphere {
            center0,
            center1,
            time0,
            time1,
            radius,
            material,
        }
    }

    pub fn center(&self, time: FloatType) -> WorldPoint {
        self.center0
            + (self.center1 - self.center0) * ((time - self.time0) / (self.time1 - self.time0))
    }

    pub fn hit(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord> {
        let center = self.center(ray.time);
        let t = sphere_intersection(&center, self.radius, ray, t_min, t_max)?;
        let position = ray.point_at(t);
        let outward_normal = (position - center) / self.radius;
        Some(HitRecord::new(
            ray,
            t,
            position,
            outward_normal,
            sphere_uv(&outward_normal),
            Arc::clone(&self.material),
        ))
    }

    pub fn bounding_box(&self, time0: FloatType, time1: FloatType) -> Aabb {
        let half_extent = WorldVector::repeat(self.radius);
        let box0 = Aabb::new(self.center(time0) - half_extent, self.center(time0) + half_extent);
        let box1 = Aabb::new(self.center(time1) - half_extent, self.center(time1) + half_extent);
        Aabb::surrounding_box(&box0, &box1)
    }
}

/// Smaller quadratic root in the open window, else the larger, else nothing.
/// Uses the half-b form; ray directions are unit length so `a == 1`.
fn sphere_intersection(
    center: &WorldPoint,
    radius: FloatType,
    ray: &Ray,
    t_min: FloatType,
    t_max: FloatType,
) -> Option<FloatType> {
    let oc = ray.origin - center;
    let half_b = oc.dot(&ray.direction);
    let c = oc.norm_squared() - radius * radius;
    let discriminant = half_b * half_b - c;

    if discriminant < 0.0 {
        return None;
    }
    let sqrt_discriminant = discriminant.sqrt();

    let near = -half_b - sqrt_discriminant;
    if near > t_min && near < t_max {
        return Some(near);
    }
    let far = -half_b + sqrt_discriminant;
    if far > t_min && far < t_max {
        return Some(far);
    }
    None
}

/// Spherical coordinates of the unit outward normal mapped to [0,1]^2.
fn sphere_uv(outward_normal: &WorldVector) -> TexturePoint {
    let theta = (-outward_normal.y).acos();
    let phi = (-outward_normal.z).atan2(outward_normal.x) + PI;
    TexturePoint::new(phi / (2.0 * PI), theta / PI)
}

/// Orientation of an axis-aligned rectangle, named by the plane it spans.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RectPlane {
    Xy,
    Xz,
    Yz,
}

impl RectPlane {
    /// Indices of the two in-plane axes and the fixed axis.
    fn axes(self) -> (usize, usize, usize) {
        match self {
            RectPlane::Xy => (0, 1, 2),
            RectPlane::Xz => (0, 2, 1),
            RectPlane::Yz => (1, 2, 0),
        }
    }

    fn normal(self) -> WorldVector {
        match self {
            RectPlane::Xy => WorldVector::new(0.0, 0.0, 1.0),
            RectPlane::Xz => WorldVector::new(0.0, 1.0, 0.0),
            RectPlane::Yz => WorldVector::new(1.0, 0.0, 0.0),
        }
    }
}

/// Axis-aligned rectangle spanning `[a0,a1] x [b0,b1]` at offset `k` along
/// the fixed axis.
pub struct Rect {
    pub plane: RectPlane,
    pub a0: FloatType,
    pub a1: FloatType,
    pub b0: FloatType,
    pub b1: FloatType,
    pub k: FloatType,
    pub material: Arc<Material>,
}

impl Rect {
    pub fn new(
        plane: RectPlane,
        a0: FloatType,
        a1: FloatType,
        b0: FloatType,
        b1: FloatType,
        k: FloatType,
        material: Arc<Material>,
    ) -> Rect {
        Rect {
            plane,
            a0,
            a1,
            b0,
            b1,
            k,
            material,
        }
    }

    pub fn hit(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord> {
        let (a_axis, b_axis, k_axis) = self.plane.axes();

        let t = (self.k - ray.origin[k_axis]) / ray.direction[k_axis];
        // A parallel ray yields ±infinity (or NaN when in-plane); all are rejected here
        if !t.is_finite() || t < t_min || t > t_max {
            return None;
        }

        let a = ray.origin[a_axis] + t * ray.direction[a_axis];
        let b = ray.origin[b_axis] + t * ray.direction[b_axis];
        if a < self.a0 || a > self.a1 || b < self.b0 || b > self.b1 {
            return None;
        }

        Some(HitRecord::new(
            ray,
            t,
            ray.point_at(t),
            self.plane.normal(),
            TexturePoint::new(
                (a - self.a0) / (self.a1 - self.a0),
                (b - self.b0) / (self.b1 - self.b0),
            ),
            Arc::clone(&self.material),
        ))
    }

    pub fn bounding_box(&self) -> Aabb {
        let (a_axis, b_axis, k_axis) = self.plane.axes();
        let mut min = WorldPoint::origin();
        let mut max = WorldPoint::origin();
        min[a_axis] = self.a0;
        max[a_axis] = self.a1;
        min[b_axis] = self.b0;
        max[b_axis] = self.b1;
        min[k_axis] = self.k - RECT_PAD;
        max[k_axis] = self.k + RECT_PAD;
        Aabb::new(min, max)
    }
}

/// Axis-aligned box assembled from six rectangles.
pub struct Cuboid {
    pub p_min: WorldPoint,
    pub p_max: WorldPoint,
    sides: HittableList,
}

impl Cuboid {
    pub fn new(p_min: WorldPoint, p_max: WorldPoint, material: Arc<Material>) -> Cuboid {
        let mut sides = HittableList::new();

        for (plane, k_axis) in [
            (RectPlane::Xy, 2usize),
            (RectPlane::Xz, 1),
            (RectPlane::Yz, 0),
        ] {
            let (a_axis, b_axis, _) = plane.axes();
            for k in [p_min[k_axis], p_max[k_axis]] {
                sides.add(Rect::new(
                    plane,
                    p_min[a_axis],
                    p_max[a_axis],
                    p_min[b_axis],
                    p_max[b_axis],
                    k,
                    Arc::clone(&material),
                ));
            }
        }

        Cuboid { p_min, p_max, sides }
    }

    pub fn hit(
        &self,
        ray: &Ray,
        t_min: FloatType,
        t_max: FloatType,
        rng: &mut impl Rng,
    ) -> Option<HitRecord> {
        self.sides.hit(ray, t_min, t_max, rng)
    }

    /// The exact corner points, not the union of the padded side boxes.
    pub fn bounding_box(&self) -> Aabb {
        Aabb::new(self.p_min, self.p_max)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::Color;
    use assert2::assert;
    use rand::SeedableRng as _;
    use rand::rngs::SmallRng;
    use test_case::test_case;

    fn gray() -> Arc<Material> {
        Material::lambertian(Color::new(0.5, 0.5, 0.5))
    }

    #[test]
    fn direct_hit_through_center() {
        let sphere = Sphere::new(WorldPoint::new(1.0, 2.0, 3.0), 1.0, gray());
        let ray = Ray::new(
            WorldPoint::new(1.0, 2.0, 0.0),
            WorldVector::new(0.0, 0.0, 1.0),
            0.0,
        );

        let hit = sphere
            .hit(&ray, 0.001, FloatType::INFINITY)
            .expect("we should have a hit");
        // Aimed at the center: t = distance(origin, center) - radius
        assert!((hit.t - 2.0).abs() < 1e-9);
        assert!((hit.normal.norm() - 1.0).abs() < 1e-9);
        assert!(hit.normal.cross(&(hit.position - sphere.center)).norm() < 1e-9);
        assert!(hit.front_face);
    }

    #[test]
    fn grazing_hit() {
        let sphere = Sphere::new(WorldPoint::new(1.0, 2.0, 3.0), 1.0, gray());
        let ray = Ray::new(
            WorldPoint::new(2.0, 2.0, 0.0),
            WorldVector::new(0.0, 0.0, 1.0),
            0.0,
        );

        let hit = sphere
            .hit(&ray, 0.001, FloatType::INFINITY)
            .expect("we should have a hit");
        assert!((hit.t - 3.0).abs() < 1e-6);
    }

    #[test]
    fn narrow_miss() {
        let sphere = Sphere::new(WorldPoint::new(1.0, 2.0, 3.0), 1.0, gray());
        let ray = Ray::new(
            WorldPoint::new(2.0, 2.01, 0.0),
            WorldVector::new(0.0, 0.0, 1.0),
            0.0,
        );
        assert!(sphere.hit(&ray, 0.001, FloatType::INFINITY).is_none());
    }

    #[test]
    fn hit_from_inside_prefers_the_far_root() {
        let sphere = Sphere::new(WorldPoint::new(0.0, 0.0, 0.0), 2.0, gray());
        let ray = Ray::new(
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldVector::new(0.0, 0.0, 1.0),
            0.0,
        );

        let hit = sphere
            .hit(&ray, 0.001, FloatType::INFINITY)
            .expect("we should exit the sphere");
        assert!((hit.t - 2.0).abs() < 1e-9);
        // Normal is flipped to face the origin
        assert!(!hit.front_face);
        assert!((hit.normal - WorldVector::new(0.0, 0.0, -1.0)).norm() < 1e-9);
    }

    #[test_case( 1.0,  0.0,  0.0,  0.5, 0.5 ; "positive_x")]
    #[test_case( 0.0,  1.0,  0.0,  0.5, 1.0 ; "north_pole")]
    #[test_case( 0.0, -1.0,  0.0,  0.5, 0.0 ; "south_pole")]
    #[test_case(-1.0,  0.0,  0.0,  0.0, 0.5 ; "negative_x")]
    fn sphere_uv_landmarks(x: FloatType, y: FloatType, z: FloatType, u: FloatType, v: FloatType) {
        let uv = sphere_uv(&WorldVector::new(x, y, z));
        assert!((uv.x - u).abs() < 1e-9);
        assert!((uv.y - v).abs() < 1e-9);
    }

    #[test]
    fn sphere_bounding_box_is_center_plus_minus_radius() {
        let sphere = Sphere::new(WorldPoint::new(1.0, 2.0, 3.0), 2.0, gray());
        let bbox = sphere.bounding_box();
        assert!(bbox.min == WorldPoint::new(-1.0, 0.0, 1.0));
        assert!(bbox.max == WorldPoint::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn moving_sphere_interpolates_center() {
        let sphere = MovingSphere::new(
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(4.0, 0.0, 0.0),
            0.0,
            1.0,
            1.0,
            gray(),
        );
        assert!(sphere.center(0.0) == WorldPoint::new(0.0, 0.0, 0.0));
        assert!(sphere.center(0.5) == WorldPoint::new(2.0, 0.0, 0.0));
        assert!(sphere.center(1.0) == WorldPoint::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn moving_sphere_is_hit_where_it_is_at_the_ray_time() {
        let sphere = MovingSphere::new(
            WorldPoint::new(0.0, 0.0, -5.0),
            WorldPoint::new(10.0, 0.0, -5.0),
            0.0,
            1.0,
            1.0,
            gray(),
        );

        let at_start = Ray::new(
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldVector::new(0.0, 0.0, -1.0),
            0.0,
        );
        assert!(sphere.hit(&at_start, 0.001, FloatType::INFINITY).is_some());

        let at_end = Ray::new(
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldVector::new(0.0, 0.0, -1.0),
            1.0,
        );
        assert!(sphere.hit(&at_end, 0.001, FloatType::INFINITY).is_none());
    }

    #[test]
    fn moving_sphere_box_covers_the_whole_sweep() {
        let sphere = MovingSphere::new(
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(4.0, 0.0, 0.0),
            0.0,
            1.0,
            1.0,
            gray(),
        );
        let bbox = sphere.bounding_box(0.0, 1.0);
        assert!(bbox.min == WorldPoint::new(-1.0, -1.0, -1.0));
        assert!(bbox.max == WorldPoint::new(5.0, 1.0, 1.0));
    }

    #[test]
    fn rect_hit_and_uv() {
        let rect = Rect::new(RectPlane::Xy, 1.0, 3.0, 2.0, 6.0, -2.0, gray());
        let ray = Ray::new(
            WorldPoint::new(2.0, 5.0, 0.0),
            WorldVector::new(0.0, 0.0, -1.0),
            0.0,
        );

        let hit = rect
            .hit(&ray, 0.001, FloatType::INFINITY)
            .expect("the ray points at the rectangle");
        assert!((hit.t - 2.0).abs() < 1e-9);
        assert!((hit.uv.x - 0.5).abs() < 1e-9);
        assert!((hit.uv.y - 0.75).abs() < 1e-9);
        assert!(hit.normal == WorldVector::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn rect_rejects_out_of_extent() {
        let rect = Rect::new(RectPlane::Xz, 0.0, 1.0, 0.0, 1.0, 0.0, gray());
        let ray = Ray::new(
            WorldPoint::new(2.0, 1.0, 0.5),
            WorldVector::new(0.0, -1.0, 0.0),
            0.0,
        );
        assert!(rect.hit(&ray, 0.001, FloatType::INFINITY).is_none());
    }

    #[test]
    fn rect_rejects_parallel_rays() {
        let rect = Rect::new(RectPlane::Xy, 0.0, 1.0, 0.0, 1.0, 0.0, gray());
        // In-plane ray: t would be 0/0 = NaN
        let in_plane = Ray::new(
            WorldPoint::new(-1.0, 0.5, 0.0),
            WorldVector::new(1.0, 0.0, 0.0),
            0.0,
        );
        assert!(rect.hit(&in_plane, 0.001, FloatType::INFINITY).is_none());

        // Parallel but offset: t would be infinite
        let offset = Ray::new(
            WorldPoint::new(-1.0, 0.5, 1.0),
            WorldVector::new(1.0, 0.0, 0.0),
            0.0,
        );
        assert!(rect.hit(&offset, 0.001, FloatType::INFINITY).is_none());
    }

    #[test]
    fn rect_box_is_padded_on_the_missing_axis() {
        let rect = Rect::new(RectPlane::Yz, 0.0, 2.0, 1.0, 3.0, 5.0, gray());
        let bbox = rect.bounding_box();
        assert!(bbox.min == WorldPoint::new(5.0 - RECT_PAD, 0.0, 1.0));
        assert!(bbox.max == WorldPoint::new(5.0 + RECT_PAD, 2.0, 3.0));
    }

    #[test]
    fn cuboid_box_is_exact() {
        let p0 = WorldPoint::new(0.0, 0.0, 0.0);
        let p1 = WorldPoint::new(1.0, 2.0, 3.0);
        let cuboid = Cuboid::new(p0, p1, gray());
        assert!(cuboid.bounding_box() == Aabb::new(p0, p1));
    }

    #[test]
    fn cuboid_reports_the_entry_face() {
        let mut rng = SmallRng::seed_from_u64(1);
        let cuboid = Cuboid::new(
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(2.0, 2.0, 2.0),
            gray(),
        );
        let ray = Ray::new(
            WorldPoint::new(1.0, 1.0, 5.0),
            WorldVector::new(0.0, 0.0, -1.0),
            0.0,
        );

        let hit = cuboid
            .hit(&ray, 0.001, FloatType::INFINITY, &mut rng)
            .expect("the ray runs through the box");
        // Entry at z = 2, not the exit at z = 0
        assert!((hit.t - 3.0).abs() < 1e-9);
        assert!(hit.normal == WorldVector::new(0.0, 0.0, 1.0));
        assert!(hit.front_face);
    }
}

pub mod bvh;
pub mod medium;
pub mod primitives;
pub mod transforms;

use std::sync::Arc;

use rand::Rng;
use thiserror::Error;

use crate::geometry::{Aabb, Color, FloatType, Ray, TexturePoint, WorldPoint, WorldVector};
use crate::material::Material;

pub use bvh::BvhNode;
pub use medium::ConstantMedium;
pub use primitives::{Cuboid, MovingSphere, Rect, RectPlane, Sphere};
pub use transforms::{RotateY, Translate};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("cannot compute a bounding box for an empty object list")]
    NoBoundingBox,

    #[error("cannot build a BVH over an empty object list")]
    EmptyBvh,
}

/// Result of a successful ray intersection query.
/// Transient: lives only for the duration of one integrator bounce.
pub struct HitRecord {
    pub position: WorldPoint,
    /// Unit normal, oriented against the incoming ray
    pub normal: WorldVector,
    pub t: FloatType,
    pub uv: TexturePoint,
    /// True iff the ray arrived from outside the surface
    pub front_face: bool,
    pub material: Arc<Material>,
}

impl HitRecord {
    /// Builds a record with the normal flipped to face the ray origin.
    /// `outward_normal` must be unit length.
    pub fn new(
        ray: &Ray,
        t: FloatType,
        position: WorldPoint,
        outward_normal: WorldVector,
        uv: TexturePoint,
        material: Arc<Material>,
    ) -> HitRecord {
        let front_face = ray.direction.dot(&outward_normal) < 0.0;
        HitRecord {
            position,
            normal: if front_face {
                outward_normal
            } else {
                -outward_normal
            },
            t,
            uv,
            front_face,
            material,
        }
    }
}

/// Renderable object. All geometry variants are known up front, so this is
/// a closed sum type instead of an open trait hierarchy; aggregates share
/// children through `Arc`.
pub enum Hittable {
    Sphere(Sphere),
    MovingSphere(MovingSphere),
    Rect(Rect),
    Cuboid(Cuboid),
    Translate(Translate),
    RotateY(RotateY),
    ConstantMedium(ConstantMedium),
    List(HittableList),
    Bvh(BvhNode),
}

impl Hittable {
    /// Nearest hit with `t` inside `(t_min, t_max)`, if any.
    /// The generator feeds the stochastic scattering distance of volumes.
    pub fn hit(
        &self,
        ray: &Ray,
        t_min: FloatType,
        t_max: FloatType,
        rng: &mut impl Rng,
    ) -> Option<HitRecord> {
        match self {
            Hittable::Sphere(sphere) => sphere.hit(ray, t_min, t_max),
            Hittable::MovingSphere(sphere) => sphere.hit(ray, t_min, t_max),
            Hittable::Rect(rect) => rect.hit(ray, t_min, t_max),
            Hittable::Cuboid(cuboid) => cuboid.hit(ray, t_min, t_max, rng),
            Hittable::Translate(translate) => translate.hit(ray, t_min, t_max, rng),
            Hittable::RotateY(rotate) => rotate.hit(ray, t_min, t_max, rng),
            Hittable::ConstantMedium(medium) => medium.hit(ray, t_min, t_max, rng),
            Hittable::List(list) => list.hit(ray, t_min, t_max, rng),
            Hittable::Bvh(node) => node.hit(ray, t_min, t_max, rng),
        }
    }

    /// Bounding box over the given time interval. Fails (hard) only for
    /// empty aggregates; every concrete primitive has a box.
    pub fn bounding_box(&self, time0: FloatType, time1: FloatType) -> Result<Aabb, SceneError> {
        match self {
            Hittable::Sphere(sphere) => Ok(sphere.bounding_box()),
            Hittable::MovingSphere(sphere) => Ok(sphere.bounding_box(time0, time1)),
            Hittable::Rect(rect) => Ok(rect.bounding_box()),
            Hittable::Cuboid(cuboid) => Ok(cuboid.bounding_box()),
            Hittable::Translate(translate) => translate.bounding_box(time0, time1),
            Hittable::RotateY(rotate) => Ok(rotate.bounding_box()),
            Hittable::ConstantMedium(medium) => medium.bounding_box(time0, time1),
            Hittable::List(list) => list.bounding_box(time0, time1),
            Hittable::Bvh(node) => Ok(node.bounding_box()),
        }
    }
}

impl From<Sphere> for Hittable {
    fn from(value: Sphere) -> Hittable {
        Hittable::Sphere(value)
    }
}

impl From<MovingSphere> for Hittable {
    fn from(value: MovingSphere) -> Hittable {
        Hittable::MovingSphere(value)
    }
}

impl From<Rect> for Hittable {
    fn from(value: Rect) -> Hittable {
        Hittable::Rect(value)
    }
}

impl From<Cuboid> for Hittable {
    fn from(value: Cuboid) -> Hittable {
        Hittable::Cuboid(value)
    }
}

impl From<Translate> for Hittable {
    fn from(value: Translate) -> Hittable {
        Hittable::Translate(value)
    }
}

impl From<RotateY> for Hittable {
    fn from(value: RotateY) -> Hittable {
        Hittable::RotateY(value)
    }
}

impl From<ConstantMedium> for Hittable {
    fn from(value: ConstantMedium) -> Hittable {
        Hittable::ConstantMedium(value)
    }
}

impl From<HittableList> for Hittable {
    fn from(value: HittableList) -> Hittable {
        Hittable::List(value)
    }
}

impl From<BvhNode> for Hittable {
    fn from(value: BvhNode) -> Hittable {
        Hittable::Bvh(value)
    }
}

/// Unordered aggregate; linear-scan fallback and the input to BVH building.
#[derive(Clone, Default)]
pub struct HittableList {
    pub objects: Vec<Arc<Hittable>>,
}

impl HittableList {
    pub fn new() -> HittableList {
        HittableList::default()
    }

    pub fn add(&mut self, object: impl Into<Hittable>) {
        self.objects.push(Arc::new(object.into()));
    }

    pub fn add_shared(&mut self, object: Arc<Hittable>) {
        self.objects.push(object);
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn hit(
        &self,
        ray: &Ray,
        t_min: FloatType,
        t_max: FloatType,
        rng: &mut impl Rng,
    ) -> Option<HitRecord> {
        let mut closest_so_far = t_max;
        let mut closest_hit = None;

        for object in &self.objects {
            if let Some(hit) = object.hit(ray, t_min, closest_so_far, rng) {
                closest_so_far = hit.t;
                closest_hit = Some(hit);
            }
        }

        closest_hit
    }

    pub fn bounding_box(&self, time0: FloatType, time1: FloatType) -> Result<Aabb, SceneError> {
        let mut objects = self.objects.iter();
        let first = objects.next().ok_or(SceneError::NoBoundingBox)?;

        let mut result = first.bounding_box(time0, time1)?;
        for object in objects {
            result = Aabb::surrounding_box(&result, &object.bounding_box(time0, time1)?);
        }
        Ok(result)
    }
}

pub struct Scene {
    pub root: Hittable,
    /// Radiance returned for rays that escape the scene
    pub background: Color,
}

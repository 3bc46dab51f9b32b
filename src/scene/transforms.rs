use std::sync::Arc;

use rand::Rng;

use crate::geometry::{Aabb, FloatType, Ray, WorldPoint, WorldVector};
use crate::util::degrees_to_radians;

use super::{HitRecord, Hittable, SceneError};

/// Moves a child geometry by a fixed offset by shifting rays the other way.
pub struct Translate {
    child: Arc<Hittable>,
    offset: WorldVector,
}

impl Translate {
    pub fn new(child: Arc<Hittable>, offset: WorldVector) -> Translate {
        Translate { child, offset }
    }

    pub fn hit(
        &self,
        ray: &Ray,
        t_min: FloatType,
        t_max: FloatType,
        rng: &mut impl Rng,
    ) -> Option<HitRecord> {
        let moved = Ray {
            origin: ray.origin - self.offset,
            ..*ray
        };
        let mut hit = self.child.hit(&moved, t_min, t_max, rng)?;
        hit.position += self.offset;
        Some(hit)
    }

    pub fn bounding_box(&self, time0: FloatType, time1: FloatType) -> Result<Aabb, SceneError> {
        let child_box = self.child.bounding_box(time0, time1)?;
        Ok(Aabb::new(
            child_box.min + self.offset,
            child_box.max + self.offset,
        ))
    }
}

/// Rotates a child geometry around the Y axis by a fixed angle.
///
/// The world-space bounding box is derived once at construction by rotating
/// all eight corners of the child's box and taking componentwise extrema,
/// so a missing child box fails the build instead of the render.
pub struct RotateY {
    child: Arc<Hittable>,
    sin_theta: FloatType,
    cos_theta: FloatType,
    bbox: Aabb,
}

impl RotateY {
    pub fn new(child: Arc<Hittable>, angle_degrees: FloatType) -> Result<RotateY, SceneError> {
        let radians = degrees_to_radians(angle_degrees);
        let sin_theta = radians.sin();
        let cos_theta = radians.cos();

        let child_box = child.bounding_box(0.0, 1.0)?;

        let mut min = WorldPoint::from(WorldVector::repeat(FloatType::INFINITY));
        let mut max = WorldPoint::from(WorldVector::repeat(FloatType::NEG_INFINITY));
        for corner in corners(&child_box) {
            let rotated = WorldPoint::new(
                cos_theta * corner.x + sin_theta * corner.z,
                corner.y,
                -sin_theta * corner.x + cos_theta * corner.z,
            );
            min = min.coords.inf(&rotated.coords).into();
            max = max.coords.sup(&rotated.coords).into();
        }

        Ok(RotateY {
            child,
            sin_theta,
            cos_theta,
            bbox: Aabb::new(min, max),
        })
    }

    pub fn hit(
        &self,
        ray: &Ray,
        t_min: FloatType,
        t_max: FloatType,
        rng: &mut impl Rng,
    ) -> Option<HitRecord> {
        let rotated = Ray {
            origin: self.to_object(&ray.origin),
            direction: self.to_object_vector(&ray.direction),
            time: ray.time,
        };

        let mut hit = self.child.hit(&rotated, t_min, t_max, rng)?;
        hit.position = self.to_world(&hit.position);
        hit.normal = self.to_world_vector(&hit.normal);
        Some(hit)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox.clone()
    }

    fn to_object(&self, p: &WorldPoint) -> WorldPoint {
        WorldPoint::new(
            self.cos_theta * p.x - self.sin_theta * p.z,
            p.y,
            self.sin_theta * p.x + self.cos_theta * p.z,
        )
    }

    fn to_object_vector(&self, v: &WorldVector) -> WorldVector {
        self.to_object(&WorldPoint::from(*v)).coords
    }

    fn to_world(&self, p: &WorldPoint) -> WorldPoint {
        WorldPoint::new(
            self.cos_theta * p.x + self.sin_theta * p.z,
            p.y,
            -self.sin_theta * p.x + self.cos_theta * p.z,
        )
    }

    fn to_world_vector(&self, v: &WorldVector) -> WorldVector {
        self.to_world(&WorldPoint::from(*v)).coords
    }
}

fn corners(bbox: &Aabb) -> [WorldPoint; 8] {
    let mut result = [WorldPoint::origin(); 8];
    for (index, corner) in result.iter_mut().enumerate() {
        *corner = WorldPoint::new(
            if index & 1 == 0 { bbox.min.x } else { bbox.max.x },
            if index & 2 == 0 { bbox.min.y } else { bbox.max.y },
            if index & 4 == 0 { bbox.min.z } else { bbox.max.z },
        );
    }
    result
}

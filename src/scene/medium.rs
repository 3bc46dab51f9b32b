use std::sync::Arc;

use rand::Rng;

use crate::geometry::{Aabb, Color, FloatType, Ray, TexturePoint, WorldVector};
use crate::material::Material;
use crate::texture::Texture;

use super::{HitRecord, Hittable, SceneError};

/// Participating medium (fog/smoke) of uniform density inside a boundary
/// geometry. A ray scatters after a stochastic free path; the boundary must
/// be convex enough to report one entry and one exit per ray.
pub struct ConstantMedium {
    boundary: Arc<Hittable>,
    phase_function: Arc<Material>,
    neg_inv_density: FloatType,
}

impl ConstantMedium {
    pub fn new(
        boundary: Arc<Hittable>,
        density: FloatType,
        albedo: Arc<Texture>,
    ) -> ConstantMedium {
        ConstantMedium {
            boundary,
            phase_function: Material::isotropic(albedo),
            neg_inv_density: -1.0 / density,
        }
    }

    pub fn with_color(boundary: Arc<Hittable>, density: FloatType, color: Color) -> ConstantMedium {
        Self::new(boundary, density, Texture::solid(color))
    }

    pub fn hit(
        &self,
        ray: &Ray,
        t_min: FloatType,
        t_max: FloatType,
        rng: &mut impl Rng,
    ) -> Option<HitRecord> {
        // Two separate queries so the entry and exit records stay distinct
        let mut entry =
            self.boundary
                .hit(ray, FloatType::NEG_INFINITY, FloatType::INFINITY, rng)?;
        let mut exit = self
            .boundary
            .hit(ray, entry.t + 1e-4, FloatType::INFINITY, rng)?;

        entry.t = entry.t.max(t_min);
        exit.t = exit.t.min(t_max);
        if entry.t >= exit.t {
            return None;
        }
        entry.t = entry.t.max(0.0);

        // Ray directions are unit length, so t differences are distances
        let distance_inside_boundary = exit.t - entry.t;
        let hit_distance = self.neg_inv_density * rng.random::<FloatType>().ln();
        if hit_distance > distance_inside_boundary {
            return None;
        }

        let t = entry.t + hit_distance;
        Some(HitRecord {
            position: ray.point_at(t),
            normal: WorldVector::new(1.0, 0.0, 0.0), // arbitrary: there is no surface
            t,
            uv: TexturePoint::origin(),
            front_face: true, // also arbitrary
            material: Arc::clone(&self.phase_function),
        })
    }

    pub fn bounding_box(&self, time0: FloatType, time1: FloatType) -> Result<Aabb, SceneError> {
        self.boundary.bounding_box(time0, time1)
    }
}

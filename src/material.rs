use std::sync::Arc;

use rand::Rng;
use rand_distr::{Distribution as _, UnitBall, UnitSphere};

use crate::geometry::{BLACK, Color, EPSILON, FloatType, Ray, TexturePoint, WorldPoint, WorldVector};
use crate::scene::HitRecord;
use crate::texture::Texture;

/// Surface (or phase function) response to an incoming ray.
/// Closed set of variants, shared between geometries via `Arc`.
pub enum Material {
    Lambertian { albedo: Arc<Texture> },
    Metal { albedo: Color, fuzz: FloatType },
    Dielectric { refractive_index: FloatType },
    DiffuseLight { emit: Arc<Texture> },
    Isotropic { albedo: Arc<Texture> },
}

pub struct ScatterRecord {
    pub attenuation: Color,
    pub scattered: Ray,
}

impl Material {
    pub fn lambertian(albedo: Color) -> Arc<Material> {
        Self::lambertian_textured(Texture::solid(albedo))
    }

    pub fn lambertian_textured(albedo: Arc<Texture>) -> Arc<Material> {
        Arc::new(Material::Lambertian { albedo })
    }

    pub fn metal(albedo: Color, fuzz: FloatType) -> Arc<Material> {
        Arc::new(Material::Metal { albedo, fuzz })
    }

    pub fn dielectric(refractive_index: FloatType) -> Arc<Material> {
        Arc::new(Material::Dielectric { refractive_index })
    }

    pub fn diffuse_light(emit: Color) -> Arc<Material> {
        Arc::new(Material::DiffuseLight {
            emit: Texture::solid(emit),
        })
    }

    pub fn isotropic(albedo: Arc<Texture>) -> Arc<Material> {
        Arc::new(Material::Isotropic { albedo })
    }

    /// Produces the outgoing ray and its attenuation, or `None` when the
    /// incoming ray is absorbed (or the material is emission-only).
    pub fn scatter(
        &self,
        ray: &Ray,
        hit: &HitRecord,
        rng: &mut impl Rng,
    ) -> Option<ScatterRecord> {
        match self {
            Material::Lambertian { albedo } => {
                let mut direction = hit.normal + random_unit_vector(rng);
                // The random vector can cancel the normal almost exactly
                if direction.norm_squared() < EPSILON {
                    direction = hit.normal;
                }
                Some(ScatterRecord {
                    attenuation: albedo.value(&hit.uv, &hit.position),
                    scattered: Ray::new(hit.position, direction, ray.time),
                })
            }
            Material::Metal { albedo, fuzz } => {
                let reflected = reflect(&ray.direction, &hit.normal);
                let direction = reflected + random_in_unit_ball(rng) * *fuzz;
                if direction.dot(&hit.normal) <= 0.0 {
                    // Fuzzing pushed the ray into the surface, absorb it
                    return None;
                }
                Some(ScatterRecord {
                    attenuation: *albedo,
                    scattered: Ray::new(hit.position, direction, ray.time),
                })
            }
            Material::Dielectric { refractive_index } => {
                let ratio = if hit.front_face {
                    1.0 / refractive_index
                } else {
                    *refractive_index
                };

                let cos_theta = (-ray.direction).dot(&hit.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

                let total_internal_reflection = ratio * sin_theta > 1.0;
                let direction = if total_internal_reflection
                    || rng.random::<FloatType>() < schlick(cos_theta, ratio)
                {
                    reflect(&ray.direction, &hit.normal)
                } else {
                    refract(&ray.direction, &hit.normal, ratio)
                };

                Some(ScatterRecord {
                    attenuation: Color::new(1.0, 1.0, 1.0),
                    scattered: Ray::new(hit.position, direction, ray.time),
                })
            }
            Material::DiffuseLight { .. } => None,
            Material::Isotropic { albedo } => Some(ScatterRecord {
                attenuation: albedo.value(&hit.uv, &hit.position),
                scattered: Ray::new(hit.position, random_unit_vector(rng), ray.time),
            }),
        }
    }

    /// Radiance emitted at the hit point; zero for everything but lights.
    pub fn emitted(&self, uv: &TexturePoint, position: &WorldPoint) -> Color {
        match self {
            Material::DiffuseLight { emit } => emit.value(uv, position),
            _ => BLACK,
        }
    }
}

pub fn random_unit_vector(rng: &mut impl Rng) -> WorldVector {
    let v: [FloatType; 3] = UnitSphere.sample(rng);
    WorldVector::new(v[0], v[1], v[2])
}

pub fn random_in_unit_ball(rng: &mut impl Rng) -> WorldVector {
    let v: [FloatType; 3] = UnitBall.sample(rng);
    WorldVector::new(v[0], v[1], v[2])
}

fn reflect(v: &WorldVector, normal: &WorldVector) -> WorldVector {
    v - normal * (2.0 * v.dot(normal))
}

fn refract(v: &WorldVector, normal: &WorldVector, etai_over_etat: FloatType) -> WorldVector {
    let cos_theta = (-v).dot(normal).min(1.0);
    let out_perpendicular = (v + normal * cos_theta) * etai_over_etat;
    let out_parallel = normal * -(1.0 - out_perpendicular.norm_squared()).abs().sqrt();
    out_perpendicular + out_parallel
}

/// Schlick approximation of Fresnel reflectance.
pub fn schlick(cosine: FloatType, refractive_index: FloatType) -> FloatType {
    let r0 = ((1.0 - refractive_index) / (1.0 + refractive_index)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

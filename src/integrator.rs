use rand::Rng;

use crate::geometry::{BLACK, Color, FloatType, Ray};
use crate::scene::Hittable;

/// Lower bound of every intersection window; skipping the immediate
/// neighborhood of the ray origin avoids self-intersection ("shadow acne")
/// caused by floating point error in scattered ray origins.
const T_MIN: FloatType = 1e-3;

/// Recursive Monte-Carlo light transport: emitted radiance plus the
/// attenuated contribution of one scattered ray, down to a fixed bounce
/// budget. Exhausting the budget returns black, a deliberate energy-loss
/// approximation.
pub fn ray_color(
    ray: &Ray,
    background: Color,
    world: &Hittable,
    depth: u32,
    rng: &mut impl Rng,
) -> Color {
    if depth == 0 {
        return BLACK;
    }

    let Some(hit) = world.hit(ray, T_MIN, FloatType::INFINITY, rng) else {
        return background;
    };

    let emitted = hit.material.emitted(&hit.uv, &hit.position);

    let Some(scatter) = hit.material.scatter(ray, &hit, rng) else {
        return emitted;
    };

    emitted
        + scatter.attenuation * ray_color(&scatter.scattered, background, world, depth - 1, rng)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::{WorldPoint, WorldVector};
    use crate::material::Material;
    use crate::scene::{Hittable, HittableList, Sphere};
    use assert2::assert;
    use rand::SeedableRng as _;
    use rand::rngs::SmallRng;

    fn single_sphere_world(material: std::sync::Arc<Material>) -> Hittable {
        let mut list = HittableList::new();
        list.add(Sphere::new(WorldPoint::new(0.0, 0.0, -5.0), 1.0, material));
        Hittable::from(list)
    }

    fn toward_sphere() -> Ray {
        Ray::new(
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldVector::new(0.0, 0.0, -1.0),
            0.0,
        )
    }

    #[test]
    fn exhausted_depth_is_black() {
        let mut rng = SmallRng::seed_from_u64(1);
        let world = single_sphere_world(Material::lambertian(Color::new(0.9, 0.9, 0.9)));
        let background = Color::new(0.7, 0.8, 1.0);

        let color = ray_color(&toward_sphere(), background, &world, 0, &mut rng);
        assert!(color == BLACK);
    }

    #[test]
    fn miss_returns_the_background() {
        let mut rng = SmallRng::seed_from_u64(2);
        let world = single_sphere_world(Material::lambertian(Color::new(0.9, 0.9, 0.9)));
        let background = Color::new(0.7, 0.8, 1.0);

        let away = Ray::new(
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldVector::new(0.0, 0.0, 1.0),
            0.0,
        );
        let color = ray_color(&away, background, &world, 50, &mut rng);
        assert!(color == background);
    }

    #[test]
    fn emitters_contribute_their_radiance() {
        let mut rng = SmallRng::seed_from_u64(3);
        let world = single_sphere_world(Material::diffuse_light(Color::new(4.0, 3.0, 2.0)));

        let color = ray_color(&toward_sphere(), BLACK, &world, 50, &mut rng);
        assert!(color == Color::new(4.0, 3.0, 2.0));
    }

    #[test]
    fn dark_closed_path_converges_to_black() {
        let mut rng = SmallRng::seed_from_u64(4);
        // Diffuse sphere, black background, no emitters: only losses
        let world = single_sphere_world(Material::lambertian(Color::new(0.5, 0.5, 0.5)));

        for _ in 0..16 {
            let color = ray_color(&toward_sphere(), BLACK, &world, 8, &mut rng);
            assert!(color.r >= 0.0 && color.g >= 0.0 && color.b >= 0.0);
            assert!(color.r <= 1.0 && color.g <= 1.0 && color.b <= 1.0);
        }
    }
}

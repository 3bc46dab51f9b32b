use assert2::assert;
use bon::bon;
use rand::Rng;
use rand_distr::Distribution as _;

use crate::geometry::{EPSILON, FloatType, Ray, ScreenPoint, ScreenSize, WorldPoint, WorldVector};
use crate::util::degrees_to_radians;

/// Thin-lens look-at camera with a shutter interval for motion blur.
#[derive(Clone, Debug)]
pub struct Camera {
    origin: WorldPoint,
    lower_left_corner: WorldPoint,
    horizontal: WorldVector,
    vertical: WorldVector,

    u: WorldVector,
    v: WorldVector,

    lens_radius: FloatType,
    time0: FloatType,
    time1: FloatType,

    resolution: ScreenSize,
}

#[bon]
impl Camera {
    #[builder]
    pub fn new(
        look_from: WorldPoint,
        look_at: WorldPoint,
        up: WorldVector,
        /// Vertical field of view in degrees
        vertical_fov: FloatType,
        resolution: ScreenSize,
        aperture: FloatType,
        focus_distance: FloatType,
        #[builder(default = 0.0)] time0: FloatType,
        #[builder(default = 0.0)] time1: FloatType,
    ) -> Self {
        assert!(resolution.x > 0);
        assert!(resolution.y > 0);
        assert!(vertical_fov > 0.0);
        assert!(aperture >= 0.0);
        assert!(focus_distance > 0.0);
        assert!(time0 <= time1);

        let aspect_ratio = resolution.x as FloatType / resolution.y as FloatType;
        let theta = degrees_to_radians(vertical_fov);
        let viewport_height = 2.0 * (theta / 2.0).tan();
        let viewport_width = aspect_ratio * viewport_height;

        let w = (look_from - look_at)
            .try_normalize(EPSILON)
            .expect("look_from and look_at must differ");
        let u = up
            .cross(&w)
            .try_normalize(EPSILON)
            .expect("`up` and the view direction must be linearly independent");
        let v = w.cross(&u);

        let horizontal = u * (focus_distance * viewport_width);
        let vertical = v * (focus_distance * viewport_height);
        let lower_left_corner =
            look_from - horizontal / 2.0 - vertical / 2.0 - w * focus_distance;

        Camera {
            origin: look_from,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            lens_radius: aperture / 2.0,
            time0,
            time1,
            resolution,
        }
    }
}

impl Camera {
    pub fn get_resolution(&self) -> ScreenSize {
        self.resolution
    }

    /// Samples a new ray for the given image pixel: jitters inside the
    /// pixel, samples the lens disc and draws a shutter time.
    pub fn sample_ray(&self, point: &ScreenPoint, rng: &mut impl Rng) -> Ray {
        let s = (point.x as FloatType + rng.random_range(0.0..1.0))
            / (self.resolution.x - 1) as FloatType;
        // Image y runs downward, film v runs upward
        let t = 1.0
            - (point.y as FloatType + rng.random_range(0.0..1.0))
                / (self.resolution.y - 1) as FloatType;

        let lens_uv: [FloatType; 2] = rand_distr::UnitDisc.sample(rng);
        let offset = self.u * (self.lens_radius * lens_uv[0])
            + self.v * (self.lens_radius * lens_uv[1]);

        let time = if self.time0 == self.time1 {
            self.time0
        } else {
            rng.random_range(self.time0..self.time1)
        };

        let film_point = self.lower_left_corner + self.horizontal * s + self.vertical * t;
        let lens_point = self.origin + offset;

        Ray::new(lens_point, film_point - lens_point, time)
    }
}

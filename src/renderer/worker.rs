use image::RgbaImage;
use rand::{SeedableRng, rngs::SmallRng};

use crate::{
    camera::Camera,
    geometry::ScreenPoint,
    integrator::ray_color,
    renderer::RenderSettings,
    scene::Scene,
    screen_block::ScreenBlock,
    util::Rgba,
};

pub struct Worker {
    rng: SmallRng,
}

impl Worker {
    pub fn new(_worker_id: usize) -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    pub fn render_tile(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        settings: &RenderSettings,
        tile: &ScreenBlock,
        buffer: &mut RgbaImage,
    ) {
        for point in tile.internal_points() {
            let mut pixel_sum = Rgba::new(0.0, 0.0, 0.0, 0.0);
            for _i in 0..settings.sample_count.get() {
                pixel_sum += self.render_sample(scene, camera, settings, &point);
            }
            let pixel = pixel_sum * (1.0 / settings.sample_count.get() as f32);

            let buffer_position = point - tile.min;
            buffer.put_pixel(buffer_position.x, buffer_position.y, color_to_image(pixel));
        }
    }

    fn render_sample(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        settings: &RenderSettings,
        point: &ScreenPoint,
    ) -> Rgba {
        let ray = camera.sample_ray(point, &mut self.rng);
        let color = ray_color(
            &ray,
            scene.background,
            &scene.root,
            settings.max_depth,
            &mut self.rng,
        );
        Rgba::new(color.r as f32, color.g as f32, color.b as f32, 1.0)
    }
}

/// Maps a linear 0-1 f32 rgba pixel to a gamma 2 pixel type compatible with module image.
pub fn color_to_image(color: Rgba) -> image::Rgba<u8> {
    image::Rgba([
        channel_to_byte(color.r),
        channel_to_byte(color.g),
        channel_to_byte(color.b),
        (color.a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

fn channel_to_byte(value: f32) -> u8 {
    // A sample can come back NaN (0 * infinity in the integrator); max() maps
    // both NaN and negative values to black
    let value = value.max(0.0);
    (value.sqrt() * 255.0).round().clamp(0.0, 255.0) as u8
}

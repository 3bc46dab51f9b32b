use std::sync::Arc;

use image::RgbImage;
use noise::{NoiseFn, Perlin};

use crate::geometry::{Color, FloatType, TexturePoint, WorldPoint};

/// Color source sampled by materials at a hit point.
/// Closed set of variants, shared between materials via `Arc`.
pub enum Texture {
    SolidColor(Color),
    Checker {
        odd: Arc<Texture>,
        even: Arc<Texture>,
    },
    Noise {
        perlin: Perlin,
        scale: FloatType,
    },
    Image(RgbImage),
}

impl Texture {
    pub fn solid(color: Color) -> Arc<Texture> {
        Arc::new(Texture::SolidColor(color))
    }

    pub fn checker(odd: Color, even: Color) -> Arc<Texture> {
        Arc::new(Texture::Checker {
            odd: Texture::solid(odd),
            even: Texture::solid(even),
        })
    }

    pub fn noise(scale: FloatType, seed: u32) -> Arc<Texture> {
        Arc::new(Texture::Noise {
            perlin: Perlin::new(seed),
            scale,
        })
    }

    pub fn image(image: RgbImage) -> Arc<Texture> {
        Arc::new(Texture::Image(image))
    }

    pub fn value(&self, uv: &TexturePoint, position: &WorldPoint) -> Color {
        match self {
            Texture::SolidColor(color) => *color,
            Texture::Checker { odd, even } => {
                let sines = (10.0 * position.x).sin()
                    * (10.0 * position.y).sin()
                    * (10.0 * position.z).sin();
                if sines < 0.0 {
                    odd.value(uv, position)
                } else {
                    even.value(uv, position)
                }
            }
            Texture::Noise { perlin, scale } => {
                let phase = scale * position.z + 10.0 * turbulence(perlin, position, 7);
                Color::new(1.0, 1.0, 1.0) * (0.5 * (1.0 + phase.sin()))
            }
            Texture::Image(image) => image_value(image, uv),
        }
    }
}

/// Sum of progressively smaller octaves of Perlin noise.
fn turbulence(perlin: &Perlin, position: &WorldPoint, depth: u32) -> FloatType {
    let mut accumulated = 0.0;
    let mut p = position.coords;
    let mut weight = 1.0;

    for _ in 0..depth {
        accumulated += weight * perlin.get([p.x, p.y, p.z]);
        weight *= 0.5;
        p *= 2.0;
    }

    accumulated.abs()
}

fn image_value(image: &RgbImage, uv: &TexturePoint) -> Color {
    if image.width() == 0 || image.height() == 0 {
        // Missing texture data is flagged loudly instead of failing the render.
        return Color::new(0.0, 1.0, 1.0);
    }

    let u = uv.x.clamp(0.0, 1.0);
    let v = 1.0 - uv.y.clamp(0.0, 1.0); // image y runs downward

    let x = ((u * image.width() as FloatType) as u32).min(image.width() - 1);
    let y = ((v * image.height() as FloatType) as u32).min(image.height() - 1);

    let texel = image.get_pixel(x, y);
    let scale = 1.0 / 255.0;
    Color::new(
        scale * texel[0] as FloatType,
        scale * texel[1] as FloatType,
        scale * texel[2] as FloatType,
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;

    #[test]
    fn solid_ignores_position() {
        let texture = Texture::solid(Color::new(0.1, 0.2, 0.3));
        let a = texture.value(&TexturePoint::new(0.0, 0.0), &WorldPoint::new(0.0, 0.0, 0.0));
        let b = texture.value(&TexturePoint::new(0.7, 0.3), &WorldPoint::new(5.0, -3.0, 2.0));
        assert!(a == Color::new(0.1, 0.2, 0.3));
        assert!(b == a);
    }

    #[test]
    fn checker_alternates_with_sine_sign() {
        let odd = Color::new(1.0, 0.0, 0.0);
        let even = Color::new(0.0, 1.0, 0.0);
        let texture = Texture::checker(odd, even);
        let uv = TexturePoint::new(0.0, 0.0);

        // sin(10 * 0.05)^3 > 0, all components positive
        assert!(texture.value(&uv, &WorldPoint::new(0.05, 0.05, 0.05)) == even);
        // flipping one coordinate flips the sign
        assert!(texture.value(&uv, &WorldPoint::new(-0.05, 0.05, 0.05)) == odd);
    }

    #[test]
    fn noise_is_bounded() {
        let texture = Texture::noise(4.0, 7);
        let uv = TexturePoint::new(0.0, 0.0);
        for i in 0..100 {
            let p = WorldPoint::new(i as FloatType * 0.37, i as FloatType * 0.11, i as FloatType);
            let c = texture.value(&uv, &p);
            assert!(c.r >= 0.0 && c.r <= 1.0);
            assert!(c.r == c.g && c.g == c.b);
        }
    }

    #[test]
    fn image_nearest_texel_lookup() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        img.put_pixel(1, 0, image::Rgb([0, 255, 0]));
        img.put_pixel(0, 1, image::Rgb([0, 0, 255]));
        img.put_pixel(1, 1, image::Rgb([255, 255, 255]));
        let texture = Texture::image(img);
        let p = WorldPoint::new(0.0, 0.0, 0.0);

        // v = 1 maps to the top image row
        let top_left = texture.value(&TexturePoint::new(0.0, 1.0), &p);
        assert!(top_left == Color::new(1.0, 0.0, 0.0));
        let bottom_right = texture.value(&TexturePoint::new(0.9, 0.1), &p);
        assert!(bottom_right == Color::new(1.0, 1.0, 1.0));
    }
}

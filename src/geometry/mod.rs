mod aabb;

pub use aabb::Aabb;

pub type FloatType = f64;

pub const EPSILON: FloatType = 1e-8;

pub type ScreenPoint = nalgebra::Point2<u32>;
pub type ScreenSize = nalgebra::Vector2<u32>;

pub type WorldPoint = nalgebra::Point3<FloatType>;
pub type WorldVector = nalgebra::Vector3<FloatType>;
pub type TexturePoint = nalgebra::Point2<FloatType>;

pub type Color = rgb::RGB<FloatType>;

pub const BLACK: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
};

#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: WorldPoint,
    /// Normalized direction of the ray
    pub direction: WorldVector,
    /// Time within the camera shutter interval this ray was cast at
    pub time: FloatType,
}

impl Ray {
    pub fn new(origin: WorldPoint, direction: WorldVector, time: FloatType) -> Ray {
        Ray {
            origin,
            direction: direction.normalize(),
            time,
        }
    }

    pub fn point_at(&self, distance: FloatType) -> WorldPoint {
        self.origin + self.direction * distance
    }
}

pub type Rgba = rgb::RGBA<f32>;

pub fn degrees_to_radians(degrees: crate::geometry::FloatType) -> crate::geometry::FloatType {
    degrees * std::f64::consts::PI / 180.0
}

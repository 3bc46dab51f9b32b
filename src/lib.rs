mod camera;
pub mod geometry;
mod integrator;
pub mod material;
mod renderer;
pub mod scene;
pub mod scenes;
mod screen_block;
pub mod texture;
mod util;

pub use camera::Camera;
pub use integrator::ray_color;
pub use renderer::{Progress, RenderProgress, RenderSettings, render};
pub use scene::{Scene, SceneError};
pub use screen_block::ScreenBlock;

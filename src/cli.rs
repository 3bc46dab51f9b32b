use std::num::NonZeroU32;

use anyhow::{Context as _, bail};
use indicatif::ProgressBar;
use rand::{SeedableRng as _, rngs::SmallRng};

use lucent::{
    Camera, RenderSettings, Scene,
    geometry::{ScreenSize, WorldPoint, WorldVector},
    render, scenes,
};

const SCENE_NAMES: &[&str] = &[
    "random_scene",
    "two_spheres",
    "two_perlin_spheres",
    "simple_light",
    "cornell_box",
    "cornell_smoke",
    "final_scene",
];

fn setup(name: &str, rng: &mut SmallRng) -> anyhow::Result<(Scene, Camera)> {
    let wide = ScreenSize::new(800, 450);
    let square = ScreenSize::new(600, 600);

    let looking_at_origin = Camera::builder()
        .look_from(WorldPoint::new(13.0, 2.0, 3.0))
        .look_at(WorldPoint::new(0.0, 0.0, 0.0))
        .up(WorldVector::new(0.0, 1.0, 0.0))
        .vertical_fov(20.0)
        .resolution(wide)
        .focus_distance(10.0);
    let cornell_view = Camera::builder()
        .look_from(WorldPoint::new(278.0, 278.0, -800.0))
        .look_at(WorldPoint::new(278.0, 278.0, 0.0))
        .up(WorldVector::new(0.0, 1.0, 0.0))
        .vertical_fov(40.0)
        .resolution(square)
        .aperture(0.0)
        .focus_distance(10.0);

    Ok(match name {
        "random_scene" => (
            scenes::random_scene(rng)?,
            looking_at_origin.aperture(0.1).time1(1.0).build(),
        ),
        "two_spheres" => (scenes::two_spheres(rng)?, looking_at_origin.aperture(0.0).build()),
        "two_perlin_spheres" => (
            scenes::two_perlin_spheres(rng)?,
            looking_at_origin.aperture(0.0).build(),
        ),
        "simple_light" => (
            scenes::simple_light(rng)?,
            Camera::builder()
                .look_from(WorldPoint::new(26.0, 3.0, 6.0))
                .look_at(WorldPoint::new(0.0, 2.0, 0.0))
                .up(WorldVector::new(0.0, 1.0, 0.0))
                .vertical_fov(20.0)
                .resolution(wide)
                .aperture(0.0)
                .focus_distance(10.0)
                .build(),
        ),
        "cornell_box" => (scenes::cornell_box(rng)?, cornell_view.build()),
        "cornell_smoke" => (scenes::cornell_smoke(rng)?, cornell_view.build()),
        "final_scene" => (
            scenes::final_scene(rng)?,
            Camera::builder()
                .look_from(WorldPoint::new(478.0, 278.0, -600.0))
                .look_at(WorldPoint::new(278.0, 278.0, 0.0))
                .up(WorldVector::new(0.0, 1.0, 0.0))
                .vertical_fov(40.0)
                .resolution(square)
                .aperture(0.0)
                .focus_distance(10.0)
                .time1(1.0)
                .build(),
        ),
        _ => bail!("unknown scene {name:?}; expected one of: {}", SCENE_NAMES.join(", ")),
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let scene_name = args.next().unwrap_or_else(|| "cornell_box".to_string());
    let sample_count: u32 = match args.next() {
        Some(arg) => arg.parse().context("the sample count must be a number")?,
        None => 100,
    };
    let sample_count =
        NonZeroU32::new(sample_count).context("the sample count must be nonzero")?;

    let mut rng = SmallRng::from_os_rng();
    let (scene, camera) = setup(&scene_name, &mut rng)?;

    let settings = RenderSettings {
        tile_size: 64.try_into().unwrap(),
        sample_count,
        max_depth: 50,
    };

    let bar = ProgressBar::no_length();
    let mut render_progress = render(scene, camera, settings, |_| {}, {
        let bar = bar.clone();
        move |_, progress| {
            bar.update(|ps| {
                ps.set_len(progress.total as u64);
                ps.set_pos(progress.finished as u64)
            })
        }
    })?;
    bar.set_length(render_progress.progress().total as u64);

    render_progress.wait();
    bar.finish();

    let output = format!("{scene_name}.png");
    render_progress
        .image()
        .lock()
        .expect("all workers have finished")
        .save(&output)
        .with_context(|| format!("saving {output}"))?;
    println!("wrote {output}");

    Ok(())
}

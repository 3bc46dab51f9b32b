//! Ready-made demo scenes, from a minimal checkered-sphere setup to the
//! everything-at-once showcase. Each constructor wraps its objects in a BVH,
//! so scene building can fail if an aggregate has no bounding box.

use std::sync::Arc;

use image::RgbImage;
use itertools::Itertools as _;
use rand::Rng;

use crate::geometry::{Color, FloatType, WorldPoint, WorldVector};
use crate::material::Material;
use crate::scene::{
    BvhNode, ConstantMedium, Cuboid, Hittable, HittableList, MovingSphere, Rect, RectPlane,
    RotateY, Scene, SceneError, Sphere, Translate,
};
use crate::texture::Texture;

const SKY: Color = Color {
    r: 0.70,
    g: 0.80,
    b: 1.00,
};

fn finish(list: HittableList, background: Color, rng: &mut impl Rng) -> Result<Scene, SceneError> {
    Ok(Scene {
        root: Hittable::from(BvhNode::new(list.objects, 0.0, 1.0, rng)?),
        background,
    })
}

fn random_color(rng: &mut impl Rng, min: FloatType, max: FloatType) -> Color {
    Color::new(
        rng.random_range(min..max),
        rng.random_range(min..max),
        rng.random_range(min..max),
    )
}

/// A big checkered ground sphere, a grid of small random spheres (diffuse
/// ones bobbing upwards during the shutter interval) and three showcase
/// spheres: glass, diffuse and polished metal.
pub fn random_scene(rng: &mut impl Rng) -> Result<Scene, SceneError> {
    let mut world = HittableList::new();

    let checker = Texture::checker(Color::new(0.2, 0.5, 0.3), Color::new(0.9, 0.9, 0.3));
    world.add(Sphere::new(
        WorldPoint::new(0.0, -1000.0, 0.0),
        1000.0,
        Material::lambertian_textured(checker),
    ));

    for (a, b) in (-11..11).cartesian_product(-11..11) {
        let choose_material = rng.random::<FloatType>();
        let center = WorldPoint::new(
            a as FloatType + 0.9 * rng.random::<FloatType>(),
            0.2,
            b as FloatType + 0.9 * rng.random::<FloatType>(),
        );

        if (center - WorldPoint::new(4.0, 0.2, 0.0)).norm() <= 0.9 {
            continue;
        }

        if choose_material < 0.8 {
            let albedo = random_color(rng, 0.0, 1.0) * random_color(rng, 0.0, 1.0);
            let center1 = center + WorldVector::new(0.0, rng.random_range(0.0..0.5), 0.0);
            world.add(MovingSphere::new(
                center,
                center1,
                0.0,
                1.0,
                0.2,
                Material::lambertian(albedo),
            ));
        } else if choose_material < 0.95 {
            let albedo = random_color(rng, 0.5, 1.0);
            let fuzz = rng.random_range(0.0..0.5);
            world.add(Sphere::new(center, 0.2, Material::metal(albedo, fuzz)));
        } else {
            world.add(Sphere::new(center, 0.2, Material::dielectric(1.5)));
        }
    }

    world.add(Sphere::new(
        WorldPoint::new(0.0, 1.0, 0.0),
        1.0,
        Material::dielectric(1.5),
    ));
    world.add(Sphere::new(
        WorldPoint::new(-4.0, 1.0, 0.0),
        1.0,
        Material::lambertian(Color::new(0.4, 0.2, 0.1)),
    ));
    world.add(Sphere::new(
        WorldPoint::new(4.0, 1.0, 0.0),
        1.0,
        Material::metal(Color::new(0.7, 0.6, 0.5), 0.0),
    ));

    finish(world, SKY, rng)
}

/// Two touching checkered spheres.
pub fn two_spheres(rng: &mut impl Rng) -> Result<Scene, SceneError> {
    let mut objects = HittableList::new();

    let checker = Texture::checker(Color::new(0.2, 0.5, 0.3), Color::new(0.9, 0.9, 0.3));
    objects.add(Sphere::new(
        WorldPoint::new(0.0, -10.0, 0.0),
        10.0,
        Material::lambertian_textured(Arc::clone(&checker)),
    ));
    objects.add(Sphere::new(
        WorldPoint::new(0.0, 10.0, 0.0),
        10.0,
        Material::lambertian_textured(checker),
    ));

    finish(objects, SKY, rng)
}

/// A marble-textured sphere resting on a marble-textured ground sphere.
pub fn two_perlin_spheres(rng: &mut impl Rng) -> Result<Scene, SceneError> {
    let mut objects = HittableList::new();

    let marble = Texture::noise(4.0, rng.random());
    objects.add(Sphere::new(
        WorldPoint::new(0.0, -1000.0, 0.0),
        1000.0,
        Material::lambertian_textured(Arc::clone(&marble)),
    ));
    objects.add(Sphere::new(
        WorldPoint::new(0.0, 2.0, 0.0),
        2.0,
        Material::lambertian_textured(marble),
    ));

    finish(objects, SKY, rng)
}

/// The perlin spheres lit by a single rectangular area light in the dark.
pub fn simple_light(rng: &mut impl Rng) -> Result<Scene, SceneError> {
    let mut objects = HittableList::new();

    let marble = Texture::noise(4.0, rng.random());
    objects.add(Sphere::new(
        WorldPoint::new(0.0, -1000.0, 0.0),
        1000.0,
        Material::lambertian_textured(Arc::clone(&marble)),
    ));
    objects.add(Sphere::new(
        WorldPoint::new(0.0, 2.0, 0.0),
        2.0,
        Material::lambertian_textured(marble),
    ));

    objects.add(Rect::new(
        RectPlane::Xy,
        3.0,
        5.0,
        1.0,
        3.0,
        -2.0,
        Material::diffuse_light(Color::new(4.0, 4.0, 4.0)),
    ));

    finish(objects, Color::new(0.0, 0.0, 0.0), rng)
}

/// The walls, light and two rotated boxes of the classic Cornell box.
fn cornell_shell(light: Color) -> HittableList {
    let mut objects = HittableList::new();

    let red = Material::lambertian(Color::new(0.65, 0.05, 0.05));
    let white = Material::lambertian(Color::new(0.73, 0.73, 0.73));
    let green = Material::lambertian(Color::new(0.12, 0.45, 0.15));

    objects.add(Rect::new(RectPlane::Yz, 0.0, 555.0, 0.0, 555.0, 555.0, green));
    objects.add(Rect::new(RectPlane::Yz, 0.0, 555.0, 0.0, 555.0, 0.0, red));
    objects.add(Rect::new(
        RectPlane::Xz,
        213.0,
        343.0,
        227.0,
        332.0,
        554.0,
        Material::diffuse_light(light),
    ));
    objects.add(Rect::new(
        RectPlane::Xz,
        0.0,
        555.0,
        0.0,
        555.0,
        0.0,
        Arc::clone(&white),
    ));
    objects.add(Rect::new(
        RectPlane::Xz,
        0.0,
        555.0,
        0.0,
        555.0,
        555.0,
        Arc::clone(&white),
    ));
    objects.add(Rect::new(
        RectPlane::Xy,
        0.0,
        555.0,
        0.0,
        555.0,
        555.0,
        Arc::clone(&white),
    ));

    objects
}

fn cornell_boxes(white: Arc<Material>) -> Result<(Arc<Hittable>, Arc<Hittable>), SceneError> {
    let tall = Cuboid::new(
        WorldPoint::new(0.0, 0.0, 0.0),
        WorldPoint::new(165.0, 330.0, 165.0),
        Arc::clone(&white),
    );
    let tall = RotateY::new(Arc::new(Hittable::from(tall)), 15.0)?;
    let tall = Translate::new(
        Arc::new(Hittable::from(tall)),
        WorldVector::new(265.0, 0.0, 295.0),
    );

    let short = Cuboid::new(
        WorldPoint::new(0.0, 0.0, 0.0),
        WorldPoint::new(165.0, 165.0, 165.0),
        white,
    );
    let short = RotateY::new(Arc::new(Hittable::from(short)), -18.0)?;
    let short = Translate::new(
        Arc::new(Hittable::from(short)),
        WorldVector::new(130.0, 0.0, 65.0),
    );

    Ok((
        Arc::new(Hittable::from(tall)),
        Arc::new(Hittable::from(short)),
    ))
}

pub fn cornell_box(rng: &mut impl Rng) -> Result<Scene, SceneError> {
    let mut objects = cornell_shell(Color::new(15.0, 15.0, 15.0));

    let white = Material::lambertian(Color::new(0.73, 0.73, 0.73));
    let (tall, short) = cornell_boxes(white)?;
    objects.add_shared(tall);
    objects.add_shared(short);

    finish(objects, Color::new(0.0, 0.0, 0.0), rng)
}

/// The Cornell box with the two boxes replaced by volumes of smoke.
pub fn cornell_smoke(rng: &mut impl Rng) -> Result<Scene, SceneError> {
    let mut objects = cornell_shell(Color::new(7.0, 7.0, 7.0));

    let white = Material::lambertian(Color::new(0.73, 0.73, 0.73));
    let (tall, short) = cornell_boxes(white)?;
    objects.add(ConstantMedium::with_color(
        tall,
        0.01,
        Color::new(0.0, 0.0, 0.0),
    ));
    objects.add(ConstantMedium::with_color(
        short,
        0.01,
        Color::new(1.0, 1.0, 1.0),
    ));

    finish(objects, Color::new(0.0, 0.0, 0.0), rng)
}

/// A coarse checkered planet map; stands in for a texture that would
/// normally be decoded from an image file.
fn globe_image() -> RgbImage {
    RgbImage::from_fn(64, 32, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            image::Rgb([46, 84, 160])
        } else {
            image::Rgb([60, 140, 70])
        }
    })
}

/// The showcase: a box-grid ground, an area light, moving, glass, metal and
/// textured spheres, two participating media and a rotated cloud of small
/// spheres.
pub fn final_scene(rng: &mut impl Rng) -> Result<Scene, SceneError> {
    let mut ground_boxes = HittableList::new();
    let ground = Material::lambertian(Color::new(0.48, 0.83, 0.53));

    const BOXES_PER_SIDE: i32 = 20;
    const BOX_WIDTH: FloatType = 100.0;
    for (i, j) in (0..BOXES_PER_SIDE).cartesian_product(0..BOXES_PER_SIDE) {
        let x0 = -1000.0 + i as FloatType * BOX_WIDTH;
        let z0 = -1000.0 + j as FloatType * BOX_WIDTH;
        ground_boxes.add(Cuboid::new(
            WorldPoint::new(x0, 0.0, z0),
            WorldPoint::new(
                x0 + BOX_WIDTH,
                rng.random_range(1.0..101.0),
                z0 + BOX_WIDTH,
            ),
            Arc::clone(&ground),
        ));
    }

    let mut objects = HittableList::new();
    objects.add(BvhNode::new(ground_boxes.objects, 0.0, 1.0, rng)?);

    objects.add(Rect::new(
        RectPlane::Xz,
        123.0,
        423.0,
        147.0,
        412.0,
        554.0,
        Material::diffuse_light(Color::new(7.0, 7.0, 7.0)),
    ));

    let center0 = WorldPoint::new(400.0, 400.0, 200.0);
    let center1 = center0 + WorldVector::new(30.0, 0.0, 0.0);
    objects.add(MovingSphere::new(
        center0,
        center1,
        0.0,
        1.0,
        50.0,
        Material::lambertian(Color::new(0.7, 0.3, 0.1)),
    ));

    objects.add(Sphere::new(
        WorldPoint::new(260.0, 150.0, 45.0),
        50.0,
        Material::dielectric(1.5),
    ));
    objects.add(Sphere::new(
        WorldPoint::new(0.0, 150.0, 145.0),
        50.0,
        Material::metal(Color::new(0.8, 0.8, 0.9), 10.0),
    ));

    // The glass sphere doubles as the boundary of a subsurface medium
    let boundary = Arc::new(Hittable::from(Sphere::new(
        WorldPoint::new(360.0, 150.0, 145.0),
        70.0,
        Material::dielectric(1.5),
    )));
    objects.add_shared(Arc::clone(&boundary));
    objects.add(ConstantMedium::with_color(
        boundary,
        0.2,
        Color::new(0.2, 0.4, 0.9),
    ));

    // A thin global fog over the whole scene
    let fog_boundary = Arc::new(Hittable::from(Sphere::new(
        WorldPoint::new(0.0, 0.0, 0.0),
        5000.0,
        Material::dielectric(1.5),
    )));
    objects.add(ConstantMedium::with_color(
        fog_boundary,
        1e-4,
        Color::new(1.0, 1.0, 1.0),
    ));

    objects.add(Sphere::new(
        WorldPoint::new(400.0, 200.0, 400.0),
        100.0,
        Material::lambertian_textured(Texture::image(globe_image())),
    ));
    objects.add(Sphere::new(
        WorldPoint::new(220.0, 280.0, 300.0),
        80.0,
        Material::lambertian_textured(Texture::noise(0.1, rng.random())),
    ));

    let mut sphere_cloud = HittableList::new();
    let white = Material::lambertian(Color::new(0.73, 0.73, 0.73));
    for _ in 0..1000 {
        sphere_cloud.add(Sphere::new(
            WorldPoint::new(
                rng.random_range(0.0..165.0),
                rng.random_range(0.0..165.0),
                rng.random_range(0.0..165.0),
            ),
            10.0,
            Arc::clone(&white),
        ));
    }
    let cloud = BvhNode::new(sphere_cloud.objects, 0.0, 1.0, rng)?;
    let cloud = RotateY::new(Arc::new(Hittable::from(cloud)), 15.0)?;
    objects.add(Translate::new(
        Arc::new(Hittable::from(cloud)),
        WorldVector::new(-100.0, 270.0, 395.0),
    ));

    finish(objects, Color::new(0.0, 0.0, 0.0), rng)
}

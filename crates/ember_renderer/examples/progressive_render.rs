//! Progressive render example.
//!
//! Accumulates a fixed number of frames over a small emissive scene and
//! saves the refined image as a PNG.

use anyhow::{Context, Result};
use ember_renderer::{Camera, Material, Renderer, Scene, Sphere, Vec3};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 450;
const FRAMES: u32 = 256;

fn main() -> Result<()> {
    env_logger::init();

    let scene = build_scene()?;

    let mut camera = Camera::new()
        .with_position(Vec3::new(0.0, 0.5, 6.0))
        .with_forward(Vec3::new(0.0, -0.1, -1.0))
        .with_vertical_fov(45.0);
    camera.resize(WIDTH, HEIGHT);

    let mut renderer = Renderer::new();
    renderer.config_mut().max_bounces = 5;
    renderer.resize(WIDTH, HEIGHT);

    println!(
        "Rendering {}x{}, {} accumulated frames...",
        WIDTH, HEIGHT, FRAMES
    );

    let start = std::time::Instant::now();
    for _ in 0..FRAMES {
        renderer.render(&scene, &camera);
    }
    println!("Rendered in {:?}", start.elapsed());

    // Packed pixels are 0xAABBGGRR, which is r,g,b,a in memory on
    // little-endian targets, exactly the byte order PNG RGBA wants.
    let bytes: &[u8] = bytemuck::cast_slice(renderer.pixels());
    image::save_buffer(
        "progressive_render.png",
        bytes,
        WIDTH,
        HEIGHT,
        image::ColorType::Rgba8,
    )
    .context("failed to write progressive_render.png")?;

    println!("Saved to progressive_render.png");
    Ok(())
}

fn build_scene() -> Result<Scene> {
    let mut scene = Scene::new();

    let pink = scene.add_material(Material::new(Vec3::new(1.0, 0.0, 1.0)));
    let blue = scene.add_material(Material::new(Vec3::new(0.2, 0.3, 1.0)));
    let sun = scene.add_material(
        Material::new(Vec3::new(0.8, 0.5, 0.2)).with_emission(Vec3::new(0.8, 0.5, 0.2), 2.0),
    );

    scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, 0.0), 1.0, pink))?;
    scene.add_sphere(Sphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0, sun))?;
    scene.add_sphere(Sphere::new(Vec3::new(0.0, -101.0, 0.0), 100.0, blue))?;

    Ok(scene)
}

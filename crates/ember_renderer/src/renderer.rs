//! Frame orchestration: buffer lifecycle, accumulation, pixel dispatch.
//!
//! `Renderer` owns the packed pixel buffer and the running-sum accumulation
//! buffer. Every `render` call evaluates one independent sample per pixel
//! and folds it into the running average; with accumulation enabled the
//! image refines over successive frames, otherwise each call produces a
//! fresh single-sample image.

use ember_core::{Camera, Scene};
use ember_math::Ray;
use glam::Vec4;
use rayon::prelude::*;

use crate::integrator::trace_pixel;

/// How pixels are scheduled within a frame.
///
/// Both strategies share the same per-row shading function and the seed
/// derivation depends only on pixel coordinates and the frame index, so
/// they produce byte-identical buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dispatch {
    /// Single loop over all rows
    Sequential,
    /// Rayon worker pool fanning out over rows
    #[default]
    Parallel,
}

/// Render configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Maximum ray-surface interactions per pixel per frame
    pub max_bounces: u32,
    /// Refine a running average across frames instead of starting over
    pub accumulate: bool,
    /// Pixel scheduling strategy
    pub dispatch: Dispatch,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_bounces: 2,
            accumulate: true,
            dispatch: Dispatch::Parallel,
        }
    }
}

/// Progressive path tracing renderer.
pub struct Renderer {
    config: RenderConfig,
    width: u32,
    height: u32,
    /// Packed output colors, row-major
    pixels: Vec<u32>,
    /// Per-pixel radiance sums, alpha channel carries the sample count
    accumulation: Vec<Vec4>,
    /// Samples accumulated per pixel since the last reset, starting at 1.
    /// Doubles as the averaging denominator and a seed component.
    frame_index: u32,
}

/// Read-only per-frame state shared by every row task.
struct FrameContext<'a> {
    scene: &'a Scene,
    camera: &'a Camera,
    width: u32,
    frame_index: u32,
    max_bounces: u32,
}

impl Renderer {
    /// Create a renderer with default configuration and empty buffers.
    ///
    /// Call `resize` before the first `render`.
    pub fn new() -> Self {
        Self {
            config: RenderConfig::default(),
            width: 0,
            height: 0,
            pixels: Vec::new(),
            accumulation: Vec::new(),
            frame_index: 1,
        }
    }

    /// Set the render configuration.
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Mutable configuration, for toggling accumulation between frames.
    pub fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }

    /// Ensure the render targets match the requested dimensions.
    ///
    /// No-op for identical dimensions. Otherwise both buffers are
    /// reallocated and the frame index resets, discarding any accumulated
    /// samples. Must not be called while a `render` is in flight, which the
    /// exclusive borrow already rules out.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }

        log::info!("Resizing render targets to {}x{}", width, height);

        let pixel_count = (width * height) as usize;
        self.width = width;
        self.height = height;
        self.pixels = vec![0; pixel_count];
        self.accumulation = vec![Vec4::ZERO; pixel_count];
        self.frame_index = 1;
    }

    /// Restart the running average on the next frame.
    ///
    /// For the application to call after editing the scene or moving the
    /// camera, so stale samples do not bleed into the new view.
    pub fn reset_accumulation(&mut self) {
        self.frame_index = 1;
    }

    /// Samples accumulated per pixel since the last reset.
    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    /// Render target width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Render target height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The packed pixel buffer, row-major, ready for presentation.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Render one full frame into the pixel buffer.
    ///
    /// Synchronous; returns once every pixel has been evaluated. The scene
    /// and camera are read-only for the duration of the call and the camera
    /// viewport must match the renderer's current dimensions.
    pub fn render(&mut self, scene: &Scene, camera: &Camera) {
        assert_eq!(
            (camera.width(), camera.height()),
            (self.width, self.height),
            "camera viewport must match the render targets"
        );

        if self.width == 0 || self.height == 0 {
            return;
        }

        // With accumulation off every call is a fresh single-sample frame,
        // so the frame index snaps back before it feeds the seeds and the
        // averaging denominator.
        if !self.config.accumulate {
            self.frame_index = 1;
        }
        if self.frame_index == 1 {
            self.accumulation.fill(Vec4::ZERO);
        }

        let ctx = FrameContext {
            scene,
            camera,
            width: self.width,
            frame_index: self.frame_index,
            max_bounces: self.config.max_bounces,
        };
        let row = self.width as usize;

        match self.config.dispatch {
            Dispatch::Parallel => {
                self.accumulation
                    .par_chunks_mut(row)
                    .zip(self.pixels.par_chunks_mut(row))
                    .enumerate()
                    .for_each(|(y, (acc_row, pixel_row))| {
                        shade_row(&ctx, y as u32, acc_row, pixel_row);
                    });
            }
            Dispatch::Sequential => {
                self.accumulation
                    .chunks_mut(row)
                    .zip(self.pixels.chunks_mut(row))
                    .enumerate()
                    .for_each(|(y, (acc_row, pixel_row))| {
                        shade_row(&ctx, y as u32, acc_row, pixel_row);
                    });
            }
        }

        if self.config.accumulate {
            self.frame_index += 1;
        } else {
            self.frame_index = 1;
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Shade one row of pixels: trace, accumulate, average, pack.
fn shade_row(ctx: &FrameContext, y: u32, acc_row: &mut [Vec4], pixel_row: &mut [u32]) {
    for x in 0..ctx.width {
        let ray = Ray::new(ctx.camera.position(), ctx.camera.ray_direction(x, y));

        // Deterministic function of pixel coordinate and frame index, so
        // evaluation order between pixels is never observable
        let seed = (x + y * ctx.width).wrapping_mul(ctx.frame_index);

        let radiance = trace_pixel(ray, ctx.scene, seed, ctx.max_bounces);

        let i = x as usize;
        acc_row[i] += radiance.extend(1.0);

        let average = (acc_row[i] / ctx.frame_index as f32).clamp(Vec4::ZERO, Vec4::ONE);
        pixel_row[i] = pack_rgba(average);
    }
}

/// Pack a color with channels in [0, 1] into a 32-bit value.
///
/// Channels quantize as floor(channel * 255); byte layout is alpha in bits
/// 31-24, blue 23-16, green 15-8, red 7-0. Out-of-range channels saturate.
#[inline]
pub fn pack_rgba(color: Vec4) -> u32 {
    let r = (color.x * 255.0) as u8;
    let g = (color.y * 255.0) as u8;
    let b = (color.z * 255.0) as u8;
    let a = (color.w * 255.0) as u8;

    (u32::from(a) << 24) | (u32::from(b) << 16) | (u32::from(g) << 8) | u32::from(r)
}

/// Unpack a 32-bit color back to floating point channels in [0, 1].
#[inline]
pub fn unpack_rgba(packed: u32) -> Vec4 {
    Vec4::new(
        (packed & 0xff) as f32 / 255.0,
        ((packed >> 8) & 0xff) as f32 / 255.0,
        ((packed >> 16) & 0xff) as f32 / 255.0,
        ((packed >> 24) & 0xff) as f32 / 255.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::{Material, Sphere};
    use glam::Vec3;

    /// Small emissive test scene: a lit sphere over a diffuse floor sphere.
    fn test_scene() -> Scene {
        let mut scene = Scene::new();
        let pink = scene.add_material(Material::new(Vec3::new(1.0, 0.0, 1.0)));
        let sun = scene.add_material(
            Material::new(Vec3::new(0.8, 0.5, 0.2))
                .with_emission(Vec3::new(0.8, 0.5, 0.2), 2.0),
        );

        scene
            .add_sphere(Sphere::new(Vec3::new(0.0, 0.0, 0.0), 1.0, pink))
            .unwrap();
        scene
            .add_sphere(Sphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0, sun))
            .unwrap();
        scene
            .add_sphere(Sphere::new(Vec3::new(0.0, -101.0, 0.0), 100.0, pink))
            .unwrap();
        scene
    }

    fn test_camera(width: u32, height: u32) -> Camera {
        let mut camera = Camera::new().with_position(Vec3::new(0.0, 0.0, 6.0));
        camera.resize(width, height);
        camera
    }

    #[test]
    fn test_pack_layout() {
        assert_eq!(pack_rgba(Vec4::new(1.0, 0.0, 0.0, 0.0)), 0x0000_00ff);
        assert_eq!(pack_rgba(Vec4::new(0.0, 1.0, 0.0, 0.0)), 0x0000_ff00);
        assert_eq!(pack_rgba(Vec4::new(0.0, 0.0, 1.0, 0.0)), 0x00ff_0000);
        assert_eq!(pack_rgba(Vec4::new(0.0, 0.0, 0.0, 1.0)), 0xff00_0000);
        assert_eq!(pack_rgba(Vec4::ONE), 0xffff_ffff);
    }

    #[test]
    fn test_pack_saturates_out_of_range() {
        assert_eq!(pack_rgba(Vec4::new(2.0, -1.0, 0.0, 1.5)), 0xff00_00ff);
    }

    #[test]
    fn test_pack_unpack_round_trip() {
        let colors = [
            Vec4::new(0.0, 0.0, 0.0, 0.0),
            Vec4::new(1.0, 1.0, 1.0, 1.0),
            Vec4::new(0.25, 0.5, 0.75, 1.0),
            Vec4::new(0.123, 0.456, 0.789, 0.5),
        ];

        for color in colors {
            let round_tripped = unpack_rgba(pack_rgba(color));
            for (before, after) in color.to_array().iter().zip(round_tripped.to_array()) {
                assert!((before - after).abs() <= 1.0 / 255.0);
            }
        }
    }

    #[test]
    fn test_resize_allocates_and_resets() {
        let mut renderer = Renderer::new();
        assert!(renderer.pixels().is_empty());

        renderer.resize(8, 4);
        assert_eq!(renderer.width(), 8);
        assert_eq!(renderer.height(), 4);
        assert_eq!(renderer.pixels().len(), 32);
        assert_eq!(renderer.frame_index(), 1);
    }

    #[test]
    fn test_resize_same_dimensions_is_noop() {
        let scene = test_scene();
        let camera = test_camera(8, 8);

        let mut renderer = Renderer::new();
        renderer.resize(8, 8);
        renderer.render(&scene, &camera);
        renderer.render(&scene, &camera);
        assert_eq!(renderer.frame_index(), 3);

        let pixels = renderer.pixels().to_vec();
        renderer.resize(8, 8);
        assert_eq!(renderer.frame_index(), 3);
        assert_eq!(renderer.pixels(), pixels.as_slice());
    }

    #[test]
    fn test_resize_new_dimensions_discards_accumulation() {
        let scene = test_scene();
        let camera = test_camera(8, 8);

        let mut renderer = Renderer::new();
        renderer.resize(8, 8);
        renderer.render(&scene, &camera);
        renderer.render(&scene, &camera);

        renderer.resize(16, 16);
        assert_eq!(renderer.frame_index(), 1);
        assert_eq!(renderer.pixels().len(), 256);
    }

    #[test]
    fn test_sequential_and_parallel_match() {
        let scene = test_scene();
        let camera = test_camera(16, 12);

        let mut sequential = Renderer::new().with_config(RenderConfig {
            dispatch: Dispatch::Sequential,
            ..Default::default()
        });
        let mut parallel = Renderer::new().with_config(RenderConfig {
            dispatch: Dispatch::Parallel,
            ..Default::default()
        });

        sequential.resize(16, 12);
        parallel.resize(16, 12);

        for _ in 0..3 {
            sequential.render(&scene, &camera);
            parallel.render(&scene, &camera);
            assert_eq!(sequential.pixels(), parallel.pixels());
        }
    }

    #[test]
    fn test_render_is_deterministic_without_accumulation() {
        let scene = test_scene();
        let camera = test_camera(16, 16);

        let config = RenderConfig {
            accumulate: false,
            ..Default::default()
        };

        let mut renderer = Renderer::new().with_config(config);
        renderer.resize(16, 16);

        renderer.render(&scene, &camera);
        assert_eq!(renderer.frame_index(), 1);
        let first = renderer.pixels().to_vec();

        renderer.render(&scene, &camera);
        assert_eq!(renderer.frame_index(), 1);
        assert_eq!(renderer.pixels(), first.as_slice());

        // A fresh renderer instance produces the same bytes too
        let mut other = Renderer::new().with_config(config);
        other.resize(16, 16);
        other.render(&scene, &camera);
        assert_eq!(other.pixels(), first.as_slice());
    }

    #[test]
    fn test_accumulated_average_matches_replayed_sum() {
        let scene = test_scene();
        let width = 8;
        let height = 8;
        let camera = test_camera(width, height);
        let frames = 4;

        let mut renderer = Renderer::new();
        renderer.resize(width, height);
        for _ in 0..frames {
            renderer.render(&scene, &camera);
        }
        assert_eq!(renderer.frame_index(), frames + 1);

        // Replay the per-frame estimates by hand, summing in the same order
        // the renderer did, and compare the packed result per pixel.
        for y in 0..height {
            for x in 0..width {
                let mut sum = Vec4::ZERO;
                for frame in 1..=frames {
                    let ray = Ray::new(camera.position(), camera.ray_direction(x, y));
                    let seed = (x + y * width).wrapping_mul(frame);
                    let radiance =
                        trace_pixel(ray, &scene, seed, renderer.config().max_bounces);
                    sum += radiance.extend(1.0);
                }

                let average = (sum / frames as f32).clamp(Vec4::ZERO, Vec4::ONE);
                let expected = pack_rgba(average);
                let actual = renderer.pixels()[(x + y * width) as usize];
                assert_eq!(actual, expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_disabling_accumulation_restarts_single_sample_frames() {
        let scene = test_scene();
        let camera = test_camera(8, 8);

        let mut renderer = Renderer::new();
        renderer.resize(8, 8);
        renderer.render(&scene, &camera);
        let single_sample = renderer.pixels().to_vec();

        renderer.render(&scene, &camera);
        renderer.render(&scene, &camera);

        renderer.config_mut().accumulate = false;
        renderer.render(&scene, &camera);

        // frame_index reset to 1 on the non-accumulating call, and the
        // buffer holds a fresh frame-1 image again
        assert_eq!(renderer.frame_index(), 1);
        assert_eq!(renderer.pixels(), single_sample.as_slice());
    }

    #[test]
    fn test_reset_accumulation_restarts_average() {
        let scene = test_scene();
        let camera = test_camera(8, 8);

        let mut renderer = Renderer::new();
        renderer.resize(8, 8);
        renderer.render(&scene, &camera);
        let first_frame = renderer.pixels().to_vec();

        renderer.render(&scene, &camera);
        renderer.reset_accumulation();
        assert_eq!(renderer.frame_index(), 1);

        renderer.render(&scene, &camera);
        assert_eq!(renderer.pixels(), first_frame.as_slice());
    }

    #[test]
    fn test_render_with_empty_targets_is_noop() {
        let scene = test_scene();
        let camera = Camera::new();

        let mut renderer = Renderer::new();
        renderer.render(&scene, &camera);
        assert!(renderer.pixels().is_empty());
        assert_eq!(renderer.frame_index(), 1);
    }

    #[test]
    #[should_panic(expected = "camera viewport must match")]
    fn test_mismatched_camera_panics() {
        let scene = test_scene();
        let camera = test_camera(4, 4);

        let mut renderer = Renderer::new();
        renderer.resize(8, 8);
        renderer.render(&scene, &camera);
    }
}

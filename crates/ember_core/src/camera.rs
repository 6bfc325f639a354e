//! Camera with a cached per-pixel ray-direction grid.
//!
//! The camera precomputes one unit ray direction per pixel so the renderer
//! only does a lookup in the per-pixel hot path. The cache is regenerated
//! here, by the application, whenever the viewport size or view direction
//! changes; the render kernel never rebuilds it.

use ember_math::Vec3;

/// Camera for generating primary rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    forward: Vec3,
    up: Vec3,
    vertical_fov: f32, // degrees

    // Cached per-pixel unit ray directions, row-major width x height
    width: u32,
    height: u32,
    ray_directions: Vec<Vec3>,
}

impl Camera {
    /// Create a new camera with default settings, looking down -Z.
    ///
    /// The direction cache is empty until the first `resize` call.
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 2.0),
            forward: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            vertical_fov: 45.0,
            width: 0,
            height: 0,
            ray_directions: Vec::new(),
        }
    }

    /// Set the eye position.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the view direction.
    pub fn with_forward(mut self, forward: Vec3) -> Self {
        self.forward = forward;
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_vertical_fov(mut self, degrees: f32) -> Self {
        self.vertical_fov = degrees;
        self
    }

    /// Resize the viewport, regenerating the ray-direction cache.
    ///
    /// No-op when the dimensions are unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }

        self.width = width;
        self.height = height;
        self.recalculate_ray_directions();
    }

    /// Move the eye without touching the direction cache.
    ///
    /// Ray directions are independent of the eye position, only the view
    /// direction and viewport shape feed into them.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Change the view direction, regenerating the ray-direction cache.
    pub fn set_forward(&mut self, forward: Vec3) {
        self.forward = forward;
        self.recalculate_ray_directions();
    }

    /// Current eye position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Cached unit ray direction for pixel (x, y).
    #[inline]
    pub fn ray_direction(&self, x: u32, y: u32) -> Vec3 {
        self.ray_directions[(x + y * self.width) as usize]
    }

    /// The full direction cache, row-major.
    pub fn ray_directions(&self) -> &[Vec3] {
        &self.ray_directions
    }

    /// Viewport width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Viewport height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    fn recalculate_ray_directions(&mut self) {
        if self.width == 0 || self.height == 0 {
            self.ray_directions.clear();
            return;
        }

        log::debug!(
            "Recalculating {}x{} camera ray directions",
            self.width,
            self.height
        );

        // Camera basis vectors
        let forward = self.forward.normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward);

        let tan_half_fov = (self.vertical_fov.to_radians() / 2.0).tan();
        let aspect = self.width as f32 / self.height as f32;

        self.ray_directions.clear();
        self.ray_directions
            .reserve((self.width * self.height) as usize);

        for y in 0..self.height {
            for x in 0..self.width {
                // Pixel center mapped to [-1, 1], +v pointing up in world
                let u = ((x as f32 + 0.5) / self.width as f32) * 2.0 - 1.0;
                let v = 1.0 - ((y as f32 + 0.5) / self.height as f32) * 2.0;

                let direction =
                    (forward + right * (u * tan_half_fov * aspect) + up * (v * tan_half_fov))
                        .normalize();
                self.ray_directions.push(direction);
            }
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

//! Scene description: spheres with indexed materials.
//!
//! Scene invariants are checked when objects are added, never mid-frame.
//! Once a render starts the scene is read-only, so a scene that passed
//! validation can be traced without per-pixel index checks.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("sphere references material {index} but the scene only has {count} materials")]
    MaterialIndexOutOfRange { index: usize, count: usize },

    #[error("sphere radius must be positive, got {radius}")]
    NonPositiveRadius { radius: f32 },
}

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    /// Center position in world space
    pub center: Vec3,
    /// Radius, must be positive
    pub radius: f32,
    /// Index into the scene's material list
    pub material_index: usize,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material_index: usize) -> Self {
        Self {
            center,
            radius,
            material_index,
        }
    }
}

/// Surface material: diffuse albedo plus an emissive term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Diffuse reflectance per channel (0-1)
    pub albedo: Vec3,
    /// Surface roughness (0-1). Carried in the data contract but not yet
    /// used by the bounce model.
    pub roughness: f32,
    /// Emission color (RGB)
    pub emission_color: Vec3,
    /// Emission intensity multiplier, non-negative
    pub emission_strength: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: Vec3::new(0.5, 0.5, 0.5), // Grey default
            roughness: 1.0,
            emission_color: Vec3::ZERO,
            emission_strength: 0.0,
        }
    }
}

impl Material {
    /// Create a diffuse material with the given albedo.
    pub fn new(albedo: Vec3) -> Self {
        Self {
            albedo,
            ..Default::default()
        }
    }

    /// Set the emissive term.
    pub fn with_emission(mut self, color: Vec3, strength: f32) -> Self {
        self.emission_color = color;
        self.emission_strength = strength;
        self
    }

    /// Set the roughness.
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Radiance emitted by this material.
    #[inline]
    pub fn emission(&self) -> Vec3 {
        self.emission_color * self.emission_strength
    }

    /// Check if this material emits light.
    pub fn is_emissive(&self) -> bool {
        self.emission_strength > 0.0 && self.emission_color.length_squared() > 0.0
    }
}

/// A complete scene: ordered spheres and the materials they reference.
///
/// Iteration order over spheres is insertion order; the closest-hit search
/// relies on it for stable tie-breaking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    spheres: Vec<Sphere>,
    materials: Vec<Material>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a material to the scene and return its index.
    pub fn add_material(&mut self, material: Material) -> usize {
        let index = self.materials.len();
        self.materials.push(material);
        index
    }

    /// Add a sphere to the scene and return its index.
    ///
    /// Rejects spheres with a non-positive radius or a material index that
    /// does not resolve against the materials added so far.
    pub fn add_sphere(&mut self, sphere: Sphere) -> Result<usize, SceneError> {
        if sphere.radius <= 0.0 {
            return Err(SceneError::NonPositiveRadius {
                radius: sphere.radius,
            });
        }
        if sphere.material_index >= self.materials.len() {
            return Err(SceneError::MaterialIndexOutOfRange {
                index: sphere.material_index,
                count: self.materials.len(),
            });
        }

        let index = self.spheres.len();
        self.spheres.push(sphere);
        Ok(index)
    }

    /// Re-check every scene invariant.
    ///
    /// `add_sphere` validates incrementally; this is for scenes that came
    /// from a description file and skipped the builder path.
    pub fn validate(&self) -> Result<(), SceneError> {
        for sphere in &self.spheres {
            if sphere.radius <= 0.0 {
                return Err(SceneError::NonPositiveRadius {
                    radius: sphere.radius,
                });
            }
            if sphere.material_index >= self.materials.len() {
                return Err(SceneError::MaterialIndexOutOfRange {
                    index: sphere.material_index,
                    count: self.materials.len(),
                });
            }
        }
        Ok(())
    }

    /// All spheres, in insertion order.
    #[inline]
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// All materials, in insertion order.
    #[inline]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Get the material referenced by a sphere.
    ///
    /// Panics on an out-of-range index. `add_sphere` guarantees this cannot
    /// happen for a scene built through the public API; hitting it means a
    /// logic error upstream and a silently wrong pixel would be worse than
    /// the panic.
    #[inline]
    pub fn material_for(&self, sphere: &Sphere) -> &Material {
        &self.materials[sphere.material_index]
    }

    /// Number of spheres in the scene.
    pub fn sphere_count(&self) -> usize {
        self.spheres.len()
    }

    /// Number of materials in the scene.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Check if the scene has no spheres.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}

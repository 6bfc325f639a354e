//! Ember - progressive CPU path tracing
//!
//! A real-time Monte Carlo renderer for sphere scenes with emissive and
//! diffuse materials. Every frame traces one sample per pixel and folds it
//! into a temporal running average, so the image refines while the
//! application stays interactive.
//!
//! The kernel is deterministic end to end: sampling is driven by a
//! caller-held hash seed derived from pixel coordinates and the frame
//! index, so sequential and parallel dispatch produce byte-identical
//! images.

mod integrator;
mod intersect;
mod renderer;
mod sampler;

pub use integrator::{trace_pixel, SURFACE_BIAS};
pub use intersect::{find_closest_hit, intersect, HitRecord, HIT_EPSILON};
pub use renderer::{pack_rgba, unpack_rgba, Dispatch, RenderConfig, Renderer};
pub use sampler::{direction_in_sphere, next_float, pcg_hash};

/// Re-export the scene/camera types and common math types
pub use ember_core::{Camera, Material, Scene, SceneError, Sphere};
pub use ember_math::{Ray, Vec3, Vec4};

//! Deterministic seed-threaded random sampler.
//!
//! The whole generator state is the caller-held `u32` seed; there is no
//! hidden or global state. Identical seed sequences always produce
//! identical output streams, which is what makes renders reproducible and
//! pixel evaluation order-independent.

use glam::Vec3;

/// One round of the PCG hash over the seed.
///
/// Constants are the published PCG values.
#[inline]
pub fn pcg_hash(state: u32) -> u32 {
    let state = state.wrapping_mul(747796405).wrapping_add(2891336453);
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277803737);
    (word >> 22) ^ word
}

/// Advance the seed and return a float in [0, 1).
#[inline]
pub fn next_float(seed: &mut u32) -> f32 {
    *seed = pcg_hash(*seed);
    *seed as f32 / u32::MAX as f32
}

/// Random direction on the unit sphere.
///
/// Draws three floats mapped to [-1, 1] and normalizes the result. This is
/// a direct-normalize approximation, slightly biased toward the cube
/// corners compared to true uniform sphere sampling; the bounce model is
/// specified against this exact distribution.
#[inline]
pub fn direction_in_sphere(seed: &mut u32) -> Vec3 {
    Vec3::new(
        next_float(seed) * 2.0 - 1.0,
        next_float(seed) * 2.0 - 1.0,
        next_float(seed) * 2.0 - 1.0,
    )
    .normalize()
}

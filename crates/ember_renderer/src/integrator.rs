//! Per-pixel path tracing integrator.

use ember_core::Scene;
use ember_math::{Ray, Vec3};

use crate::intersect::find_closest_hit;
use crate::sampler::direction_in_sphere;

/// Offset applied along the surface normal when spawning a bounce ray, so
/// the new ray does not immediately re-hit the surface it left.
pub const SURFACE_BIAS: f32 = 1e-4;

/// Trace one light path and return its radiance estimate.
///
/// Iterative loop, one `find_closest_hit` per bounce. A miss terminates the
/// path with no background contribution; there is intentionally no sky
/// term. Emission found at a bounce is attenuated by the albedo of earlier
/// bounces only, never by the albedo of the surface it was found on.
///
/// The caller owns the seed; the per-bounce `seed + i` offset decorrelates
/// bounces within the path.
pub fn trace_pixel(mut ray: Ray, scene: &Scene, mut seed: u32, max_bounces: u32) -> Vec3 {
    let mut light = Vec3::ZERO;
    let mut throughput = Vec3::ONE;

    for bounce in 0..max_bounces {
        seed = seed.wrapping_add(bounce);

        let Some(hit) = find_closest_hit(&ray, scene) else {
            break;
        };

        // The scene validated every material index at construction time;
        // an out-of-range index here is a logic error and panics.
        let material = scene.material_for(&scene.spheres()[hit.object_index]);

        light += material.emission() * throughput;
        throughput *= material.albedo;

        ray.origin = hit.point + hit.normal * SURFACE_BIAS;
        ray.direction = (hit.normal + direction_in_sphere(&mut seed)).normalize();
    }

    light
}

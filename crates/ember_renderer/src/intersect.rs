//! Ray-sphere intersection and closest-hit search.

use ember_core::{Scene, Sphere};
use ember_math::{Ray, Vec3};

/// Minimum accepted hit distance.
///
/// Rejects intersections behind or grazing the ray origin, including the
/// surface a bounce ray just left.
pub const HIT_EPSILON: f32 = 1e-4;

/// Record of the closest ray-sphere intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Distance along the ray to the intersection
    pub t: f32,
    /// Intersection point in world space
    pub point: Vec3,
    /// Unit surface normal, pointing outward from the sphere center
    pub normal: Vec3,
    /// Index of the hit sphere in the scene
    pub object_index: usize,
}

/// Analytic ray-sphere intersection.
///
/// Solves the quadratic |origin + t*dir - center|^2 = r^2 and returns only
/// the near root; the far root is never reported. The camera is assumed to
/// be outside or entering the sphere from the near side.
pub fn intersect(ray: &Ray, sphere: &Sphere) -> Option<f32> {
    let rel = ray.origin - sphere.center;

    let a = ray.direction.dot(ray.direction);
    if a == 0.0 {
        // Degenerate direction, nothing meaningful to intersect
        return None;
    }

    let b = 2.0 * rel.dot(ray.direction);
    let c = rel.dot(rel) - sphere.radius * sphere.radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    (t > HIT_EPSILON).then_some(t)
}

/// Find the closest sphere hit by a ray.
///
/// Linear scan over the scene in insertion order; ties go to the first
/// sphere encountered. Returns `None` when nothing is hit.
pub fn find_closest_hit(ray: &Ray, scene: &Scene) -> Option<HitRecord> {
    let mut closest_t = f32::INFINITY;
    let mut closest_index = None;

    for (index, sphere) in scene.spheres().iter().enumerate() {
        if let Some(t) = intersect(ray, sphere) {
            if t < closest_t {
                closest_t = t;
                closest_index = Some(index);
            }
        }
    }

    closest_index.map(|object_index| {
        let sphere = &scene.spheres()[object_index];
        let point = ray.at(closest_t);
        HitRecord {
            t: closest_t,
            point,
            normal: (point - sphere.center).normalize(),
            object_index,
        }
    })
}

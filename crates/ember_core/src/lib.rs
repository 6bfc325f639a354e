//! Scene and camera types for the ember path tracer.
//!
//! The renderer treats everything in this crate as read-only input for the
//! duration of a frame: the application constructs and edits the scene and
//! camera between frames, the kernel only reads them.

mod camera;
mod scene;

pub use camera::Camera;
pub use scene::{Material, Scene, SceneError, Sphere};

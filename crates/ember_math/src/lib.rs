// Re-export glam for convenience
pub use glam::*;

// Ember math types
mod ray;
pub use ray::Ray;

// Re-export glam for convenience
pub use glam::*;

// MDL math types
mod points;
mod transform;
mod vector;

pub use points::PointMatrix;
pub use transform::{rotate, scale, translate, Axis};
pub use vector::{dot_product, normalize, surface_normal};

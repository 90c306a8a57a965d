//! Vector helpers used by the illumination model.

use glam::DVec3;

/// Normalize a vector in place.
///
/// A zero-length vector produces NaN components; callers must pass a
/// non-degenerate vector.
#[inline]
pub fn normalize(vector: &mut DVec3) {
    *vector /= vector.length();
}

/// Dot product of two 3-component vectors.
#[inline]
pub fn dot_product(a: DVec3, b: DVec3) -> f64 {
    a.dot(b)
}

/// Unnormalized surface normal of the triangle `(p0, p1, p2)`.
///
/// Computed as `(p1 - p0) x (p2 - p0)`, so counter-clockwise triangles
/// face the viewer on +z.
#[inline]
pub fn surface_normal(p0: DVec3, p1: DVec3, p2: DVec3) -> DVec3 {
    (p1 - p0).cross(p2 - p0)
}

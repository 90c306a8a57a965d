//! Homogeneous point storage for edge and polygon geometry.
//!
//! A `PointMatrix` is the 4×N matrix of the classic graphics pipeline,
//! stored as a list of points with an implicit `w = 1`. Edge lists store
//! points in pairs, polygon lists in counter-clockwise triples.

use glam::{DMat4, DVec3};

use crate::vector;

/// An ordered list of points with implicit `w = 1`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointMatrix {
    points: Vec<DVec3>,
}

impl PointMatrix {
    /// Create an empty matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty matrix with room for `columns` points.
    pub fn with_capacity(columns: usize) -> Self {
        Self {
            points: Vec::with_capacity(columns),
        }
    }

    /// Append a single point.
    pub fn add_point(&mut self, point: DVec3) {
        self.points.push(point);
    }

    /// Append a line segment as two consecutive points.
    pub fn add_edge(&mut self, p0: DVec3, p1: DVec3) {
        self.points.push(p0);
        self.points.push(p1);
    }

    /// Append a triangle as three consecutive points.
    pub fn add_triangle(&mut self, p0: DVec3, p1: DVec3, p2: DVec3) {
        self.points.push(p0);
        self.points.push(p1);
        self.points.push(p2);
    }

    /// Number of points (columns).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Drop every column.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Transform every point by `transform` (`p' = transform * p`).
    pub fn apply(&mut self, transform: &DMat4) {
        for point in &mut self.points {
            *point = transform.transform_point3(*point);
        }
    }

    /// Iterate over consecutive point pairs.
    pub fn edges(&self) -> impl Iterator<Item = (DVec3, DVec3)> + '_ {
        self.points.chunks_exact(2).map(|e| (e[0], e[1]))
    }

    /// Iterate over consecutive point triples.
    pub fn triangles(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        self.points.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Unnormalized normal of the triangle whose first point is column `i`.
    ///
    /// Returns `None` when fewer than three points remain at `i`.
    pub fn surface_normal(&self, i: usize) -> Option<DVec3> {
        let p = self.points.get(i..i + 3)?;
        Some(vector::surface_normal(p[0], p[1], p[2]))
    }
}

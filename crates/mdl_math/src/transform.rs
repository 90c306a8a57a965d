// Transform builders for coordinate-system frames
//
// Wraps glam::DMat4 constructors with the argument conventions used by
// scripts: rotation angles arrive in degrees.

use std::fmt;

use glam::{DMat4, DVec3};

/// Rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Parse an axis from its script character (`x`, `y` or `z`, any case).
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'x' => Some(Axis::X),
            'y' => Some(Axis::Y),
            'z' => Some(Axis::Z),
            _ => None,
        }
    }

    /// The axis as a single ASCII byte (`b'x'`, `b'y'`, `b'z'`).
    pub fn as_byte(self) -> u8 {
        match self {
            Axis::X => b'x',
            Axis::Y => b'y',
            Axis::Z => b'z',
        }
    }

    /// Inverse of [`Axis::as_byte`].
    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::from_char(byte as char)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_byte() as char)
    }
}

/// Translation matrix.
pub fn translate(dx: f64, dy: f64, dz: f64) -> DMat4 {
    DMat4::from_translation(DVec3::new(dx, dy, dz))
}

/// Scale (dilation) matrix.
pub fn scale(sx: f64, sy: f64, sz: f64) -> DMat4 {
    DMat4::from_scale(DVec3::new(sx, sy, sz))
}

/// Counter-clockwise rotation about `axis` by `degrees`.
pub fn rotate(axis: Axis, degrees: f64) -> DMat4 {
    let theta = degrees.to_radians();
    match axis {
        Axis::X => DMat4::from_rotation_x(theta),
        Axis::Y => DMat4::from_rotation_y(theta),
        Axis::Z => DMat4::from_rotation_z(theta),
    }
}

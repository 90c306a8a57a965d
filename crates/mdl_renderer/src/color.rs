//! 8-bit RGB color.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Largest value of any channel.
pub const MAX_COLOR: u8 = 255;

/// An RGB triple with channels already clamped to `[0, 255]`.
///
/// The layout is three packed bytes, so a slice of colors is a valid
/// binary PPM pixel stream.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(MAX_COLOR, MAX_COLOR, MAX_COLOR);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub const fn gray(value: u8) -> Self {
        Self::new(value, value, value)
    }

    /// Build a color from unbounded integer channels, clamping each to
    /// `[0, 255]`.
    pub fn clamped(red: i64, green: i64, blue: i64) -> Self {
        let limit = |c: i64| c.clamp(0, MAX_COLOR as i64) as u8;
        Self::new(limit(red), limit(green), limit(blue))
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

impl From<[u8; 3]> for Color {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        c.to_array()
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

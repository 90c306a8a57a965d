//! Operation records produced by the script reader and the bytecode decoder.

use std::fmt;

use mdl_math::{Axis, DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Per-channel reflection coefficients for the Phong model.
///
/// Each field holds the (red, green, blue) coefficients in `x`, `y`, `z`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reflectance {
    /// Ambient coefficients (ka)
    pub ambient: DVec3,
    /// Diffuse coefficients (kd)
    pub diffuse: DVec3,
    /// Specular coefficients (ks)
    pub specular: DVec3,
}

impl Reflectance {
    /// Profile used when a shape names no constants.
    pub const DEFAULT: Reflectance = Reflectance {
        ambient: DVec3::splat(0.1),
        diffuse: DVec3::splat(0.5),
        specular: DVec3::splat(0.5),
    };

    pub fn new(ambient: DVec3, diffuse: DVec3, specular: DVec3) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
        }
    }

    /// Build from `[ka_r, ka_g, ka_b, kd_r, kd_g, kd_b, ks_r, ks_g, ks_b]`.
    pub fn from_array(k: [f64; 9]) -> Self {
        Self {
            ambient: DVec3::new(k[0], k[1], k[2]),
            diffuse: DVec3::new(k[3], k[4], k[5]),
            specular: DVec3::new(k[6], k[7], k[8]),
        }
    }

    /// Inverse of [`Reflectance::from_array`]; this is also the wire order.
    pub fn to_array(&self) -> [f64; 9] {
        [
            self.ambient.x,
            self.ambient.y,
            self.ambient.z,
            self.diffuse.x,
            self.diffuse.y,
            self.diffuse.z,
            self.specular.x,
            self.specular.y,
            self.specular.z,
        ]
    }
}

impl Default for Reflectance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A single scene command.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Duplicate the current coordinate system
    Push,
    /// Discard the current coordinate system
    Pop,
    /// Compose a translation into the current frame
    Move { offset: DVec3 },
    /// Compose a rotation (degrees) into the current frame
    Rotate { axis: Axis, degrees: f64 },
    /// Compose a scale into the current frame
    Scale { factors: DVec3 },
    /// Box from its left-top-front corner; width +x, height -y, depth -z
    Box {
        corner: DVec3,
        size: DVec3,
        reflectance: Option<Reflectance>,
    },
    Sphere {
        center: DVec3,
        radius: f64,
        reflectance: Option<Reflectance>,
    },
    /// Torus with tube radius `minor` swept at distance `major` around `center`
    Torus {
        center: DVec3,
        minor: f64,
        major: f64,
        reflectance: Option<Reflectance>,
    },
    Circle { center: DVec3, radius: f64 },
    /// Hermite curve from endpoints and the rates at each endpoint
    Hermite {
        p0: DVec2,
        p1: DVec2,
        r0: DVec2,
        r1: DVec2,
    },
    /// Cubic Bezier curve from four control points
    Bezier { points: [DVec2; 4] },
    Line { p0: DVec3, p1: DVec3 },
    /// Reset the framebuffer and depth buffer
    Clear,
    /// Save the framebuffer; the format follows the file extension
    Save { path: String },
    /// Show the framebuffer in an external viewer
    Display,
    /// Define a named reflectance profile
    Constants { name: String, reflectance: Reflectance },
}

impl Operation {
    /// The script keyword for this operation.
    pub fn keyword(&self) -> &'static str {
        match self {
            Operation::Push => "push",
            Operation::Pop => "pop",
            Operation::Move { .. } => "move",
            Operation::Rotate { .. } => "rotate",
            Operation::Scale { .. } => "scale",
            Operation::Box { .. } => "box",
            Operation::Sphere { .. } => "sphere",
            Operation::Torus { .. } => "torus",
            Operation::Circle { .. } => "circle",
            Operation::Hermite { .. } => "hermite",
            Operation::Bezier { .. } => "bezier",
            Operation::Line { .. } => "line",
            Operation::Clear => "clear",
            Operation::Save { .. } => "save",
            Operation::Display => "display",
            Operation::Constants { .. } => "constants",
        }
    }

    /// The reflectance override carried by a shape, if any.
    pub fn reflectance(&self) -> Option<&Reflectance> {
        match self {
            Operation::Box { reflectance, .. }
            | Operation::Sphere { reflectance, .. }
            | Operation::Torus { reflectance, .. } => reflectance.as_ref(),
            _ => None,
        }
    }
}

fn write_reflectance(f: &mut fmt::Formatter<'_>, reflectance: &Option<Reflectance>) -> fmt::Result {
    match reflectance {
        Some(k) => {
            let k = k.to_array();
            write!(
                f,
                " [ka {} {} {} kd {} {} {} ks {} {} {}]",
                k[0], k[1], k[2], k[3], k[4], k[5], k[6], k[7], k[8]
            )
        }
        None => Ok(()),
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())?;
        match self {
            Operation::Push | Operation::Pop | Operation::Clear | Operation::Display => Ok(()),
            Operation::Move { offset: v } | Operation::Scale { factors: v } => {
                write!(f, " {} {} {}", v.x, v.y, v.z)
            }
            Operation::Rotate { axis, degrees } => write!(f, " {} {}", axis, degrees),
            Operation::Box {
                corner,
                size,
                reflectance,
            } => {
                write!(
                    f,
                    " {} {} {} {} {} {}",
                    corner.x, corner.y, corner.z, size.x, size.y, size.z
                )?;
                write_reflectance(f, reflectance)
            }
            Operation::Sphere {
                center,
                radius,
                reflectance,
            } => {
                write!(f, " {} {} {} {}", center.x, center.y, center.z, radius)?;
                write_reflectance(f, reflectance)
            }
            Operation::Torus {
                center,
                minor,
                major,
                reflectance,
            } => {
                write!(
                    f,
                    " {} {} {} {} {}",
                    center.x, center.y, center.z, minor, major
                )?;
                write_reflectance(f, reflectance)
            }
            Operation::Circle { center, radius } => {
                write!(f, " {} {} {} {}", center.x, center.y, center.z, radius)
            }
            Operation::Hermite { p0, p1, r0, r1 } => write!(
                f,
                " {} {} {} {} {} {} {} {}",
                p0.x, p0.y, p1.x, p1.y, r0.x, r0.y, r1.x, r1.y
            ),
            Operation::Bezier { points: p } => write!(
                f,
                " {} {} {} {} {} {} {} {}",
                p[0].x, p[0].y, p[1].x, p[1].y, p[2].x, p[2].y, p[3].x, p[3].y
            ),
            Operation::Line { p0, p1 } => write!(
                f,
                " {} {} {} {} {} {}",
                p0.x, p0.y, p0.z, p1.x, p1.y, p1.z
            ),
            Operation::Save { path } => write!(f, " {}", path),
            Operation::Constants { name, reflectance } => {
                write!(f, " {}", name)?;
                write_reflectance(f, &Some(*reflectance))
            }
        }
    }
}

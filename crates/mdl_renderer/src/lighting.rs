//! Phong illumination model.
//!
//! One ambient term plus one point light. Every term is truncated to an
//! integer per channel before the sum is clamped, so a negative diffuse
//! contribution (light behind the surface) darkens the ambient term
//! instead of being discarded.

use mdl_core::Reflectance;
use mdl_math::{dot_product, normalize, DVec3};
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Exponent applied to the specular term.
pub const SPECULAR_EXP: i32 = 4;

/// A point light source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    /// Vector toward the light
    pub location: DVec3,
    pub color: Color,
}

/// Everything the shading of one surface point depends on besides its normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lighting {
    pub ambient: Color,
    pub light: PointLight,
    /// Direction toward the viewer
    pub view: DVec3,
    /// Profile used by shapes without their own constants
    pub reflectance: Reflectance,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: Color::gray(50),
            light: PointLight {
                location: DVec3::new(0.5, 0.75, 1.0),
                color: Color::new(0, 255, 255),
            },
            view: DVec3::new(0.0, 0.0, 1.0),
            reflectance: Reflectance::DEFAULT,
        }
    }
}

impl Lighting {
    /// Shade a surface with this configuration.
    pub fn shade(&self, normal: DVec3, reflectance: &Reflectance) -> Color {
        shade(normal, self.view, self.ambient, &self.light, reflectance)
    }
}

type Channels = [i64; 3];

fn channels(c: Color) -> DVec3 {
    DVec3::new(c.red as f64, c.green as f64, c.blue as f64)
}

/// Truncate toward zero; saturates on overflow and maps NaN to 0.
fn truncate(v: DVec3) -> Channels {
    [v.x as i64, v.y as i64, v.z as i64]
}

/// Ambient term: light color times ka.
pub fn calculate_ambient(ambient: Color, reflectance: &Reflectance) -> Channels {
    truncate(channels(ambient) * reflectance.ambient)
}

/// Diffuse term: light color times kd times `normal . light`.
///
/// `normal` must already be unit length.
pub fn calculate_diffuse(light: &PointLight, reflectance: &Reflectance, normal: DVec3) -> Channels {
    let mut direction = light.location;
    normalize(&mut direction);

    let dot = dot_product(normal, direction);
    truncate(channels(light.color) * reflectance.diffuse * dot)
}

/// Specular term: light color times ks times `max(reflected . view, 0)^4`.
///
/// `normal` must already be unit length.
pub fn calculate_specular(light: &PointLight, reflectance: &Reflectance, view: DVec3, normal: DVec3) -> Channels {
    let mut direction = light.location;
    normalize(&mut direction);

    let reflected = normal * (2.0 * dot_product(normal, direction)) - direction;
    let result = dot_product(reflected, view).max(0.0).powi(SPECULAR_EXP);
    truncate(channels(light.color) * reflectance.specular * result)
}

/// Compute the shaded color of a surface point.
///
/// `normal` need not be unit length but must not be zero.
pub fn shade(
    mut normal: DVec3,
    view: DVec3,
    ambient: Color,
    light: &PointLight,
    reflectance: &Reflectance,
) -> Color {
    normalize(&mut normal);

    let a = calculate_ambient(ambient, reflectance);
    let d = calculate_diffuse(light, reflectance, normal);
    let s = calculate_specular(light, reflectance, view, normal);

    let sum = |i: usize| a[i].saturating_add(d[i]).saturating_add(s[i]);
    Color::clamped(sum(0), sum(1), sum(2))
}

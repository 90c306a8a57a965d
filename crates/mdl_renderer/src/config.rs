//! Render session configuration.
//!
//! Every field has a default, so a JSON file only needs the values it
//! changes:
//!
//! ```json
//! { "width": 800, "output": { "backend": "native" } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Color;
use crate::framebuffer::{DEFAULT_BACKGROUND, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::geometry::DEFAULT_STEPS;
use crate::lighting::Lighting;
use crate::output::{ExternalSink, ImageSink, NativeSink};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Largest accepted `width * height` (a 16384 x 16384 canvas).
pub const MAX_PIXELS: usize = 1 << 28;

/// Number of segments used to approximate curved shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tessellation {
    pub sphere_steps: usize,
    pub torus_steps: usize,
    pub curve_steps: usize,
}

impl Default for Tessellation {
    fn default() -> Self {
        Self {
            sphere_steps: DEFAULT_STEPS,
            torus_steps: DEFAULT_STEPS,
            curve_steps: DEFAULT_STEPS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputBackend {
    /// Pipe to external converter and viewer programs
    #[default]
    External,
    /// Encode in-process; cannot display
    Native,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub backend: OutputBackend,
    pub converter: String,
    pub viewer: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let external = ExternalSink::default();
        Self {
            backend: OutputBackend::External,
            converter: external.converter,
            viewer: external.viewer,
        }
    }
}

/// Configuration for one render session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    pub background: Color,
    /// Color of lines and curves
    pub foreground: Color,
    pub lighting: Lighting,
    pub tessellation: Tessellation,
    pub output: OutputConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: DEFAULT_BACKGROUND,
            foreground: Color::new(0, 255, 255),
            lighting: Lighting::default(),
            tessellation: Tessellation::default(),
            output: OutputConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Read and validate a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&content)?;
        log::debug!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        match self.width.checked_mul(self.height) {
            Some(cells) if cells <= MAX_PIXELS => {}
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "resolution {}x{} exceeds {} pixels",
                    self.width, self.height, MAX_PIXELS
                )))
            }
        }
        let t = &self.tessellation;
        if t.sphere_steps < 2 || t.torus_steps < 3 || t.curve_steps < 1 {
            return Err(ConfigError::Invalid(format!(
                "tessellation too coarse: sphere {}, torus {}, curve {}",
                t.sphere_steps, t.torus_steps, t.curve_steps
            )));
        }
        if self.output.backend == OutputBackend::External
            && (self.output.converter.trim().is_empty() || self.output.viewer.trim().is_empty())
        {
            return Err(ConfigError::Invalid(
                "external backend needs converter and viewer programs".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the image sink selected by `output.backend`.
    pub fn sink(&self) -> Box<dyn ImageSink> {
        match self.output.backend {
            OutputBackend::External => Box::new(ExternalSink::new(
                self.output.converter.clone(),
                self.output.viewer.clone(),
            )),
            OutputBackend::Native => Box::new(NativeSink),
        }
    }
}

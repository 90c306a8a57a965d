//! MDL Renderer - z-buffered software rasterizer
//!
//! Turns MDL operations into pixels: a coordinate stack of transforms,
//! shape tessellation, flat Phong shading, scanline and Bresenham
//! rasterization into a depth-tested framebuffer, and PPM output through
//! an external converter or an in-process encoder.
//!
//! Rendering is single-threaded; one [`Interpreter`] owns one session.

mod color;
mod config;
mod framebuffer;
mod geometry;
mod interpreter;
mod lighting;
mod output;
mod raster;
mod stack;

pub use color::{Color, MAX_COLOR};
pub use config::{ConfigError, ConfigResult, OutputBackend, OutputConfig, RenderConfig, Tessellation, MAX_PIXELS};
pub use framebuffer::{Framebuffer, DEFAULT_BACKGROUND, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use geometry::{add_bezier, add_box, add_circle, add_hermite, add_sphere, add_torus, DEFAULT_STEPS};
pub use interpreter::{InterpretError, InterpretResult, Interpreter, RunSummary};
pub use lighting::{shade, Lighting, PointLight, SPECULAR_EXP};
pub use output::{Destination, ExternalSink, ImageSink, NativeSink, OutputError, OutputResult};
pub use raster::{draw_line, draw_lines, draw_polygons, scanline_triangle};
pub use stack::{CoordinateStack, StackError, StackResult};

/// Re-export math types from mdl_math
pub use mdl_math::{DMat4, DVec3, PointMatrix};

//! Color raster with a paired depth buffer, and PPM encoding.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::color::{Color, MAX_COLOR};

pub const DEFAULT_WIDTH: usize = 500;
pub const DEFAULT_HEIGHT: usize = 500;
pub const DEFAULT_BACKGROUND: Color = Color::gray(127);

/// Depth values are compared after truncation to this many steps per unit.
const DEPTH_QUANTUM: f64 = 1000.0;

/// Depth of a cleared cell; any quantized depth, even `-inf`, passes the
/// test against it.
const FAR_DEPTH: f64 = f64::NEG_INFINITY;

fn quantize_depth(z: f64) -> f64 {
    (z * DEPTH_QUANTUM).trunc() / DEPTH_QUANTUM
}

/// A width × height grid of colors with one depth value per cell.
///
/// Plot coordinates are world coordinates with `y` growing upward; rows
/// are stored top to bottom, so world row `y` lives in display row
/// `height - 1 - y`. Larger depth is nearer the viewer.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    background: Color,
    pixels: Vec<Color>,
    depth: Vec<f64>,
}

impl Framebuffer {
    /// Create a buffer filled with `background` and a cleared depth buffer.
    pub fn new(width: usize, height: usize, background: Color) -> Self {
        let cells = width * height;
        Self {
            width,
            height,
            background,
            pixels: vec![background; cells],
            depth: vec![FAR_DEPTH; cells],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Pixels in display order, top row first.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        let row = self.height - 1 - y;
        Some(row * self.width + x)
    }

    /// Write `color` at world `(x, y)` if `z` is at least as near as the
    /// stored depth. Out-of-range coordinates are ignored.
    ///
    /// Returns whether the cell was written.
    pub fn plot(&mut self, color: Color, x: i64, y: i64, z: f64) -> bool {
        let Some(i) = self.index(x, y) else {
            return false;
        };
        let z = quantize_depth(z);
        if self.depth[i] <= z {
            self.pixels[i] = color;
            self.depth[i] = z;
            true
        } else {
            false
        }
    }

    /// Color at world `(x, y)`.
    pub fn get(&self, x: i64, y: i64) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Stored depth at world `(x, y)`.
    pub fn depth(&self, x: i64, y: i64) -> Option<f64> {
        self.index(x, y).map(|i| self.depth[i])
    }

    /// Reset every pixel to the background color.
    pub fn clear_color(&mut self) {
        self.pixels.fill(self.background);
    }

    /// Reset every depth cell to the far sentinel.
    pub fn clear_depth(&mut self) {
        self.depth.fill(FAR_DEPTH);
    }

    pub fn clear(&mut self) {
        self.clear_color();
        self.clear_depth();
    }

    /// Write a binary (P6) PPM.
    pub fn write_binary<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "P6\n{} {}\n{}\n", self.width, self.height, MAX_COLOR)?;
        writer.write_all(bytemuck::cast_slice(&self.pixels))?;
        Ok(())
    }

    /// Write an ASCII (P3) PPM, one display row per line.
    pub fn write_ascii<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "P3\n{} {}\n{}\n", self.width, self.height, MAX_COLOR)?;
        if self.width == 0 {
            return Ok(());
        }
        for row in self.pixels.chunks_exact(self.width) {
            for c in row {
                write!(writer, "{} {} {} ", c.red, c.green, c.blue)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Save as a binary PPM file.
    pub fn save_binary<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_binary(&mut writer)?;
        writer.flush()
    }

    /// Save as an ASCII PPM file.
    pub fn save_ascii<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_ascii(&mut writer)?;
        writer.flush()
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_BACKGROUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::new(255, 0, 0);
    const BLUE: Color = Color::new(0, 0, 255);

    #[test]
    fn test_new_is_background() {
        let fb = Framebuffer::default();
        assert_eq!(fb.width(), 500);
        assert_eq!(fb.pixels().len(), 500 * 500);
        assert!(fb.pixels().iter().all(|&c| c == Color::gray(127)));
        assert_eq!(fb.depth(0, 0), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_plot_flips_vertically() {
        let mut fb = Framebuffer::new(4, 3, Color::BLACK);
        assert!(fb.plot(RED, 1, 0, 0.0));
        // World row 0 is the bottom display row
        assert_eq!(fb.pixels()[2 * 4 + 1], RED);
        assert_eq!(fb.get(1, 0), Some(RED));
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut fb = Framebuffer::new(4, 4, Color::BLACK);
        assert!(!fb.plot(RED, -1, 0, 0.0));
        assert!(!fb.plot(RED, 0, 4, 0.0));
        assert!(!fb.plot(RED, 4, 0, 0.0));
        assert!(fb.pixels().iter().all(|&c| c == Color::BLACK));
    }

    #[test]
    fn test_depth_nearer_wins() {
        let mut fb = Framebuffer::new(2, 2, Color::BLACK);
        assert!(fb.plot(RED, 0, 0, 1.0));
        assert!(!fb.plot(BLUE, 0, 0, 0.5));
        assert_eq!(fb.get(0, 0), Some(RED));

        assert!(fb.plot(BLUE, 0, 0, 2.0));
        assert_eq!(fb.get(0, 0), Some(BLUE));
        assert_eq!(fb.depth(0, 0), Some(2.0));
    }

    #[test]
    fn test_equal_depth_overwrites() {
        let mut fb = Framebuffer::new(2, 2, Color::BLACK);
        fb.plot(RED, 0, 0, 1.0);
        assert!(fb.plot(BLUE, 0, 0, 1.0));
        assert_eq!(fb.get(0, 0), Some(BLUE));
    }

    #[test]
    fn test_depth_is_quantized() {
        let mut fb = Framebuffer::new(2, 2, Color::BLACK);
        fb.plot(RED, 0, 0, 1.0009);
        assert_eq!(fb.depth(0, 0), Some(1.0));
        // Within the same quantum, so the later write wins
        assert!(fb.plot(BLUE, 0, 0, 1.0004));
    }

    #[test]
    fn test_clear_depth_keeps_color() {
        let mut fb = Framebuffer::new(2, 2, Color::BLACK);
        fb.plot(RED, 0, 0, 100.0);
        fb.clear_depth();
        assert_eq!(fb.get(0, 0), Some(RED));
        assert!(fb.plot(BLUE, 0, 0, -100.0));

        fb.clear();
        assert_eq!(fb.get(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn test_first_write_after_clear_always_lands() {
        let mut fb = Framebuffer::new(2, 1, Color::BLACK);
        fb.plot(RED, 0, 0, 5.0);
        fb.clear_depth();
        assert!(fb.plot(BLUE, 0, 0, -1e306));
        assert_eq!(fb.get(0, 0), Some(BLUE));
        assert!(fb.plot(BLUE, 1, 0, f64::NEG_INFINITY));
        assert!(fb.plot(RED, 1, 0, f64::MIN));
    }

    #[test]
    fn test_binary_ppm_layout() {
        let mut fb = Framebuffer::new(2, 1, Color::BLACK);
        fb.plot(Color::new(1, 2, 3), 1, 0, 0.0);

        let mut out = Vec::new();
        fb.write_binary(&mut out).unwrap();
        assert_eq!(&out[..11], b"P6\n2 1\n255\n");
        assert_eq!(&out[11..], &[0, 0, 0, 1, 2, 3]);
    }

    #[test]
    fn test_ascii_ppm_layout() {
        let mut fb = Framebuffer::new(2, 2, Color::BLACK);
        fb.plot(Color::new(9, 8, 7), 0, 1, 0.0);

        let mut out = Vec::new();
        fb.write_ascii(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "P3\n2 2\n255\n9 8 7 0 0 0 \n0 0 0 0 0 0 \n");
    }

    #[test]
    fn test_binary_decodes_with_image_crate() {
        let mut fb = Framebuffer::new(3, 2, DEFAULT_BACKGROUND);
        fb.plot(RED, 2, 0, 0.0);

        let mut out = Vec::new();
        fb.write_binary(&mut out).unwrap();
        let decoded = image::load_from_memory(&out).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 1).0, [255, 0, 0]);
        assert_eq!(decoded.get_pixel(0, 0).0, [127, 127, 127]);
    }

    #[test]
    fn test_save_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut fb = Framebuffer::new(2, 2, Color::BLACK);
        fb.plot(RED, 1, 1, 0.0);

        let binary = dir.path().join("image.ppm");
        fb.save_binary(&binary).unwrap();
        let bytes = std::fs::read(&binary).unwrap();
        assert!(bytes.starts_with(b"P6\n2 2\n255\n"));
        assert_eq!(bytes.len(), 11 + 2 * 2 * 3);

        let ascii = dir.path().join("image_ascii.ppm");
        fb.save_ascii(&ascii).unwrap();
        let text = std::fs::read_to_string(&ascii).unwrap();
        assert!(text.starts_with("P3\n2 2\n255\n"));
        assert!(text.contains("255 0 0"));
    }
}

//! Line and triangle rasterization onto a [`Framebuffer`].

use mdl_core::Reflectance;
use mdl_math::{dot_product, surface_normal, DVec3, PointMatrix};

use crate::color::Color;
use crate::framebuffer::Framebuffer;
use crate::lighting::Lighting;

/// Clip a segment to the rectangle `[0, max_x] x [0, max_y]`
/// (Liang-Barsky), carrying depth along.
fn clip_segment(p0: DVec3, p1: DVec3, max_x: f64, max_y: f64) -> Option<(DVec3, DVec3)> {
    let d = p1 - p0;
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    // Boundary that moved each end: (axis, coordinate)
    let (mut enter, mut exit) = (None, None);

    let edges = [
        (-d.x, p0.x, 0, 0.0),
        (d.x, max_x - p0.x, 0, max_x),
        (-d.y, p0.y, 1, 0.0),
        (d.y, max_y - p0.y, 1, max_y),
    ];
    for (p, q, axis, bound) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            if r > t0 {
                t0 = r;
                enter = Some((axis, bound));
            }
        } else {
            if r < t0 {
                return None;
            }
            if r < t1 {
                t1 = r;
                exit = Some((axis, bound));
            }
        }
    }

    // Huge inputs lose precision in `p0 + d * t`; pin the clipped axis to
    // its boundary and keep the rest inside the rectangle
    let at = |t: f64, boundary: Option<(usize, f64)>| {
        let mut p = p0 + d * t;
        if let Some((axis, bound)) = boundary {
            p[axis] = bound;
        }
        DVec3::new(p.x.clamp(0.0, max_x), p.y.clamp(0.0, max_y), p.z)
    };
    let start = if enter.is_some() { at(t0, enter) } else { p0 };
    let end = if exit.is_some() { at(t1, exit) } else { p1 };
    Some((start, end))
}

/// Draw one segment with Bresenham's algorithm, interpolating depth
/// linearly along the major axis. Both endpoints are drawn.
///
/// The segment is clipped to the framebuffer first; segments with
/// non-finite coordinates are skipped.
pub fn draw_line(fb: &mut Framebuffer, p0: DVec3, p1: DVec3, color: Color) {
    if !(p0.truncate().is_finite() && p1.truncate().is_finite()) || fb.width() == 0 || fb.height() == 0 {
        return;
    }
    let max_x = (fb.width() - 1) as f64;
    let max_y = (fb.height() - 1) as f64;
    let Some((p0, p1)) = clip_segment(p0, p1, max_x, max_y) else {
        return;
    };

    let (mut x, mut y) = (p0.x.round() as i64, p0.y.round() as i64);
    let (x1, y1) = (p1.x.round() as i64, p1.y.round() as i64);

    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = (x1 - x).signum();
    let sy = (y1 - y).signum();

    let steps = dx.max(-dy);
    let dz = if steps > 0 { (p1.z - p0.z) / steps as f64 } else { 0.0 };

    let mut z = p0.z;
    let mut err = dx + dy;
    loop {
        fb.plot(color, x, y, z);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        z += dz;
    }
}

/// Draw every edge (consecutive point pair) of `edges`.
pub fn draw_lines(fb: &mut Framebuffer, edges: &PointMatrix, color: Color) {
    for (p0, p1) in edges.edges() {
        draw_line(fb, p0, p1, color);
    }
}

/// Point on segment `a -> b` at height `y`, as `(x, z)`.
fn at_height(a: DVec3, b: DVec3, y: f64) -> (f64, f64) {
    let span = b.y - a.y;
    if span == 0.0 {
        return (a.x, a.z);
    }
    let t = ((y - a.y) / span).clamp(0.0, 1.0);
    (a.x + (b.x - a.x) * t, a.z + (b.z - a.z) * t)
}

/// Fill a triangle one row at a time.
///
/// Each row spans from the long edge (bottom to top vertex) to whichever
/// short edge covers it; depth is interpolated along both edges and then
/// across the span. Rows and columns outside the framebuffer are skipped.
pub fn scanline_triangle(fb: &mut Framebuffer, triangle: [DVec3; 3], color: Color) {
    let mut v = triangle;
    v.sort_by(|a, b| a.y.total_cmp(&b.y));
    let [bot, mid, top] = v;

    let last_row = fb.height() as i64 - 1;
    let last_col = fb.width() as f64 - 1.0;
    let y_start = (bot.y.round() as i64).max(0);
    let y_end = (top.y.round() as i64).min(last_row);

    for y in y_start..=y_end {
        let yf = y as f64;
        let (xa, za) = at_height(bot, top, yf);
        let (xb, zb) = if yf < mid.y {
            at_height(bot, mid, yf)
        } else {
            at_height(mid, top, yf)
        };

        let ((x0, z0), (x1, z1)) = if xa <= xb { ((xa, za), (xb, zb)) } else { ((xb, zb), (xa, za)) };
        // Span arithmetic stays in f64 so huge coordinates cannot overflow
        let (xs, xe) = (x0.round(), x1.round());
        let dz = if xe > xs { (z1 - z0) / (xe - xs) } else { 0.0 };
        let (first, last) = (xs.max(0.0), xe.min(last_col));
        if first > last {
            continue;
        }

        for x in first as i64..=last as i64 {
            let z = z0 + dz * (x as f64 - xs);
            fb.plot(color, x, y, z);
        }
    }
}

/// Shade and fill every triangle of `polygons` that faces the viewer.
///
/// Returns how many triangles were drawn.
pub fn draw_polygons(
    fb: &mut Framebuffer,
    polygons: &PointMatrix,
    lighting: &Lighting,
    reflectance: &Reflectance,
) -> usize {
    let mut drawn = 0;
    for triangle in polygons.triangles() {
        let normal = surface_normal(triangle[0], triangle[1], triangle[2]);
        if dot_product(normal, lighting.view) <= 0.0 {
            continue;
        }
        let color = lighting.shade(normal, reflectance);
        scanline_triangle(fb, triangle, color);
        drawn += 1;
    }
    drawn
}

//! Shape generators.
//!
//! Solids append counter-clockwise triangles (seen from outside) to a
//! polygon matrix; curves append segments to an edge matrix. Everything
//! is produced in object space and transformed by the caller.

use std::f64::consts::{PI, TAU};

use mdl_math::{DVec2, DVec3, PointMatrix};

/// Default number of steps for spheres, tori and curves.
pub const DEFAULT_STEPS: usize = 100;

/// Axis-aligned box.
///
/// `corner` is the left-top-front corner; the box extends `size.x` along
/// +x, `size.y` along -y and `size.z` along -z.
pub fn add_box(polygons: &mut PointMatrix, corner: DVec3, size: DVec3) {
    let (x0, y0, z0) = (corner.x, corner.y, corner.z);
    let (x1, y1, z1) = (x0 + size.x, y0 - size.y, z0 - size.z);

    let ltf = DVec3::new(x0, y0, z0);
    let lbf = DVec3::new(x0, y1, z0);
    let rbf = DVec3::new(x1, y1, z0);
    let rtf = DVec3::new(x1, y0, z0);
    let ltb = DVec3::new(x0, y0, z1);
    let lbb = DVec3::new(x0, y1, z1);
    let rbb = DVec3::new(x1, y1, z1);
    let rtb = DVec3::new(x1, y0, z1);

    let faces = [
        [ltf, lbf, rbf, rtf], // front
        [rtb, rbb, lbb, ltb], // back
        [rtf, rbf, rbb, rtb], // right
        [ltb, lbb, lbf, ltf], // left
        [ltb, ltf, rtf, rtb], // top
        [lbf, lbb, rbb, rbf], // bottom
    ];
    for [p0, p1, p2, p3] in faces {
        polygons.add_triangle(p0, p1, p2);
        polygons.add_triangle(p0, p2, p3);
    }
}

/// Points on a sphere: `steps` semicircles rotated about the x axis,
/// each sampled at `steps + 1` points pole to pole.
fn sphere_points(center: DVec3, radius: f64, steps: usize) -> Vec<DVec3> {
    let mut points = Vec::with_capacity(steps * (steps + 1));
    for i in 0..steps {
        let phi = TAU * i as f64 / steps as f64;
        for j in 0..=steps {
            let theta = PI * j as f64 / steps as f64;
            points.push(DVec3::new(
                radius * theta.cos() + center.x,
                radius * theta.sin() * phi.cos() + center.y,
                radius * theta.sin() * phi.sin() + center.z,
            ));
        }
    }
    points
}

/// Sphere tessellated into `steps` longitudinal slices.
///
/// The degenerate triangle at each pole is skipped.
pub fn add_sphere(polygons: &mut PointMatrix, center: DVec3, radius: f64, steps: usize) {
    if steps == 0 {
        return;
    }
    let points = sphere_points(center, radius, steps);
    let index = |i: usize, j: usize| i * (steps + 1) + j;

    for i in 0..steps {
        let next = (i + 1) % steps;
        for j in 0..steps {
            let p0 = points[index(i, j)];
            let p1 = points[index(i, j + 1)];
            let p2 = points[index(next, j + 1)];
            let p3 = points[index(next, j)];

            if j != steps - 1 {
                polygons.add_triangle(p0, p1, p2);
            }
            if j != 0 {
                polygons.add_triangle(p0, p2, p3);
            }
        }
    }
}

fn torus_points(center: DVec3, minor: f64, major: f64, steps: usize) -> Vec<DVec3> {
    let mut points = Vec::with_capacity(steps * steps);
    for i in 0..steps {
        let phi = TAU * i as f64 / steps as f64;
        for j in 0..steps {
            let theta = TAU * j as f64 / steps as f64;
            let ring = minor * theta.cos() + major;
            points.push(DVec3::new(
                phi.cos() * ring + center.x,
                minor * theta.sin() + center.y,
                -phi.sin() * ring + center.z,
            ));
        }
    }
    points
}

/// Torus around the y axis with tube radius `minor` and ring radius `major`.
pub fn add_torus(polygons: &mut PointMatrix, center: DVec3, minor: f64, major: f64, steps: usize) {
    if steps == 0 {
        return;
    }
    let points = torus_points(center, minor, major, steps);
    let index = |i: usize, j: usize| i * steps + j;

    for i in 0..steps {
        let next = (i + 1) % steps;
        for j in 0..steps {
            let up = (j + 1) % steps;
            let p0 = points[index(i, j)];
            let p1 = points[index(i, up)];
            let p2 = points[index(next, up)];
            let p3 = points[index(next, j)];

            polygons.add_triangle(p0, p3, p2);
            polygons.add_triangle(p0, p2, p1);
        }
    }
}

/// Circle in the plane `z = center.z`.
pub fn add_circle(edges: &mut PointMatrix, center: DVec3, radius: f64, steps: usize) {
    let point = |i: usize| {
        let t = TAU * i as f64 / steps as f64;
        DVec3::new(center.x + radius * t.cos(), center.y + radius * t.sin(), center.z)
    };
    for i in 0..steps {
        edges.add_edge(point(i), point(i + 1));
    }
}

/// Cubic `a t^3 + b t^2 + c t + d`, traced as `steps` segments in `z = 0`.
fn add_cubic(edges: &mut PointMatrix, coefficients: [DVec2; 4], steps: usize) {
    let [a, b, c, d] = coefficients;
    let point = |i: usize| {
        let t = i as f64 / steps as f64;
        let p = ((a * t + b) * t + c) * t + d;
        p.extend(0.0)
    };
    for i in 0..steps {
        edges.add_edge(point(i), point(i + 1));
    }
}

/// Hermite curve from `p0` to `p1` with tangents `r0` and `r1`.
pub fn add_hermite(edges: &mut PointMatrix, p0: DVec2, p1: DVec2, r0: DVec2, r1: DVec2, steps: usize) {
    let a = 2.0 * p0 - 2.0 * p1 + r0 + r1;
    let b = -3.0 * p0 + 3.0 * p1 - 2.0 * r0 - r1;
    add_cubic(edges, [a, b, r0, p0], steps);
}

/// Cubic Bezier curve through control points `p`.
pub fn add_bezier(edges: &mut PointMatrix, p: [DVec2; 4], steps: usize) {
    let a = -p[0] + 3.0 * p[1] - 3.0 * p[2] + p[3];
    let b = 3.0 * p[0] - 6.0 * p[1] + 3.0 * p[2];
    let c = -3.0 * p[0] + 3.0 * p[1];
    add_cubic(edges, [a, b, c, p[0]], steps);
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdl_math::{dot_product, surface_normal};

    fn centroid(t: &[DVec3; 3]) -> DVec3 {
        (t[0] + t[1] + t[2]) / 3.0
    }

    #[test]
    fn test_box_faces_outward() {
        let mut m = PointMatrix::new();
        let corner = DVec3::new(-10.0, 20.0, 5.0);
        let size = DVec3::new(30.0, 40.0, 50.0);
        add_box(&mut m, corner, size);
        assert_eq!(m.triangles().count(), 12);

        let middle = corner + DVec3::new(size.x, -size.y, -size.z) / 2.0;
        for t in m.triangles() {
            let n = surface_normal(t[0], t[1], t[2]);
            assert!(dot_product(n, centroid(&t) - middle) > 0.0);
        }
    }

    #[test]
    fn test_box_front_faces_viewer() {
        let mut m = PointMatrix::new();
        add_box(&mut m, DVec3::ZERO, DVec3::ONE);
        let n = m.surface_normal(0).unwrap();
        assert!(n.z > 0.0 && n.x == 0.0 && n.y == 0.0);
        assert!(m.points().iter().all(|p| p.z <= 0.0 && p.y <= 0.0 && p.x >= 0.0));
    }

    #[test]
    fn test_sphere_points_on_surface() {
        let center = DVec3::new(1.0, 2.0, 3.0);
        for p in sphere_points(center, 5.0, 12) {
            assert!(((p - center).length() - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_sphere_faces_outward() {
        let center = DVec3::new(1.0, 2.0, 3.0);
        let mut m = PointMatrix::new();
        add_sphere(&mut m, center, 5.0, 10);
        // Two triangles per patch minus one at each pole per slice
        assert_eq!(m.triangles().count(), 10 * 10 * 2 - 2 * 10);

        for t in m.triangles() {
            let n = surface_normal(t[0], t[1], t[2]);
            assert!(dot_product(n, centroid(&t) - center) > 0.0);
        }
    }

    #[test]
    fn test_torus_faces_outward() {
        let center = DVec3::new(1.0, 2.0, 3.0);
        let (minor, major) = (2.0, 6.0);
        let mut m = PointMatrix::new();
        add_torus(&mut m, center, minor, major, 10);
        assert_eq!(m.triangles().count(), 200);

        for t in m.triangles() {
            let n = surface_normal(t[0], t[1], t[2]);
            let c = centroid(&t) - center;
            let ring = DVec3::new(c.x, 0.0, c.z).normalize() * major;
            assert!(dot_product(n, c - ring) > 0.0);
        }
    }

    #[test]
    fn test_zero_steps_adds_nothing() {
        let mut m = PointMatrix::new();
        add_sphere(&mut m, DVec3::ZERO, 1.0, 0);
        add_torus(&mut m, DVec3::ZERO, 1.0, 2.0, 0);
        add_circle(&mut m, DVec3::ZERO, 1.0, 0);
        assert!(m.is_empty());
    }

    #[test]
    fn test_circle_closes() {
        let mut m = PointMatrix::new();
        add_circle(&mut m, DVec3::new(0.0, 0.0, 7.0), 10.0, 8);
        assert_eq!(m.edges().count(), 8);

        let first = m.points()[0];
        let last = m.points()[m.len() - 1];
        assert!((first - last).length() < 1e-9);
        assert!(m.points().iter().all(|p| p.z == 7.0));
    }

    #[test]
    fn test_hermite_endpoints() {
        let mut m = PointMatrix::new();
        let p0 = DVec2::new(0.0, 0.0);
        let p1 = DVec2::new(100.0, 50.0);
        add_hermite(&mut m, p0, p1, DVec2::new(10.0, 0.0), DVec2::new(0.0, 10.0), 20);
        assert_eq!(m.edges().count(), 20);
        assert!((m.points()[0] - p0.extend(0.0)).length() < 1e-9);
        assert!((m.points()[m.len() - 1] - p1.extend(0.0)).length() < 1e-9);
    }

    #[test]
    fn test_bezier_endpoints_and_midpoint() {
        let mut m = PointMatrix::new();
        let p = [
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, 100.0),
            DVec2::new(100.0, 100.0),
            DVec2::new(100.0, 0.0),
        ];
        add_bezier(&mut m, p, 2);
        let points = m.points();
        assert!((points[0] - DVec3::ZERO).length() < 1e-9);
        // B(0.5) = (p0 + 3p1 + 3p2 + p3) / 8
        assert!((points[1] - DVec3::new(50.0, 75.0, 0.0)).length() < 1e-9);
        assert!((points[3] - DVec3::new(100.0, 0.0, 0.0)).length() < 1e-9);
    }
}

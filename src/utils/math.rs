//! Additional 2D math helpers layered on top of `glam`.

use glam::DVec2;

/// Splits `v` into (normal, tangent) components for the frame whose first axis is `normal`.
///
/// `normal` must be unit length.
pub fn to_normal_frame(v: DVec2, normal: DVec2) -> DVec2 {
    DVec2::new(v.dot(normal), v.dot(normal.perp()))
}

/// Inverse of [`to_normal_frame`].
pub fn from_normal_frame(v: DVec2, normal: DVec2) -> DVec2 {
    normal * v.x + normal.perp() * v.y
}

/// Signed shoelace area; positive for counter-clockwise winding.
pub fn polygon_signed_area(vertices: &[DVec2]) -> f64 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }
    let twice_area: f64 = (0..n)
        .map(|i| vertices[i].perp_dot(vertices[(i + 1) % n]))
        .sum();
    twice_area * 0.5
}

/// Area-weighted centroid. Falls back to the vertex average for degenerate input.
pub fn polygon_centroid(vertices: &[DVec2]) -> DVec2 {
    let area = polygon_signed_area(vertices);
    if area.abs() < f64::EPSILON {
        if vertices.is_empty() {
            return DVec2::ZERO;
        }
        return vertices.iter().copied().sum::<DVec2>() / vertices.len() as f64;
    }

    let n = vertices.len();
    let mut accum = DVec2::ZERO;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        accum += (a + b) * a.perp_dot(b);
    }
    accum / (6.0 * area)
}

/// True when every turn has the same orientation, for either winding.
pub fn is_convex(vertices: &[DVec2]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let mut sign = 0.0_f64;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let c = vertices[(i + 2) % n];
        let cross = (b - a).perp_dot(c - b);
        if cross.abs() < f64::EPSILON {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    sign != 0.0
}

pub fn closest_point_on_segment(point: DVec2, a: DVec2, b: DVec2) -> DVec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < f64::EPSILON {
        return a;
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Proper or touching intersection of segments `p1-p2` and `q1-q2`.
pub fn segments_intersect(p1: DVec2, p2: DVec2, q1: DVec2, q2: DVec2) -> bool {
    let d1 = (q2 - q1).perp_dot(p1 - q1);
    let d2 = (q2 - q1).perp_dot(p2 - q1);
    let d3 = (p2 - p1).perp_dot(q1 - p1);
    let d4 = (p2 - p1).perp_dot(q2 - p1);
    d1 * d2 <= 0.0 && d3 * d4 <= 0.0 && !(d1 == 0.0 && d2 == 0.0)
}

pub fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

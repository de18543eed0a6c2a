//! Catmull-Rom curve evaluation for scheme segments.
//!
//! Each segment of a line is rendered as a spline between its two endpoints,
//! with one exterior guide point per side biasing the entry and exit
//! tangents. The evaluation is a pure function of its inputs.

use geo_types::Coord;

/// Knot intervals below this are treated as degenerate.
const KNOT_EPSILON: f64 = 1e-12;

/// Evaluate a Catmull-Rom spline segment between `p1` and `p2`.
///
/// `g0` and `g3` are exterior control points (guide points) shaping the
/// tangents at `p1` and `p2`; they are not part of the returned polyline.
/// `alpha` is the knot parameterization exponent: 0.5 gives the centripetal
/// variant, 0.0 the uniform one. Returns exactly `count` points; the first
/// equals `p1` and the last equals `p2`.
///
/// Coincident control points make the knot sequence degenerate; in that case
/// the segment falls back to straight-line interpolation between `p1` and
/// `p2`.
pub fn catmull_rom_segment(
    g0: Coord<f64>,
    p1: Coord<f64>,
    p2: Coord<f64>,
    g3: Coord<f64>,
    count: usize,
    alpha: f64,
) -> Vec<Coord<f64>> {
    if count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![p1];
    }

    let t0 = 0.0;
    let t1 = t0 + distance(g0, p1).powf(alpha);
    let t2 = t1 + distance(p1, p2).powf(alpha);
    let t3 = t2 + distance(p2, g3).powf(alpha);

    if t1 - t0 < KNOT_EPSILON || t2 - t1 < KNOT_EPSILON || t3 - t2 < KNOT_EPSILON {
        return straight_segment(p1, p2, count);
    }

    let mut points = Vec::with_capacity(count);
    let step = (t2 - t1) / (count - 1) as f64;
    for i in 0..count {
        let t = t1 + step * i as f64;
        let a1 = lerp(g0, p1, t0, t1, t);
        let a2 = lerp(p1, p2, t1, t2, t);
        let a3 = lerp(p2, g3, t2, t3, t);
        let b1 = lerp(a1, a2, t0, t2, t);
        let b2 = lerp(a2, a3, t1, t3, t);
        points.push(lerp(b1, b2, t1, t2, t));
    }

    // The parameter endpoints evaluate to the control points analytically;
    // pin them so accumulated rounding cannot move the polyline ends.
    points[0] = p1;
    points[count - 1] = p2;
    points
}

fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

fn lerp(a: Coord<f64>, b: Coord<f64>, ta: f64, tb: f64, t: f64) -> Coord<f64> {
    let w = (t - ta) / (tb - ta);
    Coord {
        x: a.x + (b.x - a.x) * w,
        y: a.y + (b.y - a.y) * w,
    }
}

fn straight_segment(p1: Coord<f64>, p2: Coord<f64>, count: usize) -> Vec<Coord<f64>> {
    (0..count)
        .map(|i| {
            let w = i as f64 / (count - 1) as f64;
            Coord {
                x: p1.x + (p2.x - p1.x) * w,
                y: p1.y + (p2.y - p1.y) * w,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn coord(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn test_endpoints_and_count() {
        let points = catmull_rom_segment(
            coord(-1.0, 1.0),
            coord(0.0, 0.0),
            coord(4.0, 0.0),
            coord(5.0, 1.0),
            25,
            0.5,
        );
        assert_eq!(points.len(), 25);
        assert_eq!(points[0], coord(0.0, 0.0));
        assert_eq!(points[24], coord(4.0, 0.0));
    }

    #[test]
    fn test_collinear_controls_give_straight_polyline() {
        let points = catmull_rom_segment(
            coord(-1.0, -1.0),
            coord(0.0, 0.0),
            coord(1.0, 1.0),
            coord(2.0, 2.0),
            10,
            0.5,
        );
        for p in &points {
            assert_relative_eq!(p.x, p.y, epsilon = 1e-9);
        }
        for pair in points.windows(2) {
            assert!(pair[1].x >= pair[0].x);
        }
    }

    #[test]
    fn test_curve_bends_toward_guides() {
        // Guides above the chord pull the interior of the curve off it.
        let points = catmull_rom_segment(
            coord(-1.0, 1.0),
            coord(0.0, 0.0),
            coord(2.0, 0.0),
            coord(3.0, 1.0),
            50,
            0.5,
        );
        let interior_off_chord = points[1..49].iter().any(|p| p.y.abs() > 1e-6);
        assert!(interior_off_chord);
    }

    #[test]
    fn test_coincident_endpoints_degrade_to_repeats() {
        let p = coord(3.0, 4.0);
        let points = catmull_rom_segment(coord(2.0, 4.0), p, p, coord(4.0, 4.0), 5, 0.5);
        assert_eq!(points, vec![p; 5]);
    }

    #[test]
    fn test_single_point_request() {
        let points = catmull_rom_segment(
            coord(-1.0, 0.0),
            coord(0.0, 0.0),
            coord(1.0, 0.0),
            coord(2.0, 0.0),
            1,
            0.5,
        );
        assert_eq!(points, vec![coord(0.0, 0.0)]);
    }
}

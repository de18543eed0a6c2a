//! Spherical-Mercator projection of WGS84 coordinates.
//!
//! Matches the projection used by the downstream map renderer: the transform
//! must stay bit-for-bit reproducible, so the clamp thresholds and formula
//! below are fixed.

use geo_types::Coord;

/// Latitudes beyond this are clamped before projecting.
const MAX_LATITUDE: f64 = 86.0;
/// The projected y range is clamped to this bound.
const MAX_Y: f64 = 180.0;

/// Project a WGS84 coordinate into the scheme plane.
///
/// `x` is the raw longitude; `y` is the Mercator-transformed latitude,
/// clamped to [-180, 180]. Latitude is clamped to [-86, 86] first.
pub fn project(lat: f64, lon: f64) -> Coord<f64> {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let sin = lat.to_radians().sin();
    let y = (0.5 * ((1.0 + sin) / (1.0 - sin)).ln()).to_degrees();
    Coord {
        x: lon,
        y: y.clamp(-MAX_Y, MAX_Y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_origin_projects_to_origin() {
        let p = project(0.0, 0.0);
        assert_relative_eq!(p.x, 0.0);
        assert_relative_eq!(p.y, 0.0);
    }

    #[test]
    fn test_longitude_is_untouched() {
        assert_relative_eq!(project(10.0, 37.6).x, 37.6);
        assert_relative_eq!(project(10.0, -122.4).x, -122.4);
    }

    #[test]
    fn test_poles_clamp_to_86_degrees() {
        assert_eq!(project(90.0, 0.0).y, project(86.0, 0.0).y);
        assert_eq!(project(-90.0, 0.0).y, project(-86.0, 0.0).y);
    }

    #[test]
    fn test_known_value() {
        // y(45°) = degrees(0.5 * ln((1 + sin 45°) / (1 - sin 45°)))
        assert_relative_eq!(project(45.0, 0.0).y, 50.498_986_72, epsilon = 1e-6);
    }

    #[test]
    fn test_projection_is_antisymmetric() {
        let north = project(55.75, 37.62);
        let south = project(-55.75, 37.62);
        assert_relative_eq!(north.y, -south.y, epsilon = 1e-12);
    }
}

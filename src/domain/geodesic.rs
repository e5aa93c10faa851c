// WGS84 inverse geodesic between two fixes
use super::location::Coordinates;
use geo::{GeodesicBearing, Point};

/// Result of the inverse problem: azimuths in degrees `[0, 360)`, distance in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodesicSolution {
    pub forward_azimuth: f64,
    pub reverse_azimuth: f64,
    pub distance_meters: f64,
}

/// Solves the inverse problem on the WGS84 ellipsoid (Karney's method).
///
/// `forward_azimuth` is the bearing at `from` toward `to`;
/// `reverse_azimuth` is the bearing at `to` looking back at `from`.
pub fn inverse(from: Coordinates, to: Coordinates) -> GeodesicSolution {
    let from = point(from);
    let to = point(to);

    let (forward, distance) = from.geodesic_bearing_distance(to);
    let reverse = to.geodesic_bearing(from);

    GeodesicSolution {
        forward_azimuth: normalize(forward),
        reverse_azimuth: normalize(reverse),
        distance_meters: distance,
    }
}

fn point(c: Coordinates) -> Point<f64> {
    Point::new(c.longitude, c.latitude)
}

fn normalize(bearing: f64) -> f64 {
    let degrees = bearing.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if degrees >= 360.0 { 0.0 } else { degrees }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEG_TOLERANCE: f64 = 1e-3;
    const METER_TOLERANCE: f64 = 0.01;

    #[test]
    fn test_flinders_peak_to_buninyong() {
        // Vincenty (1975) worked example on WGS84
        let flinders = Coordinates::new(-37.95103341666667, 144.42486788888889);
        let buninyong = Coordinates::new(-37.65282113888889, 143.92649552777778);

        let solution = inverse(flinders, buninyong);
        assert!((solution.forward_azimuth - 306.868159).abs() < DEG_TOLERANCE);
        assert!((solution.reverse_azimuth - 127.173631).abs() < DEG_TOLERANCE);
        assert!((solution.distance_meters - 54972.271).abs() < METER_TOLERANCE);
    }

    #[test]
    fn test_short_northwest_hop() {
        let from = Coordinates::new(40.0, -75.0);
        let to = Coordinates::new(40.001, -75.001);

        let solution = inverse(from, to);
        assert!((solution.forward_azimuth - 322.437575).abs() < DEG_TOLERANCE);
        assert!((solution.reverse_azimuth - 142.436932).abs() < DEG_TOLERANCE);
        assert!((solution.distance_meters - 140.073895).abs() < METER_TOLERANCE);
    }

    #[test]
    fn test_due_east_on_equator() {
        let solution = inverse(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0));
        assert!((solution.forward_azimuth - 90.0).abs() < DEG_TOLERANCE);
        assert!((solution.reverse_azimuth - 270.0).abs() < DEG_TOLERANCE);
    }

    #[test]
    fn test_normalize_range() {
        assert_eq!(normalize(-90.0), 270.0);
        assert_eq!(normalize(180.0), 180.0);
        assert_eq!(normalize(-0.0), 0.0);
        assert!(normalize(-1e-20) < 360.0);
    }
}

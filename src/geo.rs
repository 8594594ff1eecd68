/*!
 * Geographic calculations.
 *
 * Clustering works in raw degree space on purpose, so the planar distance here is not a real
 * distance on the Earth. The great circle distance is only used for reporting cluster extents.
 */

use crate::Point;
use serde::Serialize;

/// A latitude, longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coord {
    pub lat: f64,
    pub lng: f64,
}

/// Euclidean distance between two points treating latitude and longitude as plane coordinates.
pub fn planar_distance(a: &Point, b: &Point) -> f64 {
    let dlat = a.lat - b.lat;
    let dlng = a.lng - b.lng;
    f64::sqrt(dlat * dlat + dlng * dlng)
}

/// The arithmetic mean of the coordinates. Returns NaN components for an empty slice.
pub fn centroid(points: &[Point]) -> Coord {
    let n = points.len() as f64;
    let (lat, lng) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));

    Coord {
        lat: lat / n,
        lng: lng / n,
    }
}

/**
 * the simple great circle distance calculation.
 *
 * #Arguments
 * * lat1 - the latitude of the first point in degrees.
 * * lon1 - the longitude of the first point in degrees.
 * * lat2 - the latitude of the second point in degrees.
 * * lon2 - the longitude of the second point in degrees.
 *
 * #Returns
 * The distance between the points in kilometers.
 */
pub fn great_circle_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0090;

    let lat1_r = lat1.to_radians();
    let lat2_r = lat2.to_radians();

    let dlat2 = (lat2_r - lat1_r) / 2.0;
    let dlon2 = (lon2 - lon1).to_radians() / 2.0;

    let sin2_dlat = f64::powi(f64::sin(dlat2), 2);
    let sin2_dlon = f64::powi(f64::sin(dlon2), 2);

    let arc = 2.0
        * f64::asin(f64::sqrt(
            sin2_dlat + sin2_dlon * f64::cos(lat1_r) * f64::cos(lat2_r),
        ));

    arc * EARTH_RADIUS_KM
}

#[cfg(test)]
mod test {
    use super::*;

    fn pt(lat: f64, lng: f64) -> Point {
        Point {
            id: String::new(),
            lat,
            lng,
            alt: 0.0,
            speed: 0.0,
            heading: 0.0,
        }
    }

    #[test]
    fn test_planar_distance() {
        assert_eq!(planar_distance(&pt(0.0, 0.0), &pt(3.0, 4.0)), 5.0);
        assert_eq!(planar_distance(&pt(1.0, 1.0), &pt(1.0, 1.0)), 0.0);
    }

    #[test]
    fn test_centroid() {
        let c = centroid(&[pt(1.0, 2.0), pt(3.0, 6.0)]);
        assert_eq!(c, Coord { lat: 2.0, lng: 4.0 });
    }

    #[test]
    fn test_great_circle_one_degree_of_latitude() {
        let d = great_circle_distance(45.0, -120.0, 46.0, -120.0);
        assert!((d - 111.19).abs() < 0.1, "got {}", d);
    }
}

//! Geodesic distance between stop coordinates and position fixes.

/// Mean Earth radius in meters, as used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Great-circle distance between two coordinates in meters, by the
/// haversine formula.
///
/// # Examples
///
/// ```
/// use shuttle_tracker::domain::{Coordinates, distance_meters};
///
/// let a = Coordinates::new(50.1110209, 14.4396771);
/// let d = distance_meters(a, a);
/// assert_eq!(d, 0.0);
/// ```
pub fn distance_meters(a: Coordinates, b: Coordinates) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let delta_phi = (b.lat - a.lat).to_radians();
    let delta_lambda = (b.lon - a.lon).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero_distance() {
        let p = Coordinates::new(50.1110209, 14.4396771);
        assert_eq!(distance_meters(p, p), 0.0);
    }

    #[test]
    fn neighbouring_stops_are_metres_apart() {
        // Two adjacent stops from the sample dataset, roughly 8 m apart.
        let a = Coordinates::new(50.1110209, 14.4396771);
        let b = Coordinates::new(50.1110258, 14.4395624);

        let d = distance_meters(a, b);
        assert!(d > 7.0 && d < 9.5, "distance was {d}");
    }

    #[test]
    fn city_scale_distance() {
        // Prague centre to Brno centre is about 185 km.
        let prague = Coordinates::new(50.0755, 14.4378);
        let brno = Coordinates::new(49.1951, 16.6068);

        let d = distance_meters(prague, brno);
        assert!(d > 180_000.0 && d < 190_000.0, "distance was {d}");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn coordinate()(lat in -85.0f64..85.0, lon in -180.0f64..180.0) -> Coordinates {
            Coordinates::new(lat, lon)
        }
    }

    proptest! {
        /// Distance is never negative
        #[test]
        fn non_negative(a in coordinate(), b in coordinate()) {
            prop_assert!(distance_meters(a, b) >= 0.0);
        }

        /// Distance is symmetric
        #[test]
        fn symmetric(a in coordinate(), b in coordinate()) {
            let ab = distance_meters(a, b);
            let ba = distance_meters(b, a);
            prop_assert!((ab - ba).abs() < 1e-6, "ab={ab} ba={ba}");
        }

        /// A point is at distance zero from itself
        #[test]
        fn identity(a in coordinate()) {
            prop_assert!(distance_meters(a, a).abs() < 1e-9);
        }

        /// No two points on Earth are further apart than half the
        /// circumference
        #[test]
        fn bounded_by_half_circumference(a in coordinate(), b in coordinate()) {
            let half = std::f64::consts::PI * EARTH_RADIUS_METERS;
            prop_assert!(distance_meters(a, b) <= half + 1.0);
        }
    }
}

//! Spatial math for incident lookup and route corridors.

use serde::{Deserialize, Serialize};

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Degrees-to-kilometers approximation: 1 degree ≈ 111 km.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Grid scale for bucket keys. 1/1000 of a degree per cell (~110 m of
/// latitude), matching the precision the backing store is keyed on.
const BUCKET_SCALE: f64 = 1000.0;

/// A rectangle in degrees, used to bound incident queries around a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl SpatialBounds {
    /// Inclusive containment check against the true coordinates.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.south && lat <= self.north && lng >= self.west && lng <= self.east
    }
}

/// Great-circle distance between two points in kilometers.
pub fn haversine_distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lng2 - lng1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Bounding box around a route corridor, expanded by `buffer_km` on every
/// side using the flat 111 km/degree approximation.
///
/// Longitude wraparound at the antimeridian is not handled; corridors are
/// assumed not to cross it.
pub fn route_bounds(
    start_lat: f64,
    start_lng: f64,
    end_lat: f64,
    end_lng: f64,
    buffer_km: f64,
) -> SpatialBounds {
    let buffer_degrees = buffer_km / KM_PER_DEGREE;

    SpatialBounds {
        north: start_lat.max(end_lat) + buffer_degrees,
        south: start_lat.min(end_lat) - buffer_degrees,
        east: start_lng.max(end_lng) + buffer_degrees,
        west: start_lng.min(end_lng) - buffer_degrees,
    }
}

/// Deterministic grid key for a coordinate pair.
///
/// Used only to group candidates for keyed lookups; exact filtering must
/// always re-check true lat/lng against the query bounds.
pub fn bucket_key(lat: f64, lng: f64) -> String {
    let lat_grid = ((lat + 90.0) * BUCKET_SCALE).floor() as i64;
    let lng_grid = ((lng + 180.0) * BUCKET_SCALE).floor() as i64;
    format!("{}_{}", lat_grid, lng_grid)
}

/// Every grid cell key overlapping a bounding box, for prefix queries
/// against a keyed backing store.
pub fn bucket_keys_in_bounds(bounds: &SpatialBounds) -> Vec<String> {
    let lat_min = ((bounds.south + 90.0) * BUCKET_SCALE).floor() as i64;
    let lat_max = ((bounds.north + 90.0) * BUCKET_SCALE).floor() as i64;
    let lng_min = ((bounds.west + 180.0) * BUCKET_SCALE).floor() as i64;
    let lng_max = ((bounds.east + 180.0) * BUCKET_SCALE).floor() as i64;

    let mut keys = Vec::new();
    for lat_grid in lat_min..=lat_max {
        for lng_grid in lng_min..=lng_max {
            keys.push(format!("{}_{}", lat_grid, lng_grid));
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_known_distance() {
        // ~111km between these points (1 degree latitude)
        let dist = haversine_distance_km(0.0, 0.0, 1.0, 0.0);
        assert!((dist - 111.19).abs() < 0.1);
    }

    #[test]
    fn haversine_same_point_is_zero() {
        let dist = haversine_distance_km(26.1224, -80.1373, 26.1224, -80.1373);
        assert!(dist < 1e-9);
    }

    #[test]
    fn haversine_is_symmetric() {
        let d1 = haversine_distance_km(25.7617, -80.1918, 26.7153, -80.0534);
        let d2 = haversine_distance_km(26.7153, -80.0534, 25.7617, -80.1918);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn degenerate_route_bounds_is_centered_square() {
        let buffer_km = 5.0;
        let bounds = route_bounds(26.0, -80.0, 26.0, -80.0, buffer_km);
        let side = 2.0 * buffer_km / KM_PER_DEGREE;

        assert!((bounds.north - bounds.south - side).abs() < 1e-12);
        assert!((bounds.east - bounds.west - side).abs() < 1e-12);
        assert!(((bounds.north + bounds.south) / 2.0 - 26.0).abs() < 1e-12);
        assert!(((bounds.east + bounds.west) / 2.0 - -80.0).abs() < 1e-12);
    }

    #[test]
    fn route_bounds_orders_endpoints() {
        let bounds = route_bounds(26.2, -80.1, 26.0, -80.2, 0.0);
        assert_eq!(bounds.north, 26.2);
        assert_eq!(bounds.south, 26.0);
        assert_eq!(bounds.east, -80.1);
        assert_eq!(bounds.west, -80.2);
    }

    #[test]
    fn bounds_containment_is_inclusive() {
        let bounds = SpatialBounds {
            north: 26.2,
            south: 26.0,
            east: -80.1,
            west: -80.2,
        };
        assert!(bounds.contains(26.2, -80.1));
        assert!(bounds.contains(26.0, -80.2));
        assert!(bounds.contains(26.1, -80.15));
        assert!(!bounds.contains(26.3, -80.15));
        assert!(!bounds.contains(26.1, -80.05));
    }

    #[test]
    fn bucket_key_is_stable() {
        let a = bucket_key(26.1224, -80.1373);
        let b = bucket_key(26.1224, -80.1373);
        assert_eq!(a, b);
    }

    #[test]
    fn nearby_points_share_a_bucket() {
        // Points ~10m apart inside the same 1/1000-degree cell.
        let a = bucket_key(26.12241, -80.13731);
        let b = bucket_key(26.12249, -80.13739);
        assert_eq!(a, b);
    }

    #[test]
    fn bucket_keys_cover_bounds_corners() {
        let bounds = SpatialBounds {
            north: 26.002,
            south: 26.000,
            east: -80.000,
            west: -80.002,
        };
        let keys = bucket_keys_in_bounds(&bounds);
        assert!(keys.contains(&bucket_key(bounds.south, bounds.west)));
        assert!(keys.contains(&bucket_key(bounds.north, bounds.east)));
        assert!(keys.contains(&bucket_key(26.001, -80.001)));
    }
}

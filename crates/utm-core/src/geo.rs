//! Geodesy primitives: great-circle distance, 3D distance, bearing.
//!
//! Pure functions over WGS-84-ish spherical earth. No failure modes.

/// Earth radius in meters, as used throughout the planner and detector.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per degree of latitude (constant at all latitudes).
pub const METERS_PER_DEG_LAT: f64 = 111_320.0;

/// Meters per degree of longitude at a given latitude (shrinks toward the poles).
pub fn meters_per_deg_lon(lat_deg: f64) -> f64 {
    METERS_PER_DEG_LAT * lat_deg.to_radians().cos()
}

/// Great-circle distance between two points, in meters (haversine formula).
pub fn horizontal_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// 3D distance combining great-circle horizontal distance with altitude delta.
pub fn distance_3d(lat1: f64, lon1: f64, alt1: f64, lat2: f64, lon2: f64, alt2: f64) -> f64 {
    let horizontal = horizontal_distance(lat1, lon1, lat2, lon2);
    let vertical = alt2 - alt1;
    (horizontal * horizontal + vertical * vertical).sqrt()
}

/// Offset a position by meters in the north and east directions.
pub fn offset_position(lat: f64, lon: f64, north_m: f64, east_m: f64) -> (f64, f64) {
    let new_lat = lat + north_m / METERS_PER_DEG_LAT;
    let new_lon = lon + east_m / meters_per_deg_lon(lat);
    (new_lat, new_lon)
}

/// Offset a position by a distance and bearing (radians, 0 = north, clockwise).
pub fn offset_by_bearing(lat: f64, lon: f64, distance_m: f64, bearing_rad: f64) -> (f64, f64) {
    let north_m = distance_m * bearing_rad.cos();
    let east_m = distance_m * bearing_rad.sin();
    offset_position(lat, lon, north_m, east_m)
}

/// Bearing from point 1 to point 2, in degrees, normalised to [0, 360).
/// 0 = north, clockwise.
pub fn bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    let deg = x.atan2(y).to_degrees();
    (deg + 360.0) % 360.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_distance_known() {
        // ~111.3km between these points (1 degree latitude)
        let dist = horizontal_distance(0.0, 0.0, 1.0, 0.0);
        assert!((dist - 111_194.0).abs() < 200.0);
    }

    #[test]
    fn horizontal_distance_symmetric_and_nonnegative() {
        let a = horizontal_distance(37.70, -122.40, 37.75, -122.38);
        let b = horizontal_distance(37.75, -122.38, 37.70, -122.40);
        assert!((a - b).abs() < 1e-6);
        assert!(a >= 0.0);
    }

    #[test]
    fn distance_3d_same_point_is_zero() {
        assert!(distance_3d(33.68, -117.82, 50.0, 33.68, -117.82, 50.0) < 1e-9);
    }

    #[test]
    fn bearing_is_normalised() {
        let b = bearing(37.70, -122.40, 37.75, -122.38);
        assert!((0.0..360.0).contains(&b));
    }

    #[test]
    fn bearing_same_point_is_defined() {
        let b = bearing(37.70, -122.40, 37.70, -122.40);
        assert!(b.is_finite());
    }

    #[test]
    fn bearing_due_north() {
        let b = bearing(37.70, -122.40, 37.80, -122.40);
        assert!(b.abs() < 1e-6 || (b - 360.0).abs() < 1e-6);
    }

    #[test]
    fn bearing_due_east() {
        let b = bearing(37.70, -122.40, 37.70, -122.30);
        assert!((b - 90.0).abs() < 1e-6);
    }
}

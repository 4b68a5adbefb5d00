//! Point-in-polygon and operational-area tests.
//!
//! Geofences are 2D polygons with infinite vertical extent; these tests
//! ignore altitude entirely (see design notes in the geofence module).

use crate::config::OperationalArea;

/// Ray-casting (even-odd rule) point-in-polygon test.
///
/// `vertices` is an ordered ring; it does not need to be explicitly closed
/// (first == last) — the edge between the last and first vertex is always
/// considered. Boundary points may be reported either way; callers must not
/// depend on boundary semantics.
pub fn point_in_polygon(lat: f64, lon: f64, vertices: &[(f64, f64)]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (yi, xi) = vertices[i];
        let (yj, xj) = vertices[j];

        if ((yi > lat) != (yj > lat)) && (lon < (xj - xi) * (lat - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Closed-box test against the configured operational area.
pub fn within_operational_area(lat: f64, lon: f64, area: &OperationalArea) -> bool {
    lat >= area.min_lat && lat <= area.max_lat && lon >= area.min_lon && lon <= area.max_lon
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]
    }

    #[test]
    fn point_inside_square() {
        assert!(point_in_polygon(0.5, 0.5, &square()));
    }

    #[test]
    fn point_outside_square() {
        assert!(!point_in_polygon(2.0, 2.0, &square()));
    }

    #[test]
    fn ray_casting_stable_under_vertex_rotation() {
        let base = square();
        let rotated: Vec<(f64, f64)> = base[2..].iter().chain(base[..2].iter()).copied().collect();
        for &(lat, lon) in &[(0.5, 0.5), (2.0, 2.0), (0.1, 0.9)] {
            assert_eq!(
                point_in_polygon(lat, lon, &base),
                point_in_polygon(lat, lon, &rotated)
            );
        }
    }

    #[test]
    fn degenerate_polygon_is_never_inside() {
        assert!(!point_in_polygon(0.5, 0.5, &[(0.0, 0.0), (1.0, 1.0)]));
    }

    #[test]
    fn operational_area_closed_box() {
        let area = OperationalArea {
            min_lat: 37.60,
            max_lat: 37.80,
            min_lon: -122.45,
            max_lon: -122.35,
        };
        assert!(within_operational_area(37.70, -122.40, &area));
        assert!(within_operational_area(37.60, -122.45, &area));
        assert!(!within_operational_area(37.59, -122.40, &area));
        assert!(!within_operational_area(37.70, -122.46, &area));
    }
}

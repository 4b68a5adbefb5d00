//! Geofence cost model: no-fly zones, sensitive-area multipliers, and
//! heading-keyed altitude lanes.

use crate::config::Configuration;
use crate::models::{GeofenceZone, Waypoint};
use crate::polygon::point_in_polygon;

/// True if `(lat, lon)` falls inside any configured no-fly zone.
pub fn in_no_fly(lat: f64, lon: f64, config: &Configuration) -> Option<&GeofenceZone> {
    config
        .no_fly_zones
        .iter()
        .find(|zone| point_in_polygon(lat, lon, &zone.polygon))
}

/// The multiplier to apply to an edge whose midpoint is `(lat, lon)`.
///
/// No-fly zones return `f64::INFINITY`; sensitive areas return their
/// configured multiplier; otherwise 1.0. Multipliers do not stack — a point
/// in more than one zone takes the most restrictive (first no-fly, else
/// the largest sensitive-area multiplier).
pub fn cost_multiplier(lat: f64, lon: f64, config: &Configuration) -> f64 {
    if in_no_fly(lat, lon, config).is_some() {
        return f64::INFINITY;
    }
    config
        .sensitive_areas
        .iter()
        .filter(|zone| point_in_polygon(lat, lon, &zone.polygon))
        .map(|zone| zone.cost_multiplier)
        .fold(1.0, f64::max)
}

/// The altitude lane nearest the current altitude among the layers assigned
/// to the direction of travel implied by `heading_deg` (§4.3).
pub fn altitude_lane(current_altitude_m: f64, heading_deg: f64, config: &Configuration) -> f64 {
    let candidates = config.altitudes_for_heading(heading_deg);
    candidates
        .iter()
        .copied()
        .min_by(|a, b| {
            (a - current_altitude_m)
                .abs()
                .partial_cmp(&(b - current_altitude_m).abs())
                .unwrap()
        })
        .unwrap_or(current_altitude_m)
}

/// Validate that every waypoint in a planned trajectory lies outside all
/// no-fly zones. Used as a post-hoc check on planner output and on
/// externally supplied trajectories.
pub fn validate(waypoints: &[Waypoint], config: &Configuration) -> Result<(), String> {
    for (i, wp) in waypoints.iter().enumerate() {
        if let Some(zone) = in_no_fly(wp.lat, wp.lon, config) {
            return Err(format!("waypoint {i} lies inside no-fly zone {}", zone.name));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeofenceZone;

    fn config_with_zones() -> Configuration {
        let mut config = Configuration::default();
        config.no_fly_zones.push(GeofenceZone {
            name: "airport".to_string(),
            polygon: vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)],
            cost_multiplier: f64::INFINITY,
        });
        config.sensitive_areas.push(GeofenceZone {
            name: "hospital".to_string(),
            polygon: vec![(2.0, 2.0), (2.0, 3.0), (3.0, 3.0), (3.0, 2.0)],
            cost_multiplier: 3.0,
        });
        config
    }

    #[test]
    fn point_in_no_fly_zone_detected() {
        let config = config_with_zones();
        assert!(in_no_fly(0.5, 0.5, &config).is_some());
        assert!(in_no_fly(10.0, 10.0, &config).is_none());
    }

    #[test]
    fn cost_multiplier_reflects_zone_type() {
        let config = config_with_zones();
        assert_eq!(cost_multiplier(0.5, 0.5, &config), f64::INFINITY);
        assert_eq!(cost_multiplier(2.5, 2.5, &config), 3.0);
        assert_eq!(cost_multiplier(10.0, 10.0, &config), 1.0);
    }

    #[test]
    fn altitude_lane_picks_nearest_candidate() {
        let config = Configuration::default();
        // heading 90 -> East lane: [30, 70, 110]
        let lane = altitude_lane(65.0, 90.0, &config);
        assert_eq!(lane, 70.0);
    }

    #[test]
    fn validate_rejects_waypoint_in_no_fly_zone() {
        let config = config_with_zones();
        let waypoints = vec![Waypoint {
            lat: 0.5,
            lon: 0.5,
            altitude_m: 50.0,
            eta: 0.0,
            speed_mps: 10.0,
            heading_deg: 0.0,
        }];
        assert!(validate(&waypoints, &config).is_err());
    }
}

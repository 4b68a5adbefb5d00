//! Process-wide configuration, loaded once and immutable after startup.

use crate::models::GeofenceZone;
use std::collections::HashMap;

/// Cardinal direction bucket used by altitude stratification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Quantise a heading (degrees, any range) into N/E/S/W per §4.3:
    /// N:[315,45), E:[45,135), S:[135,225), W:[225,315).
    pub fn from_heading(heading_deg: f64) -> Self {
        let h = heading_deg.rem_euclid(360.0);
        if !(45.0..315.0).contains(&h) {
            Direction::North
        } else if h < 135.0 {
            Direction::East
        } else if h < 225.0 {
            Direction::South
        } else {
            Direction::West
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperationalArea {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// The recognized, process-wide configuration options (§3).
#[derive(Debug, Clone)]
pub struct Configuration {
    /// Horizontal A* cell size, meters.
    pub grid_resolution_m: f64,
    /// Discrete altitudes the planner may select.
    pub altitude_layers: Vec<f64>,
    /// Cardinal direction -> subset of `altitude_layers`.
    pub direction_altitude_map: HashMap<Direction, Vec<f64>>,
    pub horizontal_separation_m: f64,
    pub vertical_separation_m: f64,
    /// Temporal sampling step for conflict detection, seconds.
    pub time_resolution_s: f64,
    /// Upper bound on conflict-detection sampling window, seconds.
    pub lookahead_time_s: f64,
    pub drone_min_speed_mps: f64,
    pub drone_cruise_speed_mps: f64,
    pub drone_max_speed_mps: f64,
    pub drone_min_altitude_m: f64,
    pub drone_max_altitude_m: f64,
    pub drone_battery_capacity_wh: f64,
    pub drone_power_consumption_w: f64,
    pub operational_area: OperationalArea,
    pub no_fly_zones: Vec<GeofenceZone>,
    pub sensitive_areas: Vec<GeofenceZone>,
    /// A* iteration budget before a plan is abandoned as a failure.
    pub max_iterations: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        let mut direction_altitude_map = HashMap::new();
        direction_altitude_map.insert(Direction::North, vec![50.0, 90.0]);
        direction_altitude_map.insert(Direction::East, vec![30.0, 70.0, 110.0]);
        direction_altitude_map.insert(Direction::South, vec![50.0, 90.0]);
        direction_altitude_map.insert(Direction::West, vec![30.0, 70.0, 110.0]);

        Self {
            grid_resolution_m: 100.0,
            altitude_layers: vec![30.0, 50.0, 70.0, 90.0, 110.0],
            direction_altitude_map,
            horizontal_separation_m: 50.0,
            vertical_separation_m: 15.0,
            time_resolution_s: 5.0,
            lookahead_time_s: 600.0,
            drone_min_speed_mps: 2.0,
            drone_cruise_speed_mps: 12.0,
            drone_max_speed_mps: 18.0,
            drone_min_altitude_m: 0.0,
            drone_max_altitude_m: 150.0,
            drone_battery_capacity_wh: 250.0,
            drone_power_consumption_w: 220.0,
            operational_area: OperationalArea {
                min_lat: 37.60,
                max_lat: 37.80,
                min_lon: -122.45,
                max_lon: -122.35,
            },
            no_fly_zones: Vec::new(),
            sensitive_areas: Vec::new(),
            max_iterations: 200_000,
        }
    }
}

impl Configuration {
    /// Altitudes available for a heading, falling back to the full layer
    /// list when the direction map has no entry (§4.3).
    pub fn altitudes_for_heading(&self, heading_deg: f64) -> &[f64] {
        let direction = Direction::from_heading(heading_deg);
        self.direction_altitude_map
            .get(&direction)
            .filter(|layers| !layers.is_empty())
            .map(|layers| layers.as_slice())
            .unwrap_or(&self.altitude_layers)
    }

    /// Load the process-wide configuration once at startup, from
    /// environment variables with the §3 defaults as fallback (§6: loaded
    /// once, immutable thereafter — no live reconfiguration). Zone lists
    /// and the direction/altitude map are not environment-configurable;
    /// callers that need non-default zones construct a `Configuration` and
    /// overwrite those fields directly before passing it to the
    /// orchestrator.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            grid_resolution_m: env_f64("UTM_GRID_RESOLUTION_M", defaults.grid_resolution_m),
            horizontal_separation_m: env_f64(
                "UTM_HORIZONTAL_SEPARATION_M",
                defaults.horizontal_separation_m,
            ),
            vertical_separation_m: env_f64(
                "UTM_VERTICAL_SEPARATION_M",
                defaults.vertical_separation_m,
            ),
            time_resolution_s: env_f64("UTM_TIME_RESOLUTION_S", defaults.time_resolution_s),
            lookahead_time_s: env_f64("UTM_LOOKAHEAD_TIME_S", defaults.lookahead_time_s),
            drone_min_speed_mps: env_f64("UTM_DRONE_MIN_SPEED_MPS", defaults.drone_min_speed_mps),
            drone_cruise_speed_mps: env_f64(
                "UTM_DRONE_CRUISE_SPEED_MPS",
                defaults.drone_cruise_speed_mps,
            ),
            drone_max_speed_mps: env_f64("UTM_DRONE_MAX_SPEED_MPS", defaults.drone_max_speed_mps),
            drone_min_altitude_m: env_f64(
                "UTM_DRONE_MIN_ALTITUDE_M",
                defaults.drone_min_altitude_m,
            ),
            drone_max_altitude_m: env_f64(
                "UTM_DRONE_MAX_ALTITUDE_M",
                defaults.drone_max_altitude_m,
            ),
            drone_battery_capacity_wh: env_f64(
                "UTM_DRONE_BATTERY_CAPACITY_WH",
                defaults.drone_battery_capacity_wh,
            ),
            drone_power_consumption_w: env_f64(
                "UTM_DRONE_POWER_CONSUMPTION_W",
                defaults.drone_power_consumption_w,
            ),
            max_iterations: std::env::var("UTM_MAX_ITERATIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_iterations),
            operational_area: OperationalArea {
                min_lat: env_f64("UTM_AREA_MIN_LAT", defaults.operational_area.min_lat),
                max_lat: env_f64("UTM_AREA_MAX_LAT", defaults.operational_area.max_lat),
                min_lon: env_f64("UTM_AREA_MIN_LON", defaults.operational_area.min_lon),
                max_lon: env_f64("UTM_AREA_MAX_LON", defaults.operational_area.max_lon),
            },
            ..defaults
        }
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_buckets_match_spec() {
        assert_eq!(Direction::from_heading(0.0), Direction::North);
        assert_eq!(Direction::from_heading(44.9), Direction::North);
        assert_eq!(Direction::from_heading(45.0), Direction::East);
        assert_eq!(Direction::from_heading(90.0), Direction::East);
        assert_eq!(Direction::from_heading(134.9), Direction::East);
        assert_eq!(Direction::from_heading(135.0), Direction::South);
        assert_eq!(Direction::from_heading(224.9), Direction::South);
        assert_eq!(Direction::from_heading(225.0), Direction::West);
        assert_eq!(Direction::from_heading(314.9), Direction::West);
        assert_eq!(Direction::from_heading(315.0), Direction::North);
        assert_eq!(Direction::from_heading(360.0), Direction::North);
        assert_eq!(Direction::from_heading(-10.0), Direction::North);
    }
}

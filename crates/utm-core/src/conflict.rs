//! Conflict detection between committed trajectories.
//!
//! Unlike velocity-extrapolation closest-point-of-approach detectors,
//! this samples each trajectory's own interpolated position at a fixed
//! time resolution — trajectories are already known in full, so there is
//! no need to predict from instantaneous heading and speed.

use crate::config::Configuration;
use crate::models::{Conflict, ConflictSeverity, Trajectory, Waypoint};

/// Interpolate a trajectory's position at `time_s`, linearly between the
/// bracketing waypoints. Returns `None` if `time_s` falls outside the
/// trajectory's [start, end] window.
pub fn interpolate(trajectory: &Trajectory, time_s: f64) -> Option<Waypoint> {
    let waypoints = &trajectory.waypoints;
    if waypoints.is_empty() {
        return None;
    }
    if time_s < trajectory.start_time() || time_s > trajectory.end_time() {
        return None;
    }

    for pair in waypoints.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if time_s >= a.eta && time_s <= b.eta {
            let span = b.eta - a.eta;
            let t = if span > 1e-9 { (time_s - a.eta) / span } else { 0.0 };
            return Some(Waypoint {
                lat: a.lat + (b.lat - a.lat) * t,
                lon: a.lon + (b.lon - a.lon) * t,
                altitude_m: a.altitude_m + (b.altitude_m - a.altitude_m) * t,
                eta: time_s,
                speed_mps: a.speed_mps + (b.speed_mps - a.speed_mps) * t,
                heading_deg: a.heading_deg + (b.heading_deg - a.heading_deg) * t,
            });
        }
    }
    waypoints.last().copied()
}

/// Classify a declared violation into a severity tier per §4.5: the ratio
/// checked is horizontal separation only, since severity grades how deep
/// into the horizontal minimum the pair has come.
fn classify(horizontal_m: f64, config: &Configuration) -> ConflictSeverity {
    if horizontal_m < config.horizontal_separation_m / 2.0 {
        ConflictSeverity::Critical
    } else if horizontal_m < 0.75 * config.horizontal_separation_m {
        ConflictSeverity::Warning
    } else {
        ConflictSeverity::Minor
    }
}

/// Check a single pair of trajectories for a conflict, sampling the
/// overlapping time window at `config.time_resolution_s` steps and
/// returning the first tick at which both horizontal AND vertical
/// separation minima are violated — or `None` if the window is empty or no
/// tick violates.
pub fn check_pair(
    aircraft1_id: &str,
    trajectory1: &Trajectory,
    aircraft2_id: &str,
    trajectory2: &Trajectory,
    config: &Configuration,
) -> Option<Conflict> {
    let window_start = trajectory1.start_time().max(trajectory2.start_time());
    let window_end = trajectory1.end_time().min(trajectory2.end_time());
    if window_start > window_end {
        return None;
    }

    let steps = ((window_end - window_start) / config.time_resolution_s).ceil().max(0.0) as usize;

    for step in 0..=steps {
        let t = (window_start + step as f64 * config.time_resolution_s).min(window_end);

        let (Some(p1), Some(p2)) = (interpolate(trajectory1, t), interpolate(trajectory2, t)) else {
            continue;
        };

        let horizontal = crate::geo::horizontal_distance(p1.lat, p1.lon, p2.lat, p2.lon);
        let vertical = (p1.altitude_m - p2.altitude_m).abs();

        if horizontal < config.horizontal_separation_m && vertical < config.vertical_separation_m {
            return Some(Conflict {
                conflict_id: format!("{aircraft1_id}-{aircraft2_id}-{t:.0}"),
                aircraft1_id: aircraft1_id.to_string(),
                aircraft2_id: aircraft2_id.to_string(),
                position: p1.position(),
                time: t,
                severity: classify(horizontal, config),
                resolution_action: None,
            });
        }
    }
    None
}

/// Check every unordered pair in a set of committed trajectories, keeping
/// only the earliest violation per pair.
pub fn scan_all(trajectories: &[(String, Trajectory)], config: &Configuration) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for i in 0..trajectories.len() {
        for j in (i + 1)..trajectories.len() {
            let (id1, t1) = &trajectories[i];
            let (id2, t2) = &trajectories[j];
            if let Some(conflict) = check_pair(id1, t1, id2, t2, config) {
                conflicts.push(conflict);
            }
        }
    }
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_trajectory(lat0: f64, lon0: f64, alt: f64, start: f64, end: f64) -> Trajectory {
        Trajectory {
            waypoints: vec![
                Waypoint {
                    lat: lat0,
                    lon: lon0,
                    altitude_m: alt,
                    eta: start,
                    speed_mps: 10.0,
                    heading_deg: 0.0,
                },
                Waypoint {
                    lat: lat0 + 0.01,
                    lon: lon0,
                    altitude_m: alt,
                    eta: end,
                    speed_mps: 10.0,
                    heading_deg: 0.0,
                },
            ],
            total_distance_m: 1_000.0,
            total_time_s: end - start,
            estimated_battery_percent: 1.0,
        }
    }

    #[test]
    fn interpolate_returns_endpoint_exactly() {
        let trajectory = straight_trajectory(37.70, -122.40, 50.0, 0.0, 100.0);
        let wp = interpolate(&trajectory, 0.0).unwrap();
        assert_eq!(wp.lat, 37.70);
        let wp_end = interpolate(&trajectory, 100.0).unwrap();
        assert_eq!(wp_end.lat, 37.71);
    }

    #[test]
    fn interpolate_outside_window_is_none() {
        let trajectory = straight_trajectory(37.70, -122.40, 50.0, 0.0, 100.0);
        assert!(interpolate(&trajectory, -1.0).is_none());
        assert!(interpolate(&trajectory, 101.0).is_none());
    }

    #[test]
    fn identical_trajectories_conflict_critically() {
        let config = Configuration::default();
        let t1 = straight_trajectory(37.70, -122.40, 50.0, 0.0, 100.0);
        let t2 = straight_trajectory(37.70, -122.40, 50.0, 0.0, 100.0);
        let conflict = check_pair("a1", &t1, "a2", &t2, &config);
        assert_eq!(conflict.unwrap().severity, ConflictSeverity::Critical);
    }

    #[test]
    fn check_pair_reports_only_the_earliest_violation() {
        let config = Configuration::default();
        let t1 = straight_trajectory(37.70, -122.40, 50.0, 0.0, 100.0);
        let t2 = straight_trajectory(37.70, -122.40, 50.0, 0.0, 100.0);
        let conflict = check_pair("a1", &t1, "a2", &t2, &config).unwrap();
        assert_eq!(conflict.time, 0.0);
    }

    #[test]
    fn well_separated_trajectories_do_not_conflict() {
        let config = Configuration::default();
        let t1 = straight_trajectory(37.70, -122.40, 50.0, 0.0, 100.0);
        let t2 = straight_trajectory(38.70, -120.40, 50.0, 0.0, 100.0);
        let conflict = check_pair("a1", &t1, "a2", &t2, &config);
        assert!(conflict.is_none());
    }

    #[test]
    fn vertically_separated_trajectories_do_not_conflict() {
        let config = Configuration::default();
        let t1 = straight_trajectory(37.70, -122.40, 50.0, 0.0, 100.0);
        let t2 = straight_trajectory(37.70, -122.40, 200.0, 0.0, 100.0);
        let conflict = check_pair("a1", &t1, "a2", &t2, &config);
        assert!(conflict.is_none());
    }
}

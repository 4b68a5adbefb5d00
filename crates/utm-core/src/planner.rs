//! Time-parameterized 4D A* pathfinder over a discretized lat/lon/alt
//! lattice.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::config::Configuration;
use crate::error::PlanError;
use crate::geo::{bearing, distance_3d, horizontal_distance, METERS_PER_DEG_LAT};
use crate::geofence::{altitude_lane, cost_multiplier, in_no_fly};
use crate::models::{Position, Trajectory, Waypoint};
use crate::polygon::within_operational_area;

/// Coarse node identity: positions are rounded before hashing so that the
/// closed/open sets treat near-identical floating-point states as the same
/// lattice cell. Matches the grid resolution configured for the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodeKey {
    lat_milli: i64,
    lon_milli: i64,
    alt_dm: i64,
}

impl NodeKey {
    fn from_position(lat: f64, lon: f64, altitude_m: f64) -> Self {
        Self {
            lat_milli: (lat * 1_000_000.0).round() as i64,
            lon_milli: (lon * 1_000_000.0).round() as i64,
            alt_dm: (altitude_m * 10.0).round() as i64,
        }
    }
}

/// A node explored by the search: position plus the arrival time implied by
/// the path taken to reach it.
#[derive(Debug, Clone, Copy)]
struct Node {
    lat: f64,
    lon: f64,
    altitude_m: f64,
    time_s: f64,
    speed_mps: f64,
    heading_deg: f64,
}

impl Node {
    fn key(&self) -> NodeKey {
        NodeKey::from_position(self.lat, self.lon, self.altitude_m)
    }
}

/// `f64` wrapper that is orderable for use as a `BinaryHeap` priority.
/// NaN never occurs here: costs and heuristics are sums/quotients of
/// distances and speeds, never produced from invalid input.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FloatOrd(f64);

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

/// An entry in the open set, indexed into the `nodes` arena so that
/// `came_from` pointers are integer handles rather than cloned `Node`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNode {
    priority: FloatOrd,
    handle: usize,
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse so the lowest priority pops first.
        other.priority.cmp(&self.priority)
    }
}

/// §4.4: an altitude-lane candidate is only worth inserting when it differs
/// from the current altitude by more than this many meters.
const ALTITUDE_LANE_GAP_M: f64 = 10.0;
/// §4.4: goal test radius multiplier on `GRID_RESOLUTION`.
const GOAL_RADIUS_GRID_CELLS: f64 = 1.5;

/// Plan a 4D trajectory from `start` to `goal`, departing at `start_time_s`
/// (seconds since epoch), cruising at `speed_mps`.
pub fn plan(
    start: Position,
    goal: Position,
    start_time_s: f64,
    speed_mps: f64,
    config: &Configuration,
) -> Result<Trajectory, PlanError> {
    if !within_operational_area(start.lat, start.lon, &config.operational_area) {
        return Err(PlanError::StartOutsideArea);
    }
    if !within_operational_area(goal.lat, goal.lon, &config.operational_area) {
        return Err(PlanError::GoalOutsideArea);
    }
    if let Some(zone) = in_no_fly(start.lat, start.lon, config) {
        return Err(PlanError::StartInNoFlyZone {
            zone: zone.name.clone(),
        });
    }
    if let Some(zone) = in_no_fly(goal.lat, goal.lon, config) {
        return Err(PlanError::GoalInNoFlyZone {
            zone: zone.name.clone(),
        });
    }

    let start_heading = bearing(start.lat, start.lon, goal.lat, goal.lon);
    let start_node = Node {
        lat: start.lat,
        lon: start.lon,
        altitude_m: start.altitude_m,
        time_s: start_time_s,
        speed_mps,
        heading_deg: start_heading,
    };

    // Arena of visited nodes, indexed by handle. `came_from[h]` is the
    // handle of the node that led to `nodes[h]`, or `None` for the start.
    let mut nodes: Vec<Node> = vec![start_node];
    let mut came_from: Vec<Option<usize>> = vec![None];
    let mut g_score: HashMap<NodeKey, f64> = HashMap::new();
    let mut best_handle: HashMap<NodeKey, usize> = HashMap::new();
    let mut closed: HashMap<NodeKey, bool> = HashMap::new();

    g_score.insert(start_node.key(), 0.0);
    best_handle.insert(start_node.key(), 0);

    let mut open = BinaryHeap::new();
    open.push(OpenNode {
        priority: FloatOrd(heuristic(&start_node, &goal, config)),
        handle: 0,
    });

    let mut iterations = 0usize;

    while let Some(OpenNode { handle, .. }) = open.pop() {
        iterations += 1;
        if iterations > config.max_iterations {
            return Err(PlanError::SearchExhausted {
                iterations: config.max_iterations,
            });
        }

        let current = nodes[handle];
        let key = current.key();
        if closed.get(&key).copied().unwrap_or(false) {
            continue;
        }
        closed.insert(key, true);

        if is_goal(&current, &goal, config) {
            return Ok(reconstruct(&nodes, &came_from, handle, goal, config));
        }

        for neighbor in neighbors(&current, &goal, config) {
            let neighbor_key = neighbor.key();
            if closed.get(&neighbor_key).copied().unwrap_or(false) {
                continue;
            }

            let multiplier = cost_multiplier(neighbor.lat, neighbor.lon, config);
            if !multiplier.is_finite() {
                continue;
            }
            let step_distance = distance_3d(
                current.lat,
                current.lon,
                current.altitude_m,
                neighbor.lat,
                neighbor.lon,
                neighbor.altitude_m,
            );
            let tentative_g = g_score[&key] + step_distance * multiplier;

            let existing = g_score.get(&neighbor_key).copied().unwrap_or(f64::INFINITY);
            if tentative_g < existing {
                g_score.insert(neighbor_key, tentative_g);
                nodes.push(neighbor);
                came_from.push(Some(handle));
                let new_handle = nodes.len() - 1;
                best_handle.insert(neighbor_key, new_handle);
                let priority = tentative_g + heuristic(&neighbor, &goal, config);
                open.push(OpenNode {
                    priority: FloatOrd(priority),
                    handle: new_handle,
                });
            }
        }
    }

    Err(PlanError::SearchExhausted {
        iterations: config.max_iterations,
    })
}

/// §4.4 goal test: success once the node is within `1.5 * GRID_RESOLUTION`
/// of the goal in 3D, a single combined threshold rather than independent
/// horizontal/vertical tolerances.
fn is_goal(node: &Node, goal: &Position, config: &Configuration) -> bool {
    distance_3d(node.lat, node.lon, node.altitude_m, goal.lat, goal.lon, goal.altitude_m)
        < GOAL_RADIUS_GRID_CELLS * config.grid_resolution_m
}

/// 3D distance to goal divided by max speed. This underestimates true cost
/// whenever any edge on the optimal path crosses a sensitive-area
/// multiplier greater than 1 (which it typically does), so the heuristic is
/// not admissible in the strict sense — it is a documented approximation
/// traded for search speed, matching the original planner's behavior.
fn heuristic(node: &Node, goal: &Position, config: &Configuration) -> f64 {
    distance_3d(
        node.lat,
        node.lon,
        node.altitude_m,
        goal.lat,
        goal.lon,
        goal.altitude_m,
    ) / config.drone_max_speed_mps
}

/// Generate the 8 horizontal compass neighbors, each paired with the
/// altitude candidate set from §4.4: `{current_alt}`, plus the
/// heading-to-goal altitude lane and the midpoint between them when that
/// lane differs from the current altitude by more than
/// `ALTITUDE_LANE_GAP_M` — never the whole per-direction layer list, so a
/// single edge never crosses more than one altitude-layer delta.
fn neighbors(current: &Node, goal: &Position, config: &Configuration) -> Vec<Node> {
    let mut out = Vec::with_capacity(OFFSETS.len() * 3);

    // §4.4: step_lat = R/111320; step_lon = R/(111320*cos(lat)).
    let lat_step = config.grid_resolution_m / METERS_PER_DEG_LAT;
    let cos_lat = current.lat.to_radians().cos().max(0.1);
    let lon_step = config.grid_resolution_m / (METERS_PER_DEG_LAT * cos_lat);

    let heading_to_goal = bearing(current.lat, current.lon, goal.lat, goal.lon);
    let lane_altitude = altitude_lane(current.altitude_m, heading_to_goal, config);
    let mut altitude_options = vec![current.altitude_m];
    if (lane_altitude - current.altitude_m).abs() > ALTITUDE_LANE_GAP_M {
        altitude_options.push(lane_altitude);
        altitude_options.push((current.altitude_m + lane_altitude) / 2.0);
    }

    for (dlat, dlon) in OFFSETS {
        let lat = current.lat + dlat * lat_step;
        let lon = current.lon + dlon * lon_step;
        let heading = bearing(current.lat, current.lon, lat, lon);
        let horizontal = horizontal_distance(current.lat, current.lon, lat, lon);

        let speed = cruise_speed_toward(goal, config);
        let dt = (horizontal / speed).max(config.time_resolution_s);

        for &altitude_m in &altitude_options {
            out.push(Node {
                lat,
                lon,
                altitude_m,
                time_s: current.time_s + dt,
                speed_mps: speed,
                heading_deg: heading,
            });
        }
    }
    out
}

const OFFSETS: [(f64, f64); 8] = [
    (1.0, 0.0),
    (1.0, 1.0),
    (0.0, 1.0),
    (-1.0, 1.0),
    (-1.0, 0.0),
    (-1.0, -1.0),
    (0.0, -1.0),
    (1.0, -1.0),
];

fn cruise_speed_toward(_goal: &Position, config: &Configuration) -> f64 {
    config.drone_cruise_speed_mps
}

fn reconstruct(
    nodes: &[Node],
    came_from: &[Option<usize>],
    goal_handle: usize,
    goal: Position,
    config: &Configuration,
) -> Trajectory {
    let mut chain = Vec::new();
    let mut cursor = Some(goal_handle);
    while let Some(handle) = cursor {
        chain.push(nodes[handle]);
        cursor = came_from[handle];
    }
    chain.reverse();

    let mut waypoints: Vec<Waypoint> = chain
        .iter()
        .map(|n| Waypoint {
            lat: n.lat,
            lon: n.lon,
            altitude_m: n.altitude_m,
            eta: n.time_s,
            speed_mps: n.speed_mps,
            heading_deg: n.heading_deg,
        })
        .collect();

    // Append the exact goal as the final waypoint so the trajectory lands
    // precisely on the requested destination rather than the nearest cell.
    if let Some(last) = waypoints.last() {
        let tail_distance = distance_3d(
            last.lat,
            last.lon,
            last.altitude_m,
            goal.lat,
            goal.lon,
            goal.altitude_m,
        );
        let tail_dt = (tail_distance / last.speed_mps.max(0.1)).max(0.0);
        waypoints.push(Waypoint {
            lat: goal.lat,
            lon: goal.lon,
            altitude_m: goal.altitude_m,
            eta: last.eta + tail_dt,
            speed_mps: last.speed_mps,
            heading_deg: last.heading_deg,
        });
    }

    let total_distance_m: f64 = waypoints
        .windows(2)
        .map(|pair| {
            distance_3d(
                pair[0].lat,
                pair[0].lon,
                pair[0].altitude_m,
                pair[1].lat,
                pair[1].lon,
                pair[1].altitude_m,
            )
        })
        .sum();
    let total_time_s = waypoints.last().unwrap().eta - waypoints.first().unwrap().eta;

    // §4.7: battery consumed is proportional to flight time at the
    // configured draw, expressed as a percentage of total capacity.
    let estimated_battery_percent = total_time_s * config.drone_power_consumption_w
        / config.drone_battery_capacity_wh
        * 100.0
        / 3600.0;

    let trajectory = Trajectory {
        waypoints,
        total_distance_m,
        total_time_s,
        estimated_battery_percent,
    };
    trajectory.assert_well_formed();
    trajectory
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plans_direct_route_in_open_airspace() {
        let config = Configuration::default();
        let start = Position::new(37.70, -122.40, 50.0);
        let goal = Position::new(37.705, -122.395, 50.0);
        let trajectory = plan(start, goal, 0.0, 10.0, &config).expect("plan should succeed");
        trajectory.assert_well_formed();
        assert!(trajectory.waypoints.len() >= 2);
        assert!(trajectory.total_distance_m > 0.0);
    }

    #[test]
    fn rejects_start_outside_operational_area() {
        let config = Configuration::default();
        let start = Position::new(0.0, 0.0, 50.0);
        let goal = Position::new(37.705, -122.395, 50.0);
        assert!(matches!(
            plan(start, goal, 0.0, 10.0, &config),
            Err(PlanError::StartOutsideArea)
        ));
    }

    #[test]
    fn rejects_goal_inside_no_fly_zone() {
        let mut config = Configuration::default();
        config.no_fly_zones.push(crate::models::GeofenceZone {
            name: "test-zone".to_string(),
            polygon: vec![
                (37.700, -122.400),
                (37.700, -122.390),
                (37.710, -122.390),
                (37.710, -122.400),
            ],
            cost_multiplier: f64::INFINITY,
        });
        let start = Position::new(37.65, -122.44, 50.0);
        let goal = Position::new(37.705, -122.395, 50.0);
        assert!(matches!(
            plan(start, goal, 0.0, 10.0, &config),
            Err(PlanError::GoalInNoFlyZone { .. })
        ));
    }
}

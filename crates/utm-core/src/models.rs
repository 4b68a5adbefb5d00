//! Core data models for the UTM planner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A 3D position: latitude/longitude in degrees, altitude in meters AGL.
///
/// Invariant (enforced by callers, not by construction): lies inside the
/// operational bounding box and outside all prohibited polygons at planning
/// time. Latitude ∈ [-90,90], longitude ∈ [-180,180], altitude ∈ [0,150].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
    pub altitude_m: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64, altitude_m: f64) -> Self {
        Self { lat, lon, altitude_m }
    }

    /// True if any coordinate is NaN — an internal-consistency bug per §7.
    pub fn has_nan(&self) -> bool {
        self.lat.is_nan() || self.lon.is_nan() || self.altitude_m.is_nan()
    }
}

/// Position plus an absolute timestamp (seconds since epoch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position4D {
    pub lat: f64,
    pub lon: f64,
    pub altitude_m: f64,
    pub timestamp: f64,
}

impl Position4D {
    pub fn position(&self) -> Position {
        Position::new(self.lat, self.lon, self.altitude_m)
    }
}

/// A single waypoint in a trajectory.
///
/// Invariants: MIN_SPEED <= speed_mps <= MAX_SPEED; eta non-decreasing along
/// a trajectory; successive waypoints separated by at most two grid cells
/// horizontally and one altitude-layer delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lon: f64,
    pub altitude_m: f64,
    /// Estimated time of arrival, seconds since epoch.
    pub eta: f64,
    pub speed_mps: f64,
    /// Degrees, 0 = north, clockwise.
    pub heading_deg: f64,
}

impl Waypoint {
    pub fn position(&self) -> Position {
        Position::new(self.lat, self.lon, self.altitude_m)
    }
}

/// An ordered flight path plus derived totals.
///
/// Invariants: at least 2 waypoints; first waypoint's eta equals the
/// declared start time; adjacent waypoints respect distance/speed ≈ Δt
/// within ±TIME_RESOLUTION; all waypoints lie outside prohibited zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub waypoints: Vec<Waypoint>,
    pub total_distance_m: f64,
    pub total_time_s: f64,
    /// Percent of battery capacity consumed, estimated.
    pub estimated_battery_percent: f64,
}

impl Trajectory {
    /// Fatal-condition assertion per §7: a trajectory with fewer than two
    /// waypoints, non-monotonic ETAs, or NaN in any numeric field indicates
    /// internal inconsistency and should crash the process.
    pub fn assert_well_formed(&self) {
        assert!(
            self.waypoints.len() >= 2,
            "trajectory has fewer than 2 waypoints"
        );
        let mut last_eta = f64::NEG_INFINITY;
        for (i, wp) in self.waypoints.iter().enumerate() {
            assert!(
                !wp.lat.is_nan()
                    && !wp.lon.is_nan()
                    && !wp.altitude_m.is_nan()
                    && !wp.eta.is_nan()
                    && !wp.speed_mps.is_nan()
                    && !wp.heading_deg.is_nan(),
                "waypoint {i} contains NaN"
            );
            assert!(
                wp.eta + 1e-6 >= last_eta,
                "waypoint {i} eta {} precedes previous eta {last_eta}",
                wp.eta
            );
            last_eta = wp.eta;
        }
        assert!(
            !self.total_distance_m.is_nan()
                && !self.total_time_s.is_nan()
                && !self.estimated_battery_percent.is_nan(),
            "trajectory totals contain NaN"
        );
    }

    pub fn start_time(&self) -> f64 {
        self.waypoints.first().map(|w| w.eta).unwrap_or(0.0)
    }

    pub fn end_time(&self) -> f64 {
        self.waypoints.last().map(|w| w.eta).unwrap_or(0.0)
    }
}

/// Status shared by aircraft and missions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Idle,
    Assigned,
    EnRoutePickup,
    AtPickup,
    EnRouteDelivery,
    AtDelivery,
    Returning,
    Emergency,
    Maintenance,
    /// Submitted but no aircraft is idle; awaiting assignment.
    Queued,
}

/// Real-time aircraft telemetry report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub aircraft_id: String,
    pub lat: f64,
    pub lon: f64,
    pub altitude_m: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub velocity_z: f64,
    pub battery_percent: f64,
    pub status: Status,
    pub timestamp: DateTime<Utc>,
}

/// Current known state of a registered aircraft (telemetry plus identity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftState {
    pub aircraft_id: String,
    pub lat: f64,
    pub lon: f64,
    pub altitude_m: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub velocity_z: f64,
    pub battery_percent: f64,
    pub status: Status,
    pub timestamp: DateTime<Utc>,
    /// Optional registration profile metadata (model, payload, range, cruise speed).
    #[serde(default)]
    pub profile: Option<AircraftProfile>,
}

impl AircraftState {
    pub fn position(&self) -> Position {
        Position::new(self.lat, self.lon, self.altitude_m)
    }

    pub fn from_telemetry(telemetry: &Telemetry, profile: Option<AircraftProfile>) -> Self {
        Self {
            aircraft_id: telemetry.aircraft_id.clone(),
            lat: telemetry.lat,
            lon: telemetry.lon,
            altitude_m: telemetry.altitude_m,
            velocity_x: telemetry.velocity_x,
            velocity_y: telemetry.velocity_y,
            velocity_z: telemetry.velocity_z,
            battery_percent: telemetry.battery_percent,
            status: telemetry.status,
            timestamp: telemetry.timestamp,
            profile,
        }
    }

    /// Apply a telemetry update in place, deriving a battery-driven status
    /// transition per §7 (<20% warning is an event only; <10% becomes
    /// `emergency`). Returns true if the status changed.
    pub fn apply_telemetry(&mut self, telemetry: &Telemetry) -> bool {
        self.lat = telemetry.lat;
        self.lon = telemetry.lon;
        self.altitude_m = telemetry.altitude_m;
        self.velocity_x = telemetry.velocity_x;
        self.velocity_y = telemetry.velocity_y;
        self.velocity_z = telemetry.velocity_z;
        self.battery_percent = telemetry.battery_percent;
        self.timestamp = telemetry.timestamp;

        let previous = self.status;
        self.status = if telemetry.battery_percent < 10.0 {
            Status::Emergency
        } else {
            telemetry.status
        };
        previous != self.status
    }
}

/// Optional registration-time profile, supplementing `register_aircraft`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftProfile {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_payload_kg")]
    pub max_payload_kg: f64,
    #[serde(default = "default_max_range_m")]
    pub max_range_m: f64,
    #[serde(default = "default_cruise_speed_mps")]
    pub cruise_speed_mps: f64,
}

fn default_model() -> String {
    "generic_delivery_x1".to_string()
}
fn default_max_payload_kg() -> f64 {
    5.0
}
fn default_max_range_m() -> f64 {
    15_000.0
}
fn default_cruise_speed_mps() -> f64 {
    10.0
}

impl Default for AircraftProfile {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_payload_kg: default_max_payload_kg(),
            max_range_m: default_max_range_m(),
            cruise_speed_mps: default_cruise_speed_mps(),
        }
    }
}

/// A pickup→delivery mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub mission_id: String,
    pub aircraft_id: Option<String>,
    pub pickup: Position,
    pub delivery: Position,
    pub created_at: DateTime<Utc>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: Status,
    pub trajectory: Option<Trajectory>,
}

/// A request to create a delivery mission.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryRequest {
    pub pickup: Position,
    pub delivery: Position,
}

/// Conflict severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSeverity {
    Minor,
    Warning,
    Critical,
}

/// A detected space-time conflict between two trajectories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    pub conflict_id: String,
    pub aircraft1_id: String,
    pub aircraft2_id: String,
    pub position: Position,
    /// Seconds since epoch.
    pub time: f64,
    pub severity: ConflictSeverity,
    pub resolution_action: Option<String>,
}

/// A named polygonal airspace restriction with a cost multiplier.
///
/// `cost_multiplier` of `+inf` means prohibited. Polygons are 2D with
/// infinite vertical extent — altitude is never checked against them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeofenceZone {
    pub name: String,
    /// Ordered (lat, lon) vertices; the ring is implicitly closed.
    pub polygon: Vec<(f64, f64)>,
    pub cost_multiplier: f64,
}

impl GeofenceZone {
    pub fn is_prohibited(&self) -> bool {
        self.cost_multiplier.is_infinite()
    }
}

/// Fleet-wide summary, supplementing §6's read-only queries (from the
/// original `SystemStatus` model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemHealth {
    Operational,
    Degraded,
    Offline,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStatus {
    pub active_aircraft: usize,
    pub active_missions: usize,
    pub total_missions: usize,
    pub conflicts_detected: u64,
    pub conflicts_resolved: u64,
    pub system_health: SystemHealth,
}

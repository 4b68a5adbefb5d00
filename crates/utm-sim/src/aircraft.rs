//! A single simulated aircraft: straight-line waypoint following with a
//! proportional battery drain model.

use chrono::Utc;

use utm_core::geo::{bearing, distance_3d, offset_by_bearing};
use utm_core::{Configuration, Position, Status, Telemetry, Trajectory};

/// Within this horizontal+vertical distance of a waypoint, the aircraft is
/// considered to have arrived and advances to the next one.
const ARRIVAL_RADIUS_M: f64 = 5.0;

/// Extra power draw while climbing, as a multiple of level-flight draw.
const CLIMB_POWER_MULTIPLIER: f64 = 1.5;

pub struct VirtualAircraft {
    pub aircraft_id: String,
    lat: f64,
    lon: f64,
    altitude_m: f64,
    velocity_x: f64,
    velocity_y: f64,
    velocity_z: f64,
    battery_percent: f64,
    status: Status,
    trajectory: Option<Trajectory>,
    waypoint_index: usize,
}

impl VirtualAircraft {
    pub fn new(aircraft_id: impl Into<String>, start: Position) -> Self {
        Self {
            aircraft_id: aircraft_id.into(),
            lat: start.lat,
            lon: start.lon,
            altitude_m: start.altitude_m,
            velocity_x: 0.0,
            velocity_y: 0.0,
            velocity_z: 0.0,
            battery_percent: 100.0,
            status: Status::Idle,
            trajectory: None,
            waypoint_index: 0,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.lat, self.lon, self.altitude_m)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn battery_percent(&self) -> f64 {
        self.battery_percent
    }

    /// Start following a newly committed trajectory from its first
    /// waypoint.
    pub fn assign_trajectory(&mut self, trajectory: Trajectory) {
        tracing::debug!(
            aircraft_id = %self.aircraft_id,
            waypoints = trajectory.waypoints.len(),
            "trajectory assigned"
        );
        self.trajectory = Some(trajectory);
        self.waypoint_index = 0;
        self.status = Status::EnRoutePickup;
    }

    /// Advance the simulation by `dt_s` seconds: move toward the current
    /// target waypoint, drain the battery proportionally to flight time
    /// (extra draw while climbing), and transition status on arrival or
    /// low battery. Returns `true` if `status` changed this tick.
    pub fn update(&mut self, dt_s: f64, config: &Configuration) -> bool {
        let previous_status = self.status;

        if self.status == Status::Idle {
            return false;
        }
        let Some(trajectory) = &self.trajectory else {
            return false;
        };

        if self.waypoint_index >= trajectory.waypoints.len() {
            self.status = Status::AtDelivery;
            self.velocity_x = 0.0;
            self.velocity_y = 0.0;
            self.velocity_z = 0.0;
            return previous_status != self.status;
        }

        let target = trajectory.waypoints[self.waypoint_index];
        let distance = distance_3d(self.lat, self.lon, self.altitude_m, target.lat, target.lon, target.altitude_m);

        if distance < ARRIVAL_RADIUS_M {
            self.waypoint_index += 1;
            if self.waypoint_index >= trajectory.waypoints.len() {
                self.status = Status::AtDelivery;
                self.velocity_x = 0.0;
                self.velocity_y = 0.0;
                self.velocity_z = 0.0;
            }
            return previous_status != self.status;
        }

        let heading = bearing(self.lat, self.lon, target.lat, target.lon);
        let alt_diff = target.altitude_m - self.altitude_m;
        let speed = target.speed_mps.max(config.drone_min_speed_mps);
        let horizontal_step = (speed * dt_s).min(distance);

        let (new_lat, new_lon) = offset_by_bearing(self.lat, self.lon, horizontal_step, heading.to_radians());
        let alt_step = alt_diff.signum() * (speed * dt_s).min(alt_diff.abs());

        self.velocity_x = speed * heading.to_radians().sin();
        self.velocity_y = speed * heading.to_radians().cos();
        self.velocity_z = alt_step / dt_s.max(1e-6);

        self.lat = new_lat;
        self.lon = new_lon;
        self.altitude_m += alt_step;

        let climbing = alt_diff > 0.0;
        let power_w = config.drone_power_consumption_w * if climbing { CLIMB_POWER_MULTIPLIER } else { 1.0 };
        let consumed_percent = power_w * dt_s / (config.drone_battery_capacity_wh * 3600.0) * 100.0;
        self.battery_percent = (self.battery_percent - consumed_percent).max(0.0);

        if self.battery_percent < 10.0 {
            self.status = Status::Emergency;
        } else if self.battery_percent < 20.0 {
            tracing::warn!(aircraft_id = %self.aircraft_id, battery_percent = self.battery_percent, "low battery");
        }

        previous_status != self.status
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            aircraft_id: self.aircraft_id.clone(),
            lat: self.lat,
            lon: self.lon,
            altitude_m: self.altitude_m,
            velocity_x: self.velocity_x,
            velocity_y: self.velocity_y,
            velocity_z: self.velocity_z,
            battery_percent: self.battery_percent,
            status: self.status,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use utm_core::Waypoint;

    fn trajectory_to(lat: f64, lon: f64, alt: f64, speed: f64) -> Trajectory {
        Trajectory {
            waypoints: vec![
                Waypoint { lat, lon, altitude_m: alt, eta: 0.0, speed_mps: speed, heading_deg: 0.0 },
            ],
            total_distance_m: 1000.0,
            total_time_s: 100.0,
            estimated_battery_percent: 1.0,
        }
    }

    #[test]
    fn arrives_and_transitions_to_at_delivery() {
        let config = Configuration::default();
        let mut aircraft = VirtualAircraft::new("a1", Position::new(37.70, -122.40, 50.0));
        aircraft.assign_trajectory(trajectory_to(37.70, -122.40, 50.0, 10.0));
        let changed = aircraft.update(1.0, &config);
        assert!(changed);
        assert_eq!(aircraft.status(), Status::AtDelivery);
    }

    #[test]
    fn moves_toward_distant_waypoint_without_arriving() {
        let config = Configuration::default();
        let mut aircraft = VirtualAircraft::new("a1", Position::new(37.70, -122.40, 50.0));
        aircraft.assign_trajectory(trajectory_to(37.80, -122.40, 50.0, 10.0));
        aircraft.update(1.0, &config);
        assert_eq!(aircraft.status(), Status::EnRoutePickup);
        assert!(aircraft.lat > 37.70);
    }

    #[test]
    fn battery_drains_over_time() {
        let config = Configuration::default();
        let mut aircraft = VirtualAircraft::new("a1", Position::new(37.70, -122.40, 50.0));
        aircraft.assign_trajectory(trajectory_to(37.80, -122.40, 50.0, 10.0));
        aircraft.update(60.0, &config);
        assert!(aircraft.battery_percent() < 100.0);
    }
}

//! Telemetry construction helpers.

use chrono::Utc;

use utm_core::{Status, Telemetry};

/// Build a telemetry report from a ground-track heading/speed pair rather
/// than raw velocity components — the common case for a physics simulator
/// or flight controller that tracks heading, not vector velocity.
///
/// `heading_deg`: 0 = north, clockwise. `speed_mps`: ground speed.
pub fn from_heading_speed(
    aircraft_id: impl Into<String>,
    lat: f64,
    lon: f64,
    altitude_m: f64,
    heading_deg: f64,
    speed_mps: f64,
    battery_percent: f64,
    status: Status,
) -> Telemetry {
    let heading_rad = heading_deg.to_radians();
    let velocity_x = speed_mps * heading_rad.sin(); // east component
    let velocity_y = speed_mps * heading_rad.cos(); // north component

    Telemetry {
        aircraft_id: aircraft_id.into(),
        lat,
        lon,
        altitude_m,
        velocity_x,
        velocity_y,
        velocity_z: 0.0,
        battery_percent,
        status,
        timestamp: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_east_heading_has_positive_x_velocity_only() {
        let telemetry = from_heading_speed("a1", 0.0, 0.0, 50.0, 90.0, 10.0, 80.0, Status::EnRoutePickup);
        assert!((telemetry.velocity_x - 10.0).abs() < 1e-6);
        assert!(telemetry.velocity_y.abs() < 1e-6);
    }

    #[test]
    fn due_north_heading_has_positive_y_velocity_only() {
        let telemetry = from_heading_speed("a1", 0.0, 0.0, 50.0, 0.0, 10.0, 80.0, Status::EnRoutePickup);
        assert!(telemetry.velocity_x.abs() < 1e-6);
        assert!((telemetry.velocity_y - 10.0).abs() < 1e-6);
    }
}

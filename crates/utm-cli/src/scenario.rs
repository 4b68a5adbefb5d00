//! Scripted multi-aircraft scenarios for exercising the planner end to end.

use utm_core::geo::offset_by_bearing;
use utm_core::Position;

/// One leg of a scripted scenario: an aircraft flying from `start` to `end`.
pub struct ScenarioLeg {
    pub aircraft_id: String,
    pub start: Position,
    pub end: Position,
}

/// Two aircraft on a head-on collision course through `center`: one flying
/// west-to-east, the other east-to-west, both at the same altitude. Submitted
/// as simultaneous missions, their planned trajectories are near-guaranteed
/// to trip a conflict near the midpoint.
pub fn crossing_scenario(center: Position, offset_m: f64) -> Vec<ScenarioLeg> {
    let (west_lat, west_lon) = offset_by_bearing(center.lat, center.lon, offset_m, 270.0_f64.to_radians());
    let (east_lat, east_lon) = offset_by_bearing(center.lat, center.lon, offset_m, 90.0_f64.to_radians());
    let (north_lat, north_lon) = offset_by_bearing(center.lat, center.lon, offset_m, 0.0_f64.to_radians());
    let (south_lat, south_lon) = offset_by_bearing(center.lat, center.lon, offset_m, 180.0_f64.to_radians());

    vec![
        ScenarioLeg {
            aircraft_id: "demo-alpha".to_string(),
            start: Position::new(west_lat, west_lon, center.altitude_m),
            end: Position::new(east_lat, east_lon, center.altitude_m),
        },
        ScenarioLeg {
            aircraft_id: "demo-beta".to_string(),
            start: Position::new(north_lat, north_lon, center.altitude_m),
            end: Position::new(south_lat, south_lon, center.altitude_m),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_scenario_produces_two_legs_around_center() {
        let center = Position::new(37.70, -122.40, 50.0);
        let legs = crossing_scenario(center, 300.0);
        assert_eq!(legs.len(), 2);
        assert_ne!(legs[0].start.lat, legs[1].start.lat);
    }
}

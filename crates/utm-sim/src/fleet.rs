//! A fleet of virtual aircraft, driven together by a caller's own tick
//! loop (the CLI demo scenario, typically).

use rand::Rng;

use utm_core::{Configuration, Position, Trajectory};

use crate::aircraft::VirtualAircraft;

pub struct Fleet {
    aircraft: Vec<VirtualAircraft>,
}

impl Fleet {
    pub fn new() -> Self {
        Self { aircraft: Vec::new() }
    }

    /// Spawn `count` aircraft at random positions within the operational
    /// area, at altitudes drawn from the configured layers, named
    /// `{prefix}-{n}`.
    pub fn spawn_random(count: usize, prefix: &str, config: &Configuration) -> Self {
        let mut rng = rand::thread_rng();
        let area = &config.operational_area;
        let aircraft = (1..=count)
            .map(|i| {
                let lat = rng.gen_range(area.min_lat..=area.max_lat);
                let lon = rng.gen_range(area.min_lon..=area.max_lon);
                let altitude_m = config.altitude_layers[rng.gen_range(0..config.altitude_layers.len())];
                VirtualAircraft::new(format!("{prefix}-{i:03}"), Position::new(lat, lon, altitude_m))
            })
            .collect();
        Self { aircraft }
    }

    pub fn push(&mut self, aircraft: VirtualAircraft) {
        self.aircraft.push(aircraft);
    }

    pub fn get_mut(&mut self, aircraft_id: &str) -> Option<&mut VirtualAircraft> {
        self.aircraft.iter_mut().find(|a| a.aircraft_id == aircraft_id)
    }

    pub fn assign(&mut self, aircraft_id: &str, trajectory: Trajectory) -> bool {
        match self.get_mut(aircraft_id) {
            Some(aircraft) => {
                aircraft.assign_trajectory(trajectory);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &VirtualAircraft> {
        self.aircraft.iter()
    }

    /// Advance every aircraft by `dt_s`, returning the ids whose status
    /// changed this tick.
    pub fn tick(&mut self, dt_s: f64, config: &Configuration) -> Vec<String> {
        self.aircraft
            .iter_mut()
            .filter(|a| a.update(dt_s, config))
            .map(|a| a.aircraft_id.clone())
            .collect()
    }
}

impl Default for Fleet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_random_produces_named_fleet_within_area() {
        let config = Configuration::default();
        let fleet = Fleet::spawn_random(5, "drone", &config);
        assert_eq!(fleet.iter().count(), 5);
        for aircraft in fleet.iter() {
            assert!(aircraft.aircraft_id.starts_with("drone-"));
        }
    }
}

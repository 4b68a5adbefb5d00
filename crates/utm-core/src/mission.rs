//! Mission orchestrator: the sole mutator of aircraft, mission, and
//! committed-trajectory tables. Single-threaded and synchronous by design —
//! callers (the server's request handlers and background loops) serialize
//! access to a single `MissionOrchestrator` instance, which guarantees that
//! sequential `submit` calls commit trajectories in submission order.

use std::collections::{HashMap, VecDeque};

use chrono::Utc;

use crate::config::Configuration;
use crate::conflict::check_pair;
use crate::error::MissionError;
use crate::geofence::in_no_fly;
use crate::models::{AircraftState, Conflict, Mission, Position, Status, SystemHealth, SystemStatus, Telemetry, Trajectory};
use crate::planner::plan;
use crate::polygon::within_operational_area;
use crate::resolver::{resolve, Resolution};

/// Dwell time at the pickup point before departing for delivery, seconds.
const PICKUP_DWELL_S: f64 = 30.0;

#[derive(Debug, Default)]
struct Counters {
    total_missions: u64,
    conflicts_detected: u64,
    conflicts_resolved: u64,
}

pub struct MissionOrchestrator {
    config: Configuration,
    aircraft: HashMap<String, AircraftState>,
    missions: HashMap<String, Mission>,
    /// Mission ids awaiting assignment, in submission order.
    queue: VecDeque<String>,
    /// Committed trajectories, keyed by aircraft id, used for deconfliction.
    committed: HashMap<String, Trajectory>,
    conflicts: Vec<Conflict>,
    counters: Counters,
    next_mission_seq: u64,
}

impl MissionOrchestrator {
    pub fn new(config: Configuration) -> Self {
        Self {
            config,
            aircraft: HashMap::new(),
            missions: HashMap::new(),
            queue: VecDeque::new(),
            committed: HashMap::new(),
            conflicts: Vec::new(),
            counters: Counters::default(),
            next_mission_seq: 0,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Register a new aircraft. §6: `register_aircraft(id, position) → ok |
    /// duplicate` — re-registering an already-known identifier is rejected
    /// rather than silently overwriting its state; use `update_telemetry`
    /// for idempotent state updates.
    pub fn register_aircraft(&mut self, state: AircraftState) -> Result<(), MissionError> {
        if self.aircraft.contains_key(&state.aircraft_id) {
            return Err(MissionError::DuplicateAircraft(state.aircraft_id));
        }
        self.aircraft.insert(state.aircraft_id.clone(), state);
        Ok(())
    }

    pub fn aircraft(&self, aircraft_id: &str) -> Option<&AircraftState> {
        self.aircraft.get(aircraft_id)
    }

    pub fn list_aircraft(&self) -> impl Iterator<Item = &AircraftState> {
        self.aircraft.values()
    }

    /// Apply a telemetry update, returning whether the status transitioned
    /// (e.g. into `Emergency` from a low-battery reading, per §7).
    pub fn update_telemetry(&mut self, telemetry: &Telemetry) -> Result<bool, MissionError> {
        let aircraft = self
            .aircraft
            .get_mut(&telemetry.aircraft_id)
            .ok_or_else(|| MissionError::UnknownAircraft(telemetry.aircraft_id.clone()))?;
        Ok(aircraft.apply_telemetry(telemetry))
    }

    pub fn mission(&self, mission_id: &str) -> Option<&Mission> {
        self.missions.get(mission_id)
    }

    pub fn list_missions(&self) -> impl Iterator<Item = &Mission> {
        self.missions.values()
    }

    /// Submit a new delivery request. Assigns it to an idle aircraft
    /// immediately if one is available (FIFO over idle aircraft by
    /// insertion order); otherwise the mission is queued.
    pub fn submit(&mut self, pickup: Position, delivery: Position) -> Result<Mission, MissionError> {
        self.validate_request(pickup)?;
        self.validate_request(delivery)?;

        self.next_mission_seq += 1;
        let mission_id = format!("mission-{}", self.next_mission_seq);
        let mut mission = Mission {
            mission_id: mission_id.clone(),
            aircraft_id: None,
            pickup,
            delivery,
            created_at: Utc::now(),
            assigned_at: None,
            completed_at: None,
            status: Status::Queued,
            trajectory: None,
        };
        self.counters.total_missions += 1;

        if let Some(aircraft_id) = self.next_idle_aircraft() {
            self.assign(&mut mission, &aircraft_id)?;
        } else {
            self.queue.push_back(mission_id.clone());
        }

        self.missions.insert(mission_id, mission.clone());
        Ok(mission)
    }

    /// Pre-validate a pickup or delivery position against the operational
    /// area and no-fly zones, independent of aircraft availability — a bad
    /// position should fail the request even when a drone is free to fly.
    fn validate_request(&self, position: Position) -> Result<(), MissionError> {
        if !within_operational_area(position.lat, position.lon, &self.config.operational_area) {
            return Err(MissionError::OutsideArea);
        }
        if let Some(zone) = in_no_fly(position.lat, position.lon, &self.config) {
            return Err(MissionError::InNoFlyZone {
                zone: zone.name.clone(),
            });
        }
        Ok(())
    }

    /// FIFO idle-aircraft selection: the first aircraft in insertion order
    /// whose status is `Idle`.
    fn next_idle_aircraft(&self) -> Option<String> {
        self.aircraft
            .values()
            .find(|a| a.status == Status::Idle)
            .map(|a| a.aircraft_id.clone())
    }

    /// Plan current→pickup and pickup→delivery legs, deconflict against all
    /// committed trajectories, and commit the result.
    fn assign(&mut self, mission: &mut Mission, aircraft_id: &str) -> Result<(), MissionError> {
        let aircraft = self
            .aircraft
            .get(aircraft_id)
            .ok_or_else(|| MissionError::UnknownAircraft(aircraft_id.to_string()))?
            .clone();

        let cruise_speed = aircraft
            .profile
            .as_ref()
            .map(|p| p.cruise_speed_mps)
            .unwrap_or(self.config.drone_cruise_speed_mps);

        let now = Utc::now().timestamp() as f64;
        let leg1 = plan(aircraft.position(), mission.pickup, now, cruise_speed, &self.config)?;
        let pickup_departure = leg1.end_time() + PICKUP_DWELL_S;
        let leg2 = plan(mission.pickup, mission.delivery, pickup_departure, cruise_speed, &self.config)?;

        let mut trajectory = concatenate(&leg1, &leg2);
        trajectory.assert_well_formed();

        trajectory = self.deconflict(aircraft_id, trajectory)?;

        if let Some(aircraft) = self.aircraft.get_mut(aircraft_id) {
            aircraft.status = Status::Assigned;
        }
        mission.aircraft_id = Some(aircraft_id.to_string());
        mission.assigned_at = Some(Utc::now());
        mission.status = Status::Assigned;
        mission.trajectory = Some(trajectory.clone());

        self.committed.insert(aircraft_id.to_string(), trajectory);
        Ok(())
    }

    /// Check the candidate trajectory against every other committed
    /// trajectory and escalate through the resolver on conflict.
    fn deconflict(&mut self, aircraft_id: &str, mut candidate: Trajectory) -> Result<Trajectory, MissionError> {
        let others: Vec<(String, Trajectory)> = self
            .committed
            .iter()
            .filter(|(id, _)| id.as_str() != aircraft_id)
            .map(|(id, t)| (id.clone(), t.clone()))
            .collect();

        for (other_id, other_trajectory) in &others {
            let Some(conflict) = check_pair(aircraft_id, &candidate, other_id, other_trajectory, &self.config) else {
                continue;
            };
            self.counters.conflicts_detected += 1;
            self.conflicts.push(conflict.clone());

            match resolve(other_id, other_trajectory, aircraft_id, &candidate, &conflict, &self.config) {
                Resolution::SpeedAdjusted { second, .. } | Resolution::AltitudeShifted { second, .. } => {
                    candidate = second;
                    self.counters.conflicts_resolved += 1;
                }
                Resolution::ReplanRequired => return Err(MissionError::ReplanRequired),
            }
        }
        Ok(candidate)
    }

    /// Re-attempt assignment for queued missions against currently idle
    /// aircraft. Called by the server's periodic queue-drain loop and on
    /// telemetry transitions into `Idle`.
    pub fn drain_queue(&mut self) -> Vec<String> {
        let mut assigned = Vec::new();
        while let Some(aircraft_id) = self.next_idle_aircraft() {
            let Some(mission_id) = self.queue.pop_front() else {
                break;
            };
            let Some(mut mission) = self.missions.get(&mission_id).cloned() else {
                continue;
            };
            if self.assign(&mut mission, &aircraft_id).is_ok() {
                self.missions.insert(mission_id.clone(), mission);
                assigned.push(mission_id);
            } else {
                // Could not plan or deconflict right now; leave queued for the
                // next drain attempt rather than dropping the mission.
                self.queue.push_front(mission_id);
                break;
            }
        }
        assigned
    }

    pub fn abort(&mut self, mission_id: &str) -> Result<(), MissionError> {
        let mission = self
            .missions
            .get_mut(mission_id)
            .ok_or_else(|| MissionError::UnknownMission(mission_id.to_string()))?;

        if let Some(aircraft_id) = &mission.aircraft_id {
            self.committed.remove(aircraft_id);
            if let Some(aircraft) = self.aircraft.get_mut(aircraft_id) {
                aircraft.status = Status::Idle;
            }
        }
        mission.status = Status::Returning;
        mission.trajectory = None;
        self.queue.retain(|id| id != mission_id);
        Ok(())
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Re-scan every committed trajectory pair for conflicts, recording any
    /// that weren't already caught at assignment time (e.g. introduced by a
    /// trajectory update outside `assign`). Returns the freshly found ones.
    pub fn rescan_conflicts(&mut self) -> Vec<Conflict> {
        let trajectories: Vec<(String, Trajectory)> = self
            .committed
            .iter()
            .map(|(id, t)| (id.clone(), t.clone()))
            .collect();
        let found = crate::conflict::scan_all(&trajectories, &self.config);
        let known: std::collections::HashSet<&str> =
            self.conflicts.iter().map(|c| c.conflict_id.as_str()).collect();
        let fresh: Vec<Conflict> = found
            .into_iter()
            .filter(|c| !known.contains(c.conflict_id.as_str()))
            .collect();
        if !fresh.is_empty() {
            self.counters.conflicts_detected += fresh.len() as u64;
            self.conflicts.extend(fresh.clone());
        }
        fresh
    }

    pub fn system_status(&self) -> SystemStatus {
        let active_aircraft = self
            .aircraft
            .values()
            .filter(|a| a.status != Status::Maintenance)
            .count();
        let active_missions = self
            .missions
            .values()
            .filter(|m| !matches!(m.status, Status::AtDelivery | Status::Returning))
            .count();
        let any_emergency = self.aircraft.values().any(|a| a.status == Status::Emergency);
        let system_health = if any_emergency {
            SystemHealth::Degraded
        } else if active_aircraft == 0 {
            SystemHealth::Offline
        } else {
            SystemHealth::Operational
        };

        SystemStatus {
            active_aircraft,
            active_missions,
            total_missions: self.counters.total_missions as usize,
            conflicts_detected: self.counters.conflicts_detected,
            conflicts_resolved: self.counters.conflicts_resolved,
            system_health,
        }
    }
}

/// Join two legs into a single trajectory, keeping the dwell gap between
/// them (the first leg's last waypoint and the second leg's first waypoint
/// both sit at the pickup position, at different times).
fn concatenate(leg1: &Trajectory, leg2: &Trajectory) -> Trajectory {
    let mut waypoints = leg1.waypoints.clone();
    waypoints.extend(leg2.waypoints.iter().copied());

    let total_distance_m = leg1.total_distance_m + leg2.total_distance_m;
    let total_time_s = waypoints.last().unwrap().eta - waypoints.first().unwrap().eta;
    Trajectory {
        waypoints,
        total_distance_m,
        total_time_s,
        estimated_battery_percent: leg1.estimated_battery_percent + leg2.estimated_battery_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn idle_aircraft(id: &str, lat: f64, lon: f64) -> AircraftState {
        AircraftState {
            aircraft_id: id.to_string(),
            lat,
            lon,
            altitude_m: 50.0,
            velocity_x: 0.0,
            velocity_y: 0.0,
            velocity_z: 0.0,
            battery_percent: 100.0,
            status: Status::Idle,
            timestamp: Utc::now(),
            profile: None,
        }
    }

    #[test]
    fn submit_assigns_immediately_when_aircraft_idle() {
        let mut orchestrator = MissionOrchestrator::new(Configuration::default());
        orchestrator.register_aircraft(idle_aircraft("a1", 37.70, -122.40)).unwrap();

        let pickup = Position::new(37.702, -122.398, 50.0);
        let delivery = Position::new(37.705, -122.395, 50.0);
        let mission = orchestrator.submit(pickup, delivery).expect("submit should succeed");

        assert_eq!(mission.aircraft_id.as_deref(), Some("a1"));
        assert_eq!(mission.status, Status::Assigned);
        assert!(mission.trajectory.is_some());
    }

    #[test]
    fn submit_queues_when_no_aircraft_idle() {
        let mut orchestrator = MissionOrchestrator::new(Configuration::default());
        let pickup = Position::new(37.702, -122.398, 50.0);
        let delivery = Position::new(37.705, -122.395, 50.0);
        let mission = orchestrator.submit(pickup, delivery).expect("submit should succeed");

        assert!(mission.aircraft_id.is_none());
        assert_eq!(mission.status, Status::Queued);
    }

    #[test]
    fn drain_queue_assigns_once_aircraft_registered() {
        let mut orchestrator = MissionOrchestrator::new(Configuration::default());
        let pickup = Position::new(37.702, -122.398, 50.0);
        let delivery = Position::new(37.705, -122.395, 50.0);
        orchestrator.submit(pickup, delivery).unwrap();

        orchestrator.register_aircraft(idle_aircraft("a1", 37.70, -122.40)).unwrap();
        let assigned = orchestrator.drain_queue();
        assert_eq!(assigned.len(), 1);
    }

    #[test]
    fn system_status_reflects_emergency_aircraft() {
        let mut orchestrator = MissionOrchestrator::new(Configuration::default());
        let mut aircraft = idle_aircraft("a1", 37.70, -122.40);
        aircraft.status = Status::Emergency;
        orchestrator.register_aircraft(aircraft).unwrap();

        let status = orchestrator.system_status();
        assert_eq!(status.system_health, SystemHealth::Degraded);
    }
}

//! Shared application state.
//!
//! `MissionOrchestrator` is single-threaded by design (it is the sole
//! mutator of the aircraft/mission/committed-trajectory tables); this
//! module serializes access to it behind a single `tokio::sync::Mutex` so
//! that sequential submissions commit trajectories in submission order,
//! per the orchestrator's ordering guarantee.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, Mutex};

use utm_core::{
    AircraftState, Conflict, Configuration, DeliveryRequest, Mission, MissionError, Position,
    Status, SystemStatus, Telemetry,
};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Events broadcast over the server's WebSocket stream.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    AircraftRegistered { aircraft_id: String },
    Telemetry(Telemetry),
    BatteryWarning { aircraft_id: String, battery_percent: f64 },
    Emergency { aircraft_id: String, battery_percent: f64 },
    MissionCreated(Mission),
    MissionAssigned(Mission),
    ConflictDetected(Conflict),
    ConflictResolved { aircraft1_id: String, aircraft2_id: String, action: String },
}

pub struct AppState {
    orchestrator: Mutex<utm_core::MissionOrchestrator>,
    events: broadcast::Sender<ServerEvent>,
}

impl AppState {
    pub fn new(config: Configuration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            orchestrator: Mutex::new(utm_core::MissionOrchestrator::new(config)),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: ServerEvent) {
        // No subscribers is the common case outside of an open WS connection.
        let _ = self.events.send(event);
    }

    pub async fn register_aircraft(&self, state: AircraftState) -> Result<(), MissionError> {
        let aircraft_id = state.aircraft_id.clone();
        self.orchestrator.lock().await.register_aircraft(state)?;
        self.emit(ServerEvent::AircraftRegistered { aircraft_id });
        Ok(())
    }

    pub async fn aircraft(&self, aircraft_id: &str) -> Option<AircraftState> {
        self.orchestrator.lock().await.aircraft(aircraft_id).cloned()
    }

    pub async fn list_aircraft(&self) -> Vec<AircraftState> {
        self.orchestrator
            .lock()
            .await
            .list_aircraft()
            .cloned()
            .collect()
    }

    /// Apply a telemetry update, emit battery/emergency events, then
    /// attempt to drain the mission queue (a newly idle aircraft may be
    /// able to take a queued mission).
    pub async fn update_telemetry(&self, telemetry: Telemetry) -> Result<(), MissionError> {
        let battery_percent = telemetry.battery_percent;
        let aircraft_id = telemetry.aircraft_id.clone();
        let became_emergency = {
            let mut orchestrator = self.orchestrator.lock().await;
            let changed = orchestrator.update_telemetry(&telemetry)?;
            changed && orchestrator.aircraft(&aircraft_id).map(|a| a.status) == Some(Status::Emergency)
        };

        self.emit(ServerEvent::Telemetry(telemetry));
        if became_emergency {
            self.emit(ServerEvent::Emergency { aircraft_id: aircraft_id.clone(), battery_percent });
        } else if battery_percent < 20.0 {
            self.emit(ServerEvent::BatteryWarning { aircraft_id, battery_percent });
        }

        self.drain_queue().await;
        Ok(())
    }

    pub async fn submit_mission(&self, request: DeliveryRequest) -> Result<Mission, MissionError> {
        let mission = self
            .orchestrator
            .lock()
            .await
            .submit(request.pickup, request.delivery)?;
        if mission.aircraft_id.is_some() {
            self.emit(ServerEvent::MissionAssigned(mission.clone()));
        }
        self.emit(ServerEvent::MissionCreated(mission.clone()));
        Ok(mission)
    }

    pub async fn mission(&self, mission_id: &str) -> Option<Mission> {
        self.orchestrator.lock().await.mission(mission_id).cloned()
    }

    pub async fn list_missions(&self) -> Vec<Mission> {
        self.orchestrator.lock().await.list_missions().cloned().collect()
    }

    pub async fn abort_mission(&self, mission_id: &str) -> Result<(), MissionError> {
        self.orchestrator.lock().await.abort(mission_id)
    }

    pub async fn conflicts(&self) -> Vec<Conflict> {
        self.orchestrator.lock().await.conflicts().to_vec()
    }

    pub async fn system_status(&self) -> SystemStatus {
        self.orchestrator.lock().await.system_status()
    }

    pub async fn no_fly_zones(&self) -> Vec<utm_core::GeofenceZone> {
        self.orchestrator.lock().await.config().no_fly_zones.clone()
    }

    pub async fn sensitive_areas(&self) -> Vec<utm_core::GeofenceZone> {
        self.orchestrator.lock().await.config().sensitive_areas.clone()
    }

    pub async fn check_point(&self, lat: f64, lon: f64) -> bool {
        let orchestrator = self.orchestrator.lock().await;
        utm_core::geofence::in_no_fly(lat, lon, orchestrator.config()).is_some()
    }

    /// Re-scan committed trajectories for conflicts not already caught at
    /// assignment time. Called by the periodic background loop.
    pub async fn rescan_conflicts(&self) -> Vec<Conflict> {
        let fresh = self.orchestrator.lock().await.rescan_conflicts();
        for conflict in &fresh {
            self.emit(ServerEvent::ConflictDetected(conflict.clone()));
        }
        fresh
    }

    /// Re-attempt assignment of queued missions. Called after every
    /// telemetry update and by the periodic background loop.
    pub async fn drain_queue(&self) -> Vec<Mission> {
        let assigned_ids = self.orchestrator.lock().await.drain_queue();
        let mut assigned = Vec::with_capacity(assigned_ids.len());
        for mission_id in assigned_ids {
            if let Some(mission) = self.orchestrator.lock().await.mission(&mission_id).cloned() {
                self.emit(ServerEvent::MissionAssigned(mission.clone()));
                assigned.push(mission);
            }
        }
        assigned
    }
}

pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn idle_aircraft(id: &str) -> AircraftState {
        AircraftState {
            aircraft_id: id.to_string(),
            lat: 37.70,
            lon: -122.40,
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

    #[tokio::test]
    async fn submit_assigns_to_registered_idle_aircraft() {
        let state = AppState::new(Configuration::default());
        state.register_aircraft(idle_aircraft("a1")).await.unwrap();

        let request = DeliveryRequest {
            pickup: Position::new(37.702, -122.398, 50.0),
            delivery: Position::new(37.705, -122.395, 50.0),
        };
        let mission = state.submit_mission(request).await.unwrap();
        assert_eq!(mission.aircraft_id.as_deref(), Some("a1"));
    }

    #[tokio::test]
    async fn telemetry_drains_queue_for_newly_idle_aircraft() {
        let state = AppState::new(Configuration::default());
        let request = DeliveryRequest {
            pickup: Position::new(37.702, -122.398, 50.0),
            delivery: Position::new(37.705, -122.395, 50.0),
        };
        let mission = state.submit_mission(request).await.unwrap();
        assert_eq!(mission.status, Status::Queued);

        state.register_aircraft(idle_aircraft("a1")).await.unwrap();
        let telemetry = Telemetry {
            aircraft_id: "a1".to_string(),
            lat: 37.70,
            lon: -122.40,
            altitude_m: 50.0,
            velocity_x: 0.0,
            velocity_y: 0.0,
            velocity_z: 0.0,
            battery_percent: 100.0,
            status: Status::Idle,
            timestamp: Utc::now(),
        };
        state.update_telemetry(telemetry).await.unwrap();

        let refreshed = state.mission(&mission.mission_id).await.unwrap();
        assert_eq!(refreshed.status, Status::Assigned);
    }
}

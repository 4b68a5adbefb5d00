//! Aircraft registration and telemetry endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Deserialize;

use utm_core::{AircraftProfile, AircraftState, Status, Telemetry};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterAircraftRequest {
    pub aircraft_id: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub altitude_m: f64,
    #[serde(default)]
    pub profile: Option<AircraftProfile>,
}

pub async fn register_aircraft(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterAircraftRequest>,
) -> StatusCode {
    let aircraft = AircraftState {
        aircraft_id: req.aircraft_id,
        lat: req.lat,
        lon: req.lon,
        altitude_m: req.altitude_m,
        velocity_x: 0.0,
        velocity_y: 0.0,
        velocity_z: 0.0,
        battery_percent: 100.0,
        status: Status::Idle,
        timestamp: Utc::now(),
        profile: req.profile,
    };
    match state.register_aircraft(aircraft).await {
        Ok(()) => StatusCode::CREATED,
        Err(utm_core::MissionError::DuplicateAircraft(_)) => StatusCode::CONFLICT,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn list_aircraft(State(state): State<Arc<AppState>>) -> Json<Vec<AircraftState>> {
    Json(state.list_aircraft().await)
}

pub async fn get_aircraft(
    State(state): State<Arc<AppState>>,
    axum::extract::Path(aircraft_id): axum::extract::Path<String>,
) -> Result<Json<AircraftState>, StatusCode> {
    state
        .aircraft(&aircraft_id)
        .await
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn update_telemetry(
    State(state): State<Arc<AppState>>,
    Json(telemetry): Json<Telemetry>,
) -> StatusCode {
    match state.update_telemetry(telemetry).await {
        Ok(()) => StatusCode::ACCEPTED,
        Err(utm_core::MissionError::UnknownAircraft(_)) => StatusCode::NOT_FOUND,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

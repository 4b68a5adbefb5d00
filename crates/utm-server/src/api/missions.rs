//! Mission submission and query endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use utm_core::{DeliveryRequest, Mission, MissionError};

use crate::state::AppState;

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// Map a mission submission failure onto the error taxonomy: bad positions
/// are a client error, planning/resolution failures are a conflict the
/// caller can retry.
fn mission_error_response(err: MissionError) -> (StatusCode, Json<ErrorBody>) {
    let (status, code) = match &err {
        MissionError::OutsideArea => (StatusCode::UNPROCESSABLE_ENTITY, "outside_area"),
        MissionError::InNoFlyZone { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "in_no_fly"),
        MissionError::Plan(_) => (StatusCode::UNPROCESSABLE_ENTITY, "plan_failed"),
        MissionError::ReplanRequired => (StatusCode::CONFLICT, "replan_required"),
        MissionError::NoAircraftAvailable => (StatusCode::OK, "no_aircraft_available"),
        MissionError::UnknownAircraft(_) => (StatusCode::NOT_FOUND, "unknown_aircraft"),
        MissionError::UnknownMission(_) => (StatusCode::NOT_FOUND, "unknown_mission"),
    };
    (
        status,
        Json(ErrorBody {
            error: code,
            message: err.to_string(),
        }),
    )
}

pub async fn submit_mission(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeliveryRequest>,
) -> Result<(StatusCode, Json<Mission>), (StatusCode, Json<ErrorBody>)> {
    state
        .submit_mission(req)
        .await
        .map(|mission| (StatusCode::CREATED, Json(mission)))
        .map_err(mission_error_response)
}

pub async fn list_missions(State(state): State<Arc<AppState>>) -> Json<Vec<Mission>> {
    Json(state.list_missions().await)
}

pub async fn get_mission(
    State(state): State<Arc<AppState>>,
    axum::extract::Path(mission_id): axum::extract::Path<String>,
) -> Result<Json<Mission>, StatusCode> {
    state
        .mission(&mission_id)
        .await
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn abort_mission(
    State(state): State<Arc<AppState>>,
    axum::extract::Path(mission_id): axum::extract::Path<String>,
) -> StatusCode {
    match state.abort_mission(&mission_id).await {
        Ok(()) => StatusCode::OK,
        Err(utm_core::MissionError::UnknownMission(_)) => StatusCode::NOT_FOUND,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn list_conflicts(State(state): State<Arc<AppState>>) -> Json<Vec<utm_core::Conflict>> {
    Json(state.conflicts().await)
}

pub async fn system_status(State(state): State<Arc<AppState>>) -> Json<utm_core::SystemStatus> {
    Json(state.system_status().await)
}

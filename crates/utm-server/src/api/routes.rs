//! REST + WebSocket route table.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::{aircraft, geofences, missions, ws};
use crate::state::AppState;

pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/aircraft/register", post(aircraft::register_aircraft))
        .route("/v1/aircraft", get(aircraft::list_aircraft))
        .route("/v1/aircraft/:id", get(aircraft::get_aircraft))
        .route("/v1/telemetry", post(aircraft::update_telemetry))
        .route("/v1/missions", post(missions::submit_mission))
        .route("/v1/missions", get(missions::list_missions))
        .route("/v1/missions/:id", get(missions::get_mission))
        .route("/v1/missions/:id/abort", post(missions::abort_mission))
        .route("/v1/conflicts", get(missions::list_conflicts))
        .route("/v1/status", get(missions::system_status))
        .route("/v1/geofences", get(geofences::list_geofences))
        .route("/v1/geofences/check", get(geofences::check_point))
        .route("/v1/stream", get(ws::ws_handler))
}

//! Read-only geofence queries.
//!
//! Geofences are part of the process-wide configuration (§3/§6) rather than
//! a mutable resource — there is no create/update/delete surface here.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use utm_core::GeofenceZone;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GeofenceSnapshot {
    pub no_fly_zones: Vec<GeofenceZone>,
    pub sensitive_areas: Vec<GeofenceZone>,
}

pub async fn list_geofences(State(state): State<Arc<AppState>>) -> Json<GeofenceSnapshot> {
    Json(GeofenceSnapshot {
        no_fly_zones: state.no_fly_zones().await,
        sensitive_areas: state.sensitive_areas().await,
    })
}

#[derive(Debug, serde::Deserialize)]
pub struct PointCheckQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize)]
pub struct PointCheckResponse {
    pub in_no_fly_zone: bool,
}

pub async fn check_point(
    State(state): State<Arc<AppState>>,
    axum::extract::Query(query): axum::extract::Query<PointCheckQuery>,
) -> Json<PointCheckResponse> {
    Json(PointCheckResponse {
        in_no_fly_zone: state.check_point(query.lat, query.lon).await,
    })
}

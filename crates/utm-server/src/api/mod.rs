//! API routes for the UTM server.

mod aircraft;
mod geofences;
mod missions;
pub mod request_id;
mod routes;
mod ws;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    routes::create_router()
}

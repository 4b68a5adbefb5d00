//! UTM core - pure logic for 4D pathfinding, geofencing, conflict
//! detection/resolution, and mission orchestration.
//!
//! This crate contains the domain models and planning logic with NO
//! networking dependencies.

pub mod conflict;
pub mod config;
pub mod error;
pub mod geo;
pub mod geofence;
pub mod mission;
pub mod models;
pub mod planner;
pub mod polygon;
pub mod resolver;

pub use config::{Configuration, Direction, OperationalArea};
pub use error::{MissionError, PlanError};
pub use mission::MissionOrchestrator;
pub use models::{
    AircraftProfile, AircraftState, Conflict, ConflictSeverity, DeliveryRequest, GeofenceZone,
    Mission, Position, Position4D, Status, SystemHealth, SystemStatus, Telemetry, Trajectory,
    Waypoint,
};

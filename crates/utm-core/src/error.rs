//! Error types at the `utm-core` API boundary.
//!
//! Internal-consistency violations (§7: malformed trajectories, NaN
//! propagation) are not represented here — those panic via
//! `Trajectory::assert_well_formed` rather than returning a `Result`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("start position is outside the operational area")]
    StartOutsideArea,
    #[error("goal position is outside the operational area")]
    GoalOutsideArea,
    #[error("start position lies inside a no-fly zone: {zone}")]
    StartInNoFlyZone { zone: String },
    #[error("goal position lies inside a no-fly zone: {zone}")]
    GoalInNoFlyZone { zone: String },
    #[error("no path found within {iterations} iterations")]
    SearchExhausted { iterations: usize },
}

#[derive(Debug, Error)]
pub enum MissionError {
    #[error("planning failed: {0}")]
    Plan(#[from] PlanError),
    #[error("pickup or delivery position is outside the operational area")]
    OutsideArea,
    #[error("pickup or delivery position lies inside a no-fly zone: {zone}")]
    InNoFlyZone { zone: String },
    #[error("no aircraft available; mission queued")]
    NoAircraftAvailable,
    #[error("unknown aircraft: {0}")]
    UnknownAircraft(String),
    #[error("aircraft already registered: {0}")]
    DuplicateAircraft(String),
    #[error("unknown mission: {0}")]
    UnknownMission(String),
    #[error("conflict could not be resolved by speed or altitude adjustment; replan required")]
    ReplanRequired,
}

//! Virtual drone fleet simulator.
//!
//! This is the "virtual-drone physics simulator" named as an external
//! collaborator in the planner's purpose/scope and external-interfaces
//! sections: straight-line waypoint following, proportional battery drain,
//! and status transitions. `utm-core` has no dependency on this crate —
//! it only consumes the `Trajectory`/`Telemetry` types the simulator
//! produces telemetry against.

mod aircraft;
mod fleet;

pub use aircraft::VirtualAircraft;
pub use fleet::Fleet;

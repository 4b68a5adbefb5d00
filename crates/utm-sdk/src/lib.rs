//! UTM SDK - client library for aircraft-side integration with the UTM
//! system.
//!
//! Provides a simple API for drones and fleet controllers to register,
//! stream telemetry, submit delivery missions, and subscribe to the
//! server's event stream.

pub mod client;
pub mod events;
pub mod telemetry;

pub use client::UtmClient;
pub use events::{Event, EventStream};
pub use utm_core::Telemetry;

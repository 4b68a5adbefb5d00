//! Scripted demo: two aircraft on a crossing collision course, submitted as
//! simultaneous missions against a running UTM server. Watches the event
//! stream for the conflict detection and resolution that should follow.
//!
//! Usage:
//!   cargo run -p utm-cli --bin demo_scenario -- --url http://localhost:3000

use std::time::Duration;

use clap::Parser;
use tokio::time;

use utm_cli::scenario::crossing_scenario;
use utm_core::{DeliveryRequest, Position};
use utm_sdk::{EventStream, UtmClient};

#[derive(Parser, Debug)]
#[command(author, version, about = "Golden demo: crossing collision scenario")]
struct Args {
    /// UTM server URL
    #[arg(long, default_value = "http://localhost:3000")]
    url: String,

    /// How long to watch the event stream before giving up, seconds
    #[arg(long, default_value_t = 60)]
    watch_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    println!("=================================================================");
    println!(" UTM DEMO SCENARIO: crossing collision course");
    println!("=================================================================");
    println!();

    let center = Position::new(37.70, -122.40, 50.0);
    let legs = crossing_scenario(center, 300.0);

    println!("[setup] registering {} aircraft", legs.len());
    for leg in &legs {
        let mut client = UtmClient::new(&args.url);
        client.register_aircraft(&leg.aircraft_id, leg.start, None).await?;
        println!("  {} registered at {:?}", leg.aircraft_id, leg.start);
    }

    println!();
    println!("[setup] connecting to event stream at {}/v1/stream", args.url);
    let mut events = EventStream::connect(&args.url).await?;

    println!();
    println!("[submit] submitting {} missions", legs.len());
    for leg in &legs {
        let client = UtmClient::new(&args.url);
        let request = DeliveryRequest { pickup: leg.start, delivery: leg.end };
        let mission = client.submit_mission(&request).await?;
        println!("  {} -> mission {} ({:?})", leg.aircraft_id, mission.mission_id, mission.status);
    }

    println!();
    println!("[watch] observing events for up to {}s", args.watch_secs);
    println!();

    let deadline = time::Instant::now() + Duration::from_secs(args.watch_secs);
    loop {
        let remaining = deadline.saturating_duration_since(time::Instant::now());
        if remaining.is_zero() {
            println!("[watch] timed out waiting for further events");
            break;
        }
        match time::timeout(remaining, events.next_event()).await {
            Ok(Ok(Some(event))) => print_event(&event),
            Ok(Ok(None)) => {
                println!("[watch] server closed the event stream");
                break;
            }
            Ok(Err(e)) => {
                eprintln!("[watch] stream error: {e}");
                break;
            }
            Err(_) => {
                println!("[watch] timed out waiting for further events");
                break;
            }
        }
    }

    println!();
    println!("=================================================================");
    println!(" DEMO COMPLETE");
    println!("=================================================================");

    Ok(())
}

fn print_event(event: &utm_sdk::Event) {
    use utm_sdk::Event::*;
    match event {
        AircraftRegistered { aircraft_id } => println!("[event] aircraft registered: {aircraft_id}"),
        Telemetry(t) => println!("[event] telemetry: {} @ ({:.6},{:.6},{:.0}m)", t.aircraft_id, t.lat, t.lon, t.altitude_m),
        BatteryWarning { aircraft_id, battery_percent } => {
            println!("[event] LOW BATTERY: {aircraft_id} at {battery_percent:.1}%")
        }
        Emergency { aircraft_id, battery_percent } => {
            println!("[event] EMERGENCY: {aircraft_id} at {battery_percent:.1}%")
        }
        MissionCreated(m) => println!("[event] mission created: {} ({:?})", m.mission_id, m.status),
        MissionAssigned(m) => println!(
            "[event] mission assigned: {} -> {}",
            m.mission_id,
            m.aircraft_id.as_deref().unwrap_or("?")
        ),
        ConflictDetected(c) => println!(
            "[event] CONFLICT DETECTED: {} <-> {} severity={:?}",
            c.aircraft1_id, c.aircraft2_id, c.severity
        ),
        ConflictResolved { aircraft1_id, aircraft2_id, action } => {
            println!("[event] conflict resolved: {aircraft1_id} <-> {aircraft2_id} via {action}")
        }
    }
}

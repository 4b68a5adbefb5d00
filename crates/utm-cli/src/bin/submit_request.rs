//! Submit a single pickup -> delivery request to a running UTM server.

use clap::Parser;

use utm_core::{DeliveryRequest, Position};
use utm_sdk::UtmClient;

#[derive(Parser, Debug)]
#[command(author, version, about = "Submit a delivery request to a UTM server")]
struct Args {
    /// UTM server URL
    #[arg(long, default_value = "http://localhost:3000")]
    url: String,

    #[arg(long, allow_hyphen_values = true)]
    pickup_lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    pickup_lon: f64,
    #[arg(long, default_value_t = 50.0)]
    pickup_alt: f64,

    #[arg(long, allow_hyphen_values = true)]
    delivery_lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    delivery_lon: f64,
    #[arg(long, default_value_t = 50.0)]
    delivery_alt: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let client = UtmClient::new(&args.url);
    let request = DeliveryRequest {
        pickup: Position::new(args.pickup_lat, args.pickup_lon, args.pickup_alt),
        delivery: Position::new(args.delivery_lat, args.delivery_lon, args.delivery_alt),
    };

    let mission = client.submit_mission(&request).await?;
    println!("mission {} created, status={:?}", mission.mission_id, mission.status);
    if let Some(trajectory) = &mission.trajectory {
        println!(
            "  trajectory: {} waypoints, {:.0}m, {:.0}s, battery estimate {:.1}%",
            trajectory.waypoints.len(),
            trajectory.total_distance_m,
            trajectory.total_time_s,
            trajectory.estimated_battery_percent
        );
    } else {
        println!("  queued: no idle aircraft available yet");
    }

    Ok(())
}

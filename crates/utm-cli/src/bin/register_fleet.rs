//! Register a fleet of virtual aircraft with a running UTM server at random
//! positions within its operational area.

use clap::Parser;

use utm_core::Configuration;
use utm_sdk::UtmClient;
use utm_sim::Fleet;

#[derive(Parser, Debug)]
#[command(author, version, about = "Register a virtual fleet with a UTM server")]
struct Args {
    /// UTM server URL
    #[arg(long, default_value = "http://localhost:3000")]
    url: String,

    /// Number of aircraft to spawn
    #[arg(long, default_value_t = 5)]
    count: usize,

    /// Aircraft id prefix
    #[arg(long, default_value = "drone")]
    prefix: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = Configuration::default();
    let fleet = Fleet::spawn_random(args.count, &args.prefix, &config);

    println!("Registering {} aircraft with {}", args.count, args.url);
    for aircraft in fleet.iter() {
        let mut client = UtmClient::new(&args.url);
        match client.register_aircraft(&aircraft.aircraft_id, aircraft.position(), None).await {
            Ok(()) => println!("  {} -> registered at {:?}", aircraft.aircraft_id, aircraft.position()),
            Err(e) => eprintln!("  {} -> failed: {}", aircraft.aircraft_id, e),
        }
    }

    Ok(())
}

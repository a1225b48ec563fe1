//! CLI tool to request a hazard-avoiding route and print directions.

use clap::Parser;
use haven_core::Location;
use haven_sdk::{HavenClient, RoutePlanRequest};

/// Plan a route that avoids recently reported hazards
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Haven server URL
    #[arg(long, default_value = "http://localhost:3001")]
    url: String,

    /// Start latitude (default: Miami)
    #[arg(long, default_value_t = 25.7617)]
    start_lat: f64,

    /// Start longitude
    #[arg(long, default_value_t = -80.1918)]
    start_lon: f64,

    /// End latitude (default: West Palm Beach)
    #[arg(long, default_value_t = 26.7153)]
    end_lat: f64,

    /// End longitude
    #[arg(long, default_value_t = -80.0534)]
    end_lon: f64,

    /// Routing profile: auto, bicycle, or pedestrian
    #[arg(long, default_value = "auto")]
    costing: String,

    /// Skip incident avoidance entirely
    #[arg(long)]
    no_avoid: bool,

    /// Hazard search buffer around the corridor, in kilometers
    #[arg(long)]
    buffer_km: Option<f64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let client = HavenClient::new(&args.url);

    let request = RoutePlanRequest {
        start: Location {
            lat: args.start_lat,
            lon: args.start_lon,
        },
        end: Location {
            lat: args.end_lat,
            lon: args.end_lon,
        },
        costing: Some(args.costing),
        avoid_incidents: Some(!args.no_avoid),
        buffer_km: args.buffer_km,
    };

    let result = client.calculate_route(&request).await?;

    let optimal = &result.optimal_route["summary"];
    let baseline = &result.baseline_route["summary"];
    println!(
        "Optimal:  {} mi, {} min (avoiding {} incidents)",
        optimal["distance_miles"], optimal["duration_minutes"], result.avoided_incidents
    );
    println!(
        "Baseline: {} mi, {} min",
        baseline["distance_miles"], baseline["duration_minutes"]
    );
    println!("Calculated in {} ms", result.calculation_time_ms);

    if let Some(directions) = result.optimal_route["directions"].as_array() {
        println!("\nDirections:");
        for step in directions {
            println!(
                "  {} ({} mi)",
                step["instruction"].as_str().unwrap_or(""),
                step["distance_miles"]
            );
        }
    }

    Ok(())
}

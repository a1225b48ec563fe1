//! CLI tool to submit a single incident report to a Haven server.

use clap::Parser;
use haven_core::{ReportIncidentRequest, ReportLocation};
use haven_sdk::HavenClient;

/// Report a hazard or resource to the Haven community map
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Haven server URL
    #[arg(long, default_value = "http://localhost:3001")]
    url: String,

    /// Incident type (debris_road, downed_powerline, food_available,
    /// gas_available, power_available, shelter_available)
    #[arg(long = "type")]
    kind: String,

    /// What happened / what is available
    #[arg(long)]
    description: String,

    /// Latitude of the incident
    #[arg(long)]
    lat: f64,

    /// Longitude of the incident
    #[arg(long)]
    lng: f64,

    /// Attribution shown with the report
    #[arg(long)]
    reported_by: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let client = HavenClient::new(&args.url);
    let report = ReportIncidentRequest {
        kind: Some(args.kind),
        description: Some(args.description),
        location: Some(ReportLocation {
            lat: Some(args.lat),
            lng: Some(args.lng),
        }),
        reported_by: args.reported_by,
    };

    let incident = client.report_incident(&report).await?;
    println!(
        "Reported incident {} at [{}, {}]",
        incident.id, incident.lat, incident.lng
    );

    Ok(())
}

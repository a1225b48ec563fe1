//! Seed a Haven server with the demo incident set.

use clap::Parser;
use haven_cli::demo_reports;
use haven_sdk::HavenClient;

/// Populate a Haven server with demo hazards and resources
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Haven server URL
    #[arg(long, default_value = "http://localhost:3001")]
    url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let client = HavenClient::new(&args.url);

    for report in demo_reports() {
        let incident = client.report_incident(&report).await?;
        println!(
            "Seeded {:>18} at [{:.4}, {:.4}] ({})",
            format!("{:?}", incident.kind),
            incident.lat,
            incident.lng,
            incident.id
        );
    }

    let exclusions = client.exclusions(None, None).await?;
    println!(
        "Server now reports {} active routing exclusions",
        exclusions.len()
    );

    Ok(())
}

use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Operator CLI for the Cleartrip relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000", env = "RELAY_URL")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check relay liveness and partner configuration
    Health,
    /// Show partner and token cache status
    Status,
    /// Query the location catalog
    Locations {
        /// Name prefix
        #[arg(long)]
        name: Option<String>,
        /// Location type, e.g. city or hotel
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        parent_id: Option<i64>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Status => {
            let res = client.get(format!("{}/api/status", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Locations {
            name,
            kind,
            parent_id,
            limit,
            offset,
        } => {
            let mut query: Vec<(&str, String)> = Vec::new();
            if let Some(name) = name {
                query.push(("name", name));
            }
            if let Some(kind) = kind {
                query.push(("type", kind));
            }
            if let Some(parent_id) = parent_id {
                query.push(("parent_id", parent_id.to_string()));
            }
            if let Some(limit) = limit {
                query.push(("limit", limit.to_string()));
            }
            if let Some(offset) = offset {
                query.push(("offset", offset.to_string()));
            }
            let res = client
                .get(format!("{}/api/catalog/locations", base))
                .query(&query)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

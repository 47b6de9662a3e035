use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use std::path::{Path, PathBuf};

use api_gateway::config::load_config;
use api_gateway::routing::{RouteRegistry, UuidV4Generator};
use api_gateway::storage::FsBlobStore;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Management CLI for the API gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8081")]
    url: String,

    #[arg(short, long, env = "GATEWAY_ADMIN_KEY", default_value = "")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway status
    Status,
    /// List registered routes
    Routes,
    /// Show one route with its actions
    Route { id: String },
    /// Compile a config file and write the route snapshot
    Compile {
        config: PathBuf,
        /// Directory to write into (defaults to storage.root from the config)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let path = match cli.command {
        Commands::Status => "/admin/status".to_string(),
        Commands::Routes => "/admin/routes".to_string(),
        Commands::Route { id } => format!("/admin/routes/{}", id),
        Commands::Compile { config, out } => return compile(&config, out),
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    let res = reqwest::Client::new()
        .get(format!("{}{}", cli.url, path))
        .headers(headers)
        .send()
        .await?;
    print_response(res).await
}

fn compile(config_path: &Path, out: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let registry = RouteRegistry::from_config(&config.gateway, &UuidV4Generator)?;

    let root = out.unwrap_or_else(|| PathBuf::from(&config.storage.root));
    let store = FsBlobStore::new(&root);
    registry.save_to_file(&store, Some(config.storage.routes_file.as_str()))?;

    println!(
        "Wrote {} routes to {}",
        registry.len(),
        root.join(&config.storage.routes_file).display()
    );
    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

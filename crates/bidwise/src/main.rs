use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use bidwise_models::BidwiseConfig;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config/bidwise.toml";

#[derive(Parser, Debug)]
#[command(name = "bidwise", about = "Auction deal enrichment")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Read the deals JSON array from a file instead of stdin
    #[arg(short, long)]
    input: Option<String>,

    /// Write enriched deals to a file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,

    /// Override the year car ages are measured against
    #[arg(long)]
    reference_year: Option<i32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    if let Some(year) = cli.reference_year {
        config.valuation.reference_year = Some(year);
    }

    // Read deals
    let deals_json = if let Some(input_path) = &cli.input {
        std::fs::read_to_string(input_path)
            .with_context(|| format!("Failed to read input: {input_path}"))?
    } else {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        buf
    };
    let deals = bidwise::parse_deals(&deals_json).context("Failed to parse deals JSON")?;

    let enricher = bidwise::build_enricher(&config).context("Failed to build enricher")?;
    let (enriched, summary) = bidwise::enrich(&enricher, deals).await;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&enriched)?
    } else {
        serde_json::to_string(&enriched)?
    };

    match &cli.output {
        Some(path) => {
            std::fs::write(path, format!("{output}\n"))
                .with_context(|| format!("Failed to write output: {path}"))?;
            info!(path = %path, deals = summary.deals, "Enriched deals written");
        }
        None => println!("{output}"),
    }

    Ok(())
}

/// The default config file is optional; an explicitly named one is not.
fn load_config(path: &str) -> Result<BidwiseConfig> {
    if path == DEFAULT_CONFIG_PATH && !Path::new(path).exists() {
        info!(path, "No config file, using defaults");
        return Ok(BidwiseConfig::default());
    }

    let config_str =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read config: {path}"))?;
    toml::from_str(&config_str).with_context(|| "Failed to parse config")
}

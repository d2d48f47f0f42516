//! Flow Explorer Binary - Account Flow Diagram Generator
//!
//! Pages through an account's operation history on TzKT, aggregates inflows
//! and outflows per counterparty, and prints the diagram structure as JSON
//! for an external renderer.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin flow_explorer -- <address> [--limit N] [--min-tez X]
//! ```
//!
//! ## Environment Variables
//!
//! - TZKT_API_URL - TzKT API base URL (default: https://api.tzkt.io)
//! - HTTP_TIMEOUT_SECS - Per-request timeout in seconds (default: 10)
//! - RECORD_BUDGET - Default record budget when --limit is absent (default: 10000)
//! - MIN_TEZ - Default tez threshold when --min-tez is absent (default: 0)
//! - RUST_LOG - Logging level (optional, default: info)

use std::env;
use std::str::FromStr;

use tezflow::config::RuntimeConfig;
use tezflow::flow_core::{aggregate, diagram, Paginator, TzktSource};

fn parse_flag<T: FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|idx| args.get(idx + 1))
        .and_then(|v| v.parse().ok())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let config = RuntimeConfig::from_env()?;

    let args: Vec<String> = env::args().collect();
    let address = args
        .iter()
        .skip(1)
        .find(|a| !a.starts_with("--"))
        .cloned()
        .ok_or("usage: flow_explorer <address> [--limit N] [--min-tez X]")?;

    let record_budget: usize =
        parse_flag(&args, "--limit").unwrap_or(config.default_record_budget);
    let min_tez: f64 = parse_flag(&args, "--min-tez").unwrap_or(config.default_min_tez);

    log::info!("🚀 Starting Flow Explorer");
    log::info!("   API: {}", config.api_base_url);
    log::info!("   Address: {}", address);
    log::info!("   Record budget: {}", record_budget);
    log::info!("   Min tez: {}", min_tez);

    let source = TzktSource::new(&config.api_base_url, config.http_timeout_secs)?;
    let mut paginator = Paginator::new(source);

    let records = paginator.fetch_all(&address, record_budget).await;
    if records.is_empty() {
        log::warn!("No operations found for {}", address);
        return Ok(());
    }
    log::info!("📥 Fetched {} operations", records.len());

    let summary = aggregate(&records, &address, min_tez);
    log::info!(
        "inputs: {}; outputs: {}; in: {:.2} tez; out: {:.2} tez",
        summary.inflows.len(),
        summary.outflows.len(),
        summary.inflow_total(),
        summary.outflow_total()
    );

    let flow_diagram = diagram::build(&address, &summary);
    println!("{}", serde_json::to_string_pretty(&flow_diagram)?);

    Ok(())
}

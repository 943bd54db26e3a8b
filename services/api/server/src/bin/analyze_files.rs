use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use fleet_analysis::{Machine, Reading};
use serde::de::DeserializeOwned;
use tracing_subscriber::filter::EnvFilter;

/// Analyze a fleet snapshot stored as two JSON files
#[derive(Parser, Debug)]
#[command(name = "analyze_files", version)]
struct Args {
    /// JSON array of machines
    #[arg(long, default_value = "machines.json")]
    machines: PathBuf,

    /// JSON array of telemetry readings
    #[arg(long, default_value = "data.json")]
    data: PathBuf,

    /// Pretty-print the report
    #[arg(long)]
    pretty: bool,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let deserializer = &mut serde_json::Deserializer::from_slice(&bytes);
    serde_path_to_error::deserialize(deserializer)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let machines: Vec<Machine> = read_json(&args.machines)?;
    let readings: Vec<Reading> = read_json(&args.data)?;

    let run = fleet_analysis::run_analysis(&machines, &readings);
    if run.readings_dropped > 0 {
        tracing::warn!(
            dropped = run.readings_dropped,
            "Ignored readings for unknown machines"
        );
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&run.report)?
    } else {
        serde_json::to_string(&run.report)?
    };
    println!("{json}");

    Ok(())
}

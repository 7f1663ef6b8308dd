use crate::services::ConfigPreset;
use crate::telemetry::LogFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "concurrency_pipeline")]
#[command(about = "A bounded fetch → process → output pipeline with timeouts and a worker pool")]
#[command(version)]
pub struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the pipeline over a set of sources
    Run(RunArgs),

    /// List the built-in configuration presets
    Presets,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Source identifiers to fetch
    #[arg(default_values_t = default_sources())]
    pub sources: Vec<String>,

    /// Number of processing workers
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Per-source fetch deadline in milliseconds
    #[arg(short = 't', long)]
    pub fetch_timeout_ms: Option<u64>,

    /// Capacity of each inter-stage queue (defaults to the number of sources)
    #[arg(long)]
    pub queue_capacity: Option<usize>,

    /// Maximum number of fetches running at once (defaults to the number of sources)
    #[arg(long)]
    pub max_in_flight: Option<usize>,

    /// Minimum interval between fetch starts in milliseconds (rate limit)
    #[arg(long)]
    pub fetch_start_interval_ms: Option<u64>,

    /// Upper bound of the simulated fetch latency in milliseconds
    #[arg(long, default_value = "800")]
    pub max_fetch_latency_ms: u64,

    /// Force a source to take a fixed latency: NAME=MILLIS (repeatable)
    #[arg(long, value_parser = parse_slow_source)]
    pub slow_source: Vec<(String, u64)>,

    /// Force a source's fetch to fail (repeatable)
    #[arg(long)]
    pub fail_source: Vec<String>,

    /// Configuration preset
    #[arg(short = 'p', long, value_enum)]
    pub preset: Option<ConfigPreset>,

    /// JSON configuration file (overrides the preset, overridden by flags)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Suppress per-item progress output
    #[arg(short, long)]
    pub quiet: bool,
}

pub fn default_sources() -> Vec<String> {
    ["API-1", "API-2", "API-3", "Database", "Cache"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn parse_slow_source(value: &str) -> Result<(String, u64), String> {
    let (name, millis) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=MILLIS, got '{value}'"))?;

    if name.is_empty() {
        return Err("source name must not be empty".to_string());
    }

    let millis = millis
        .parse::<u64>()
        .map_err(|e| format!("invalid latency '{millis}': {e}"))?;

    Ok((name.to_string(), millis))
}

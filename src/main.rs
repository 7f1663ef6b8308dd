use anyhow::Result;
use clap::Parser;
use concurrency_pipeline::cli::{execute_presets, execute_run, Cli, Commands};
use concurrency_pipeline::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format, "warn");

    match cli.command {
        Commands::Run(args) => execute_run(args).await?,
        Commands::Presets => execute_presets(),
    }

    Ok(())
}

use crate::cli::args::RunArgs;
use crate::core::{PipelineConfig, PipelineOutput, ProgressReporter};
use crate::engine::PipelineEngine;
use crate::services::{
    ConfigPreset, ConsoleProgressReporter, DefaultPipelineConfig, SimulatedFetcher,
    SimulatedTransformer, TracingProgressReporter,
};
use anyhow::{Context, Result};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// プリセット → 設定ファイル → コマンドラインフラグの順で設定を解決
pub fn resolve_config(args: &RunArgs) -> Result<DefaultPipelineConfig> {
    let mut config = match &args.config {
        Some(path) => DefaultPipelineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => args.preset.unwrap_or(ConfigPreset::Default).build(),
    };

    if let Some(workers) = args.workers {
        config = config.with_worker_count(workers);
    }
    if let Some(timeout_ms) = args.fetch_timeout_ms {
        config = config.with_fetch_timeout(Duration::from_millis(timeout_ms));
    }
    if let Some(capacity) = args.queue_capacity {
        config = config.with_queue_capacity(capacity);
    }
    if let Some(limit) = args.max_in_flight {
        config = config.with_max_in_flight_fetches(limit);
    }
    if let Some(interval_ms) = args.fetch_start_interval_ms {
        config = config.with_fetch_start_interval(Duration::from_millis(interval_ms));
    }
    if args.quiet {
        config = config.with_progress_reporting(false);
    }

    config.validate()?;
    Ok(config)
}

/// コマンドラインで指定された遅延・失敗を反映したシミュレーション取得
pub fn build_fetcher(args: &RunArgs) -> SimulatedFetcher {
    let fetcher = SimulatedFetcher::new(Duration::from_millis(args.max_fetch_latency_ms));

    let fetcher = args
        .slow_source
        .iter()
        .fold(fetcher, |fetcher, (name, millis)| {
            fetcher.with_latency(name.as_str(), Duration::from_millis(*millis))
        });

    args.fail_source
        .iter()
        .fold(fetcher, |fetcher, name| fetcher.with_failure(name.as_str()))
}

/// Execute run command
pub async fn execute_run(args: RunArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let fetcher = build_fetcher(&args);

    // Ctrl-Cで取得中のアイテムをキャンセル
    let cancellation = CancellationToken::new();
    let signal_token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling in-flight fetches");
            signal_token.cancel();
        }
    });

    if !args.json && !args.quiet {
        print_settings(&config, args.sources.len());
    }

    // JSON出力時は標準出力を結果専用にし、進捗はtracing経由で標準エラーへ
    let output = if args.json {
        run_engine(&args, config.clone(), fetcher, TracingProgressReporter::new(), cancellation)
            .await?
    } else {
        run_engine(&args, config.clone(), fetcher, ConsoleProgressReporter::new(), cancellation)
            .await?
    };

    if args.json {
        let report = serde_json::json!({
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "settings": {
                "worker_count": config.worker_count(),
                "fetch_timeout_ms": config.fetch_timeout().as_millis() as u64,
                "queue_capacity": config.queue_capacity(),
                "max_in_flight_fetches": config.max_in_flight_fetches(),
                "fetch_start_interval_ms": config
                    .fetch_start_interval()
                    .map(|interval| interval.as_millis() as u64),
            },
            "output": output,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&output);
    }

    Ok(())
}

async fn run_engine<R>(
    args: &RunArgs,
    config: DefaultPipelineConfig,
    fetcher: SimulatedFetcher,
    reporter: R,
    cancellation: CancellationToken,
) -> Result<PipelineOutput>
where
    R: ProgressReporter + 'static,
{
    let engine = PipelineEngine::new(fetcher, SimulatedTransformer::default(), config, reporter)?;

    let output = engine
        .run_with_cancellation(args.sources.iter().map(String::as_str), cancellation)
        .await
        .context("Pipeline execution failed")?;

    Ok(output)
}

fn print_settings(config: &DefaultPipelineConfig, total_sources: usize) {
    println!("⚙️  Settings:");
    println!("   - Sources: {total_sources}");
    println!("   - Workers: {}", config.worker_count());
    println!("   - Fetch timeout: {:?}", config.fetch_timeout());
    if let Some(capacity) = config.queue_capacity() {
        println!("   - Queue capacity: {capacity}");
    }
    if let Some(limit) = config.max_in_flight_fetches() {
        println!("   - Max in-flight fetches: {limit}");
    }
    if let Some(interval) = config.fetch_start_interval() {
        println!("   - Fetch start interval: {interval:?}");
    }
}

fn print_summary(output: &PipelineOutput) {
    println!("\n✅ Pipeline complete in {:.2}s", output.elapsed.as_secs_f64());
    println!("   Results: {}", output.results.len());

    if output.cancelled {
        println!("⚠️  Run was cancelled; unfinished fetches were counted as errors");
    }
    if output.stats.errors > 0 {
        println!("⚠️  {} item(s) failed", output.stats.errors);
    }
}

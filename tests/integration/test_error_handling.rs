// エラーハンドリングの統合テスト
use crate::fixtures::{quiet_engine, RecordingReporter};
use anyhow::Result;
use concurrency_pipeline::{
    run_pipeline, DefaultPipelineConfig, ErrorSeverity, PipelineEngine, PipelineError,
    SimulatedFetcher, SimulatedTransformer,
};
use std::time::Duration;

#[tokio::test]
async fn test_zero_workers_is_configuration_error() {
    let result = run_pipeline(["API-1", "API-2"], 0, Duration::from_secs(1)).await;

    let error = result.unwrap_err();
    assert!(matches!(error, PipelineError::Configuration { .. }));
    assert_eq!(error.severity(), ErrorSeverity::High);
    assert!(!error.is_item_level());
}

#[test]
fn test_invalid_config_rejected_at_construction() {
    let zero_capacity = PipelineEngine::new(
        SimulatedFetcher::default(),
        SimulatedTransformer::default(),
        DefaultPipelineConfig::new(1).with_queue_capacity(0),
        RecordingReporter::new(),
    );
    assert!(matches!(
        zero_capacity.err(),
        Some(PipelineError::Configuration { .. })
    ));

    let zero_in_flight = PipelineEngine::new(
        SimulatedFetcher::default(),
        SimulatedTransformer::default(),
        DefaultPipelineConfig::new(1).with_max_in_flight_fetches(0),
        RecordingReporter::new(),
    );
    assert!(zero_in_flight.is_err());
}

#[tokio::test]
async fn test_every_source_times_out() -> Result<()> {
    let fetcher = ["a", "b", "c"].into_iter().fold(
        SimulatedFetcher::new(Duration::from_millis(10)),
        |fetcher, name| fetcher.with_latency(name, Duration::from_secs(5)),
    );
    let engine = PipelineEngine::new(
        fetcher,
        SimulatedTransformer::default(),
        DefaultPipelineConfig::new(2).with_fetch_timeout(Duration::from_millis(50)),
        RecordingReporter::new(),
    )?;

    let output = engine.run(["a", "b", "c"]).await?;

    assert!(output.results.is_empty());
    assert_eq!(output.stats.fetched, 0);
    assert_eq!(output.stats.errors, 3);
    assert!(engine
        .reporter()
        .errors
        .lock()
        .iter()
        .all(|message| message.contains("タイムアウト")));
    Ok(())
}

#[tokio::test]
async fn test_transform_failures_are_counted() -> Result<()> {
    let engine = PipelineEngine::new(
        SimulatedFetcher::new(Duration::from_millis(10)),
        SimulatedTransformer::new(Duration::from_millis(5)).with_failure("poison"),
        DefaultPipelineConfig::new(2),
        RecordingReporter::new(),
    )?;

    let output = engine.run(["ok-1", "poison", "ok-2"]).await?;

    // 取得は3件成功、変換は1件失敗
    assert_eq!(output.stats.fetched, 3);
    assert_eq!(output.stats.processed, 2);
    assert_eq!(output.stats.errors, 1);
    assert_eq!(output.results.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_fetch_failures_do_not_stop_other_items() -> Result<()> {
    let output = quiet_engine(
        SimulatedFetcher::new(Duration::from_millis(10))
            .with_failure("down-1")
            .with_failure("down-2"),
        DefaultPipelineConfig::new(1),
    )
    .run(["up-1", "down-1", "up-2", "down-2", "up-3"])
    .await?;

    assert_eq!(output.stats.fetched, 3);
    assert_eq!(output.stats.errors, 2);
    assert_eq!(output.stats.processed, 3);
    Ok(())
}

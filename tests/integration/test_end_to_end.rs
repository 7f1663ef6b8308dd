// エンドツーエンドの統合テスト
use crate::fixtures::{numbered_sources, quiet_engine, RecordingReporter, FIVE_SOURCES};
use anyhow::Result;
use concurrency_pipeline::{
    run_pipeline, DefaultPipelineConfig, PipelineEngine, PipelineStage, SimulatedFetcher,
    SimulatedTransformer,
};
use std::collections::HashSet;
use std::time::Duration;

#[tokio::test]
async fn test_five_sources_all_within_deadline() -> Result<()> {
    let output = run_pipeline(FIVE_SOURCES, 3, Duration::from_secs(1)).await?;

    // デフォルトの取得遅延は最大800msのため全件が期限内に完了する
    assert_eq!(output.stats.fetched, 5);
    assert_eq!(output.stats.processed, 5);
    assert_eq!(output.stats.errors, 0);
    assert_eq!(output.results.len(), 5);

    let sources: HashSet<_> = output.results.iter().map(|r| r.source.as_str()).collect();
    let expected: HashSet<_> = FIVE_SOURCES.into_iter().collect();
    assert_eq!(sources, expected);

    for result in &output.results {
        assert!((1..=3).contains(&result.worker_id));
        assert_eq!(result.original, format!("data-from-{}", result.source));
        assert_eq!(result.transformed, format!("PROCESSED[{}]", result.original));
    }
    assert!(!output.cancelled);
    Ok(())
}

#[tokio::test]
async fn test_one_forced_slow_source() -> Result<()> {
    let engine = quiet_engine(
        SimulatedFetcher::new(Duration::from_millis(100))
            .with_latency("Database", Duration::from_millis(1_500)),
        DefaultPipelineConfig::new(3).with_fetch_timeout(Duration::from_secs(1)),
    );

    let output = engine.run(FIVE_SOURCES).await?;

    assert_eq!(output.stats.fetched, 4);
    assert_eq!(output.stats.errors, 1);
    assert_eq!(output.stats.processed, 4);
    assert!(output
        .results
        .iter()
        .all(|r| r.source.as_str() != "Database"));
    Ok(())
}

#[tokio::test]
async fn test_empty_sources_reach_done() -> Result<()> {
    let engine = PipelineEngine::new(
        SimulatedFetcher::default(),
        SimulatedTransformer::default(),
        DefaultPipelineConfig::new(2),
        RecordingReporter::new(),
    )?;

    let output = engine.run(Vec::<String>::new()).await?;

    assert!(output.results.is_empty());
    assert_eq!(output.stats, Default::default());

    let reporter = engine.reporter();
    assert_eq!(*reporter.started.lock(), Some(0));
    assert_eq!(
        *reporter.stages.lock(),
        vec![
            PipelineStage::Fetching,
            PipelineStage::Processing,
            PipelineStage::Outputting,
            PipelineStage::Done,
        ]
    );
    assert_eq!(*reporter.completed.lock(), Some(output.stats));
    Ok(())
}

#[tokio::test]
async fn test_reporter_sees_every_item() -> Result<()> {
    let engine = PipelineEngine::new(
        SimulatedFetcher::new(Duration::from_millis(20))
            .with_latency("late", Duration::from_millis(500))
            .with_failure("broken"),
        SimulatedTransformer::new(Duration::from_millis(5)),
        DefaultPipelineConfig::new(2).with_fetch_timeout(Duration::from_millis(200)),
        RecordingReporter::new(),
    )?;

    let output = engine.run(["ok-1", "late", "ok-2", "broken"]).await?;

    let reporter = engine.reporter();
    assert_eq!(reporter.fetched.lock().len(), output.stats.fetched);
    assert_eq!(reporter.processed.lock().len(), output.stats.processed);
    assert_eq!(reporter.errors.lock().len(), output.stats.errors);
    assert_eq!(output.stats.errors, 2);
    assert_eq!(reporter.stages.lock().last(), Some(&PipelineStage::Done));
    Ok(())
}

#[tokio::test]
async fn test_more_workers_than_sources() -> Result<()> {
    let output = quiet_engine(
        SimulatedFetcher::new(Duration::from_millis(10)),
        DefaultPipelineConfig::new(16),
    )
    .run(numbered_sources("src", 3))
    .await?;

    assert_eq!(output.stats.processed, 3);
    Ok(())
}

#[tokio::test]
async fn test_output_serializes_to_json() -> Result<()> {
    let output = run_pipeline(["API-1"], 1, Duration::from_secs(1)).await?;

    let json = serde_json::to_value(&output)?;
    assert_eq!(json["stats"]["fetched"], 1);
    assert_eq!(json["results"][0]["source"], "API-1");
    assert_eq!(json["cancelled"], false);
    Ok(())
}

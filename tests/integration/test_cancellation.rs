// キャンセルの統合テスト
use crate::fixtures::{numbered_sources, quiet_engine};
use anyhow::Result;
use concurrency_pipeline::{DefaultPipelineConfig, SimulatedFetcher};
use std::time::Duration;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_cancel_before_run_counts_everything_as_error() -> Result<()> {
    let engine = quiet_engine(
        SimulatedFetcher::new(Duration::from_millis(10)),
        DefaultPipelineConfig::new(2),
    );
    let token = CancellationToken::new();
    token.cancel();

    let output = engine
        .run_with_cancellation(numbered_sources("src", 6), token)
        .await?;

    assert!(output.cancelled);
    assert_eq!(output.stats.errors, 6);
    assert_eq!(output.stats.fetched, 0);
    assert!(output.results.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_cancel_during_slow_fetches_keeps_finished_items() -> Result<()> {
    let engine = quiet_engine(
        SimulatedFetcher::new(Duration::from_millis(5))
            .with_latency("slow-1", Duration::from_secs(60))
            .with_latency("slow-2", Duration::from_secs(60)),
        DefaultPipelineConfig::new(2).with_fetch_timeout(Duration::from_secs(120)),
    );

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        trigger.cancel();
    });

    let output = timeout(
        Duration::from_secs(10),
        engine.run_with_cancellation(["fast-1", "slow-1", "fast-2", "slow-2", "fast-3"], token),
    )
    .await
    .expect("cancellation must release the pipeline")?;

    assert!(output.cancelled);
    assert_eq!(output.stats.fetched, 3);
    assert_eq!(output.stats.errors, 2);
    assert_eq!(output.stats.processed, 3);
    assert_eq!(output.stats.fetched + output.stats.errors, 5);
    Ok(())
}

#[tokio::test]
async fn test_uncancelled_token_has_no_effect() -> Result<()> {
    let engine = quiet_engine(
        SimulatedFetcher::new(Duration::from_millis(10)),
        DefaultPipelineConfig::new(3),
    );

    let output = engine
        .run_with_cancellation(numbered_sources("src", 4), CancellationToken::new())
        .await?;

    assert!(!output.cancelled);
    assert_eq!(output.stats.processed, 4);
    Ok(())
}

// 並行性・不変条件の統合テスト
use crate::fixtures::{numbered_sources, quiet_engine, RecordingReporter};
use anyhow::Result;
use concurrency_pipeline::{
    BoundedChannel, DefaultPipelineConfig, PipelineEngine, SimulatedFetcher, SimulatedTransformer,
};
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test]
async fn test_randomized_runs_preserve_invariants() -> Result<()> {
    let mut rng = rand::rng();

    for run in 0..100 {
        let item_count = rng.random_range(0..=12);
        let workers = rng.random_range(1..=6);
        let capacity = rng.random_range(1..=4);
        let timeout_ms = rng.random_range(5..=40);

        let engine = quiet_engine(
            SimulatedFetcher::new(Duration::from_millis(30)),
            DefaultPipelineConfig::new(workers)
                .with_queue_capacity(capacity)
                .with_fetch_timeout(Duration::from_millis(timeout_ms)),
        );

        let sources = numbered_sources(&format!("run{run}"), item_count);
        let output = timeout(Duration::from_secs(10), engine.run(sources))
            .await
            .expect("pipeline must terminate")?;

        let stats = output.stats;
        assert_eq!(stats.fetched + stats.errors, item_count, "run {run}");
        assert!(stats.processed <= stats.fetched, "run {run}");
        assert_eq!(output.results.len(), stats.processed, "run {run}");

        let unique: HashSet<_> = output.results.iter().map(|r| r.source.clone()).collect();
        assert_eq!(unique.len(), output.results.len(), "run {run}");
    }
    Ok(())
}

#[tokio::test]
async fn test_no_deadlock_across_worker_and_capacity_grid() -> Result<()> {
    for workers in [1, 2, 4, 8] {
        for capacity in [1, 2, 8] {
            for in_flight in [1, 3, 32] {
                let engine = quiet_engine(
                    SimulatedFetcher::new(Duration::from_millis(3)),
                    DefaultPipelineConfig::new(workers)
                        .with_queue_capacity(capacity)
                        .with_max_in_flight_fetches(in_flight)
                        .with_fetch_timeout(Duration::from_secs(1)),
                );

                let output = timeout(
                    Duration::from_secs(10),
                    engine.run(numbered_sources("grid", 25)),
                )
                .await
                .unwrap_or_else(|_| {
                    panic!("deadlock: workers={workers} capacity={capacity} in_flight={in_flight}")
                })?;

                assert_eq!(output.stats.fetched, 25);
                assert_eq!(output.stats.processed, 25);
            }
        }
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_multi_thread_runtime_large_batch() -> Result<()> {
    let engine = quiet_engine(
        SimulatedFetcher::new(Duration::from_millis(5)),
        DefaultPipelineConfig::new(8).with_queue_capacity(4),
    );

    let output = engine.run(numbered_sources("bulk", 500)).await?;

    assert_eq!(output.stats.fetched, 500);
    assert_eq!(output.stats.processed, 500);
    let unique: HashSet<_> = output.results.iter().map(|r| r.source.clone()).collect();
    assert_eq!(unique.len(), 500);
    Ok(())
}

#[tokio::test]
async fn test_completed_report_matches_output_stats() -> Result<()> {
    let engine = PipelineEngine::new(
        SimulatedFetcher::new(Duration::from_millis(10))
            .with_latency("late", Duration::from_millis(300))
            .with_failure("broken"),
        SimulatedTransformer::new(Duration::from_millis(5)),
        DefaultPipelineConfig::new(2).with_fetch_timeout(Duration::from_millis(100)),
        RecordingReporter::new(),
    )?;

    let mut sources = numbered_sources("snap", 6);
    sources.push("late".to_string());
    sources.push("broken".to_string());

    let output = engine.run(sources).await?;

    // 完了時に報告されたスナップショットは最終統計と一致する
    let completed = *engine.reporter().completed.lock();
    assert_eq!(completed, Some(output.stats));
    assert_eq!(output.stats.fetched, 6);
    assert_eq!(output.stats.errors, 2);
    assert_eq!(output.stats.processed, 6);
    assert_eq!(output.results.len(), output.stats.processed);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_channel_competing_consumers_receive_each_item_once() -> Result<()> {
    let channel = BoundedChannel::new("shared", 3)?;
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));

    let mut consumers = Vec::new();
    for _ in 0..4 {
        let channel = channel.clone();
        let seen = Arc::clone(&seen);
        consumers.push(tokio::spawn(async move {
            while let Some(value) = channel.recv().await {
                seen.lock().push(value);
            }
        }));
    }

    for value in 0..200u32 {
        channel.send(value).await?;
    }
    assert!(channel.close());

    for consumer in consumers {
        consumer.await?;
    }

    let mut seen = seen.lock().clone();
    seen.sort_unstable();
    assert_eq!(seen, (0..200).collect::<Vec<_>>());
    Ok(())
}

// 進捗監視の具象実装

use crate::core::{
    CountersSnapshot, FetchResult, PipelineError, PipelineStage, ProcessedResult, ProgressReporter,
};
use async_trait::async_trait;

/// コンソール出力による進捗報告実装
#[derive(Debug, Default, Clone)]
pub struct ConsoleProgressReporter {
    quiet: bool,
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

#[async_trait]
impl ProgressReporter for ConsoleProgressReporter {
    async fn report_started(&self, total_items: usize) {
        if !self.quiet {
            println!("🚀 Starting pipeline for {total_items} sources...");
        }
    }

    async fn report_stage(&self, stage: PipelineStage) {
        if self.quiet {
            return;
        }
        match stage {
            PipelineStage::Fetching => println!("🌐 Stage 1: Fetching from sources concurrently..."),
            PipelineStage::Processing => {
                println!("   All fetches complete!");
                println!("⚙️  Stage 2: Processing data with worker pool...");
            }
            PipelineStage::Outputting => println!("📦 Stage 3: Draining processed results..."),
            PipelineStage::Done => println!("🏁 Pipeline done"),
        }
    }

    async fn report_fetched(&self, result: &FetchResult) {
        if !self.quiet {
            println!("   ✓ Fetched from {} in {:?}", result.source, result.elapsed);
        }
    }

    async fn report_item_error(&self, error: &PipelineError) {
        if !self.quiet {
            eprintln!("   ⚠️  Error: {error}");
        }
    }

    async fn report_processed(&self, result: &ProcessedResult) {
        if !self.quiet {
            println!(
                "   Worker-{}: {} (from {})",
                result.worker_id, result.transformed, result.source
            );
        }
    }

    async fn report_completed(&self, stats: &CountersSnapshot) {
        if !self.quiet {
            println!("📊 Final Statistics:");
            println!(
                "   Fetched: {} | Processed: {} | Errors: {}",
                stats.fetched, stats.processed, stats.errors
            );
        }
    }
}

/// tracingイベントによる構造化進捗報告実装
#[derive(Debug, Default, Clone)]
pub struct TracingProgressReporter;

impl TracingProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for TracingProgressReporter {
    async fn report_started(&self, total_items: usize) {
        tracing::info!(total_items, "pipeline started");
    }

    async fn report_stage(&self, stage: PipelineStage) {
        tracing::info!(stage = stage.as_str(), "pipeline stage");
    }

    async fn report_fetched(&self, result: &FetchResult) {
        tracing::debug!(
            source = result.source.as_str(),
            elapsed_ms = result.elapsed.as_millis() as u64,
            "fetched"
        );
    }

    async fn report_item_error(&self, error: &PipelineError) {
        tracing::warn!(
            source = error.source_id().unwrap_or("-"),
            severity = error.severity().as_str(),
            %error,
            "item failed"
        );
    }

    async fn report_processed(&self, result: &ProcessedResult) {
        tracing::debug!(
            worker_id = result.worker_id,
            source = result.source.as_str(),
            transformed = %result.transformed,
            "processed"
        );
    }

    async fn report_completed(&self, stats: &CountersSnapshot) {
        tracing::info!(
            fetched = stats.fetched,
            processed = stats.processed,
            errors = stats.errors,
            "pipeline completed"
        );
    }
}

/// 何もしない進捗報告実装（テスト・ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_started(&self, _total_items: usize) {}

    async fn report_stage(&self, _stage: PipelineStage) {}

    async fn report_fetched(&self, _result: &FetchResult) {}

    async fn report_item_error(&self, _error: &PipelineError) {}

    async fn report_processed(&self, _result: &ProcessedResult) {}

    async fn report_completed(&self, _stats: &CountersSnapshot) {}
}

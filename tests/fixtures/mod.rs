// テストユーティリティ
// 統合テスト共通のヘルパーと記録用レポーター

#![allow(dead_code)]

use async_trait::async_trait;
use concurrency_pipeline::{
    CountersSnapshot, DefaultPipelineConfig, FetchResult, NoOpProgressReporter, PipelineEngine,
    PipelineError, PipelineStage, ProcessedResult, ProgressReporter, SimulatedFetcher,
    SimulatedTransformer,
};
use parking_lot::Mutex;
use std::time::Duration;

/// 標準の5ソース
pub const FIVE_SOURCES: [&str; 5] = ["API-1", "API-2", "API-3", "Database", "Cache"];

/// `prefix-0`から始まる`count`個のソース名
pub fn numbered_sources(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}-{i}")).collect()
}

pub type QuietEngine = PipelineEngine<
    SimulatedFetcher,
    SimulatedTransformer,
    DefaultPipelineConfig,
    NoOpProgressReporter,
>;

/// 短い遅延のシミュレーションで静音エンジンを作成
pub fn quiet_engine(fetcher: SimulatedFetcher, config: DefaultPipelineConfig) -> QuietEngine {
    PipelineEngine::new(
        fetcher,
        SimulatedTransformer::new(Duration::from_millis(5)),
        config,
        NoOpProgressReporter::new(),
    )
    .expect("valid test configuration")
}

/// 報告内容を記録するレポーター
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub started: Mutex<Option<usize>>,
    pub stages: Mutex<Vec<PipelineStage>>,
    pub fetched: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
    pub processed: Mutex<Vec<String>>,
    pub completed: Mutex<Option<CountersSnapshot>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressReporter for RecordingReporter {
    async fn report_started(&self, total_items: usize) {
        *self.started.lock() = Some(total_items);
    }

    async fn report_stage(&self, stage: PipelineStage) {
        self.stages.lock().push(stage);
    }

    async fn report_fetched(&self, result: &FetchResult) {
        self.fetched.lock().push(result.source.to_string());
    }

    async fn report_item_error(&self, error: &PipelineError) {
        self.errors.lock().push(error.to_string());
    }

    async fn report_processed(&self, result: &ProcessedResult) {
        self.processed.lock().push(result.source.to_string());
    }

    async fn report_completed(&self, stats: &CountersSnapshot) {
        *self.completed.lock() = Some(*stats);
    }
}

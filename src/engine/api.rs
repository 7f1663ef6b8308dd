// 高レベル公開API
// PipelineEngineを簡単に使用できるようにするための便利な関数

use super::PipelineEngine;
use crate::{
    core::{PipelineResult, PipelineOutput, WorkItem},
    services::{
        ConsoleProgressReporter, DefaultPipelineConfig, NoOpProgressReporter, SimulatedFetcher,
        SimulatedTransformer,
    },
};
use std::time::Duration;

/// シミュレーション取得・変換を使うエンジン
pub type SimulatedEngine<R> =
    PipelineEngine<SimulatedFetcher, SimulatedTransformer, DefaultPipelineConfig, R>;

/// ソース集合を`worker_count`個のワーカーで処理する
///
/// 取得と変換はシミュレーション実装を使い、進捗出力は行わない。
/// `worker_count == 0`や`fetch_timeout == 0`は`PipelineError::Configuration`になる。
pub async fn run_pipeline<I>(
    sources: I,
    worker_count: usize,
    fetch_timeout: Duration,
) -> PipelineResult<PipelineOutput>
where
    I: IntoIterator,
    I::Item: Into<WorkItem>,
{
    let config = DefaultPipelineConfig::new(worker_count).with_fetch_timeout(fetch_timeout);
    create_quiet_engine(config)?.run(sources).await
}

/// コンソール出力付きエンジン作成のヘルパー関数
pub fn create_default_engine(
    config: DefaultPipelineConfig,
) -> PipelineResult<SimulatedEngine<ConsoleProgressReporter>> {
    PipelineEngine::new(
        SimulatedFetcher::default(),
        SimulatedTransformer::default(),
        config,
        ConsoleProgressReporter::new(),
    )
}

/// エンジン作成のヘルパー関数（静音版）
///
/// テストやバックグラウンド処理用
pub fn create_quiet_engine(
    config: DefaultPipelineConfig,
) -> PipelineResult<SimulatedEngine<NoOpProgressReporter>> {
    PipelineEngine::new(
        SimulatedFetcher::default(),
        SimulatedTransformer::default(),
        config,
        NoOpProgressReporter::new(),
    )
}

// パイプラインのトレイト定義
// 差し替え可能な全ての抽象化インターフェースを定義

use super::error::PipelineError;
use super::types::{CountersSnapshot, FetchResult, PipelineStage, ProcessedResult, WorkItem};
use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use std::time::Duration;

/// パイプラインの設定を抽象化するトレイト
#[automock]
pub trait PipelineConfig: Send + Sync {
    /// 処理ステージのワーカー数
    fn worker_count(&self) -> usize;

    /// 1アイテムあたりの取得期限
    fn fetch_timeout(&self) -> Duration;

    /// ステージ間キューの容量（Noneなら入力件数）
    fn queue_capacity(&self) -> Option<usize>;

    /// 同時に実行する取得タスクの上限（Noneなら入力件数）
    fn max_in_flight_fetches(&self) -> Option<usize>;

    /// 取得開始の最小間隔（Noneなら間隔制限なし）
    fn fetch_start_interval(&self) -> Option<Duration>;

    /// 進捗報告を有効にするかどうか
    fn enable_progress_reporting(&self) -> bool;
}

// PipelineConfig for Box<dyn PipelineConfig>
impl PipelineConfig for Box<dyn PipelineConfig> {
    fn worker_count(&self) -> usize {
        self.as_ref().worker_count()
    }

    fn fetch_timeout(&self) -> Duration {
        self.as_ref().fetch_timeout()
    }

    fn queue_capacity(&self) -> Option<usize> {
        self.as_ref().queue_capacity()
    }

    fn max_in_flight_fetches(&self) -> Option<usize> {
        self.as_ref().max_in_flight_fetches()
    }

    fn fetch_start_interval(&self) -> Option<Duration> {
        self.as_ref().fetch_start_interval()
    }

    fn enable_progress_reporting(&self) -> bool {
        self.as_ref().enable_progress_reporting()
    }
}

/// 単一ソースからの取得処理
///
/// シミュレーション実装の代わりに実際の非同期I/Oを差し込んでも
/// 下流のステージは変更不要。
#[automock]
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, item: &WorkItem) -> Result<FetchResult>;
}

/// 取得結果を変換するワーカー処理
#[automock]
#[async_trait]
pub trait Transformer: Send + Sync {
    async fn transform(&self, worker_id: usize, fetched: &FetchResult) -> Result<String>;
}

/// 進捗報告の抽象化トレイト
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// 処理開始時の報告
    async fn report_started(&self, total_items: usize);

    /// ステージ遷移の報告
    async fn report_stage(&self, stage: PipelineStage);

    /// 取得成功の報告
    async fn report_fetched(&self, result: &FetchResult);

    /// アイテム単位のエラー報告
    async fn report_item_error(&self, error: &PipelineError);

    /// 出力ステージに届いた結果の報告
    async fn report_processed(&self, result: &ProcessedResult);

    /// 処理完了時の報告
    async fn report_completed(&self, stats: &CountersSnapshot);
}

// ProgressReporter for Box<dyn ProgressReporter>
#[async_trait]
impl ProgressReporter for Box<dyn ProgressReporter> {
    async fn report_started(&self, total_items: usize) {
        self.as_ref().report_started(total_items).await
    }

    async fn report_stage(&self, stage: PipelineStage) {
        self.as_ref().report_stage(stage).await
    }

    async fn report_fetched(&self, result: &FetchResult) {
        self.as_ref().report_fetched(result).await
    }

    async fn report_item_error(&self, error: &PipelineError) {
        self.as_ref().report_item_error(error).await
    }

    async fn report_processed(&self, result: &ProcessedResult) {
        self.as_ref().report_processed(result).await
    }

    async fn report_completed(&self, stats: &CountersSnapshot) {
        self.as_ref().report_completed(stats).await
    }
}

// Pipeline - Fetch → Process → Output の3段パイプライン
// ステージの起動、完了シグナルの連鎖、最終統計の組み立て

use super::{
    fetch_stage::FetchStage, output::spawn_output_collector, stage::StageTracker,
    worker_pool::WorkerPool,
};
use crate::{
    channel::BoundedChannel,
    core::{
        FetchResult, Fetcher, PipelineConfig, PipelineError, PipelineOutput, PipelineResult,
        PipelineStage, ProcessedResult, ProgressReporter, Transformer, WorkItem,
    },
    services::{config::validate_config, AggregateCounters, TimeoutGuardedTask},
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// 1回の実行で消費されるパイプライン
pub struct Pipeline<F, T> {
    fetcher: Arc<F>,
    transformer: Arc<T>,
    stages: StageTracker,
}

impl<F, T> Pipeline<F, T>
where
    F: Fetcher + 'static,
    T: Transformer + 'static,
{
    pub fn new(fetcher: Arc<F>, transformer: Arc<T>) -> Self {
        Self {
            fetcher,
            transformer,
            stages: StageTracker::new(),
        }
    }

    /// ステージ遷移の購読
    pub fn subscribe_stages(&self) -> watch::Receiver<PipelineStage> {
        self.stages.subscribe()
    }

    /// アイテム集合を処理して結果と統計を返す
    ///
    /// アイテム単位の失敗はカウンタに計上され、戻り値のエラーになるのは
    /// 構造的な失敗（キューの誤用、調整タスクのパニック）のみ。
    /// 構造的な失敗があっても全ステージの終了を待ってから返す。
    pub async fn execute<C, R>(
        self,
        items: Vec<WorkItem>,
        config: &C,
        reporter: Arc<R>,
        cancellation: CancellationToken,
    ) -> PipelineResult<PipelineOutput>
    where
        C: PipelineConfig + ?Sized,
        R: ProgressReporter + 'static,
    {
        validate_config(config)?;
        let start_time = Instant::now();

        let total_items = items.len();
        let capacity = config.queue_capacity().unwrap_or(total_items).max(1);
        let max_in_flight = config.max_in_flight_fetches().unwrap_or(total_items).max(1);

        let fetched = BoundedChannel::<FetchResult>::new("fetched", capacity)?;
        let processed = BoundedChannel::<ProcessedResult>::new("processed", capacity)?;
        let counters = Arc::new(AggregateCounters::new());

        // 取得開始前にプールを構築し、設定エラーで取得タスクが取り残されないようにする
        let pool = WorkerPool::new(
            config.worker_count(),
            fetched.clone(),
            processed.clone(),
            Arc::clone(&self.transformer),
            Arc::clone(&reporter),
            Arc::clone(&counters),
        )?;

        tracing::info!(
            total_items,
            workers = config.worker_count(),
            fetch_timeout_ms = config.fetch_timeout().as_millis() as u64,
            capacity,
            max_in_flight,
            fetch_start_interval_ms = config.fetch_start_interval().map(|p| p.as_millis() as u64),
            "pipeline starting"
        );
        reporter.report_started(total_items).await;
        reporter.report_stage(PipelineStage::Fetching).await;

        // Stage 1: Fetch (fan-out)
        let guard =
            TimeoutGuardedTask::new(config.fetch_timeout()).with_cancellation(cancellation.clone());
        let fetch_closer = FetchStage::new(
            Arc::clone(&self.fetcher),
            Arc::clone(&reporter),
            Arc::clone(&counters),
            guard,
            max_in_flight,
        )
        .with_start_interval(config.fetch_start_interval())
        .spawn(items, fetched);

        // Stage 2: Process (worker pool)
        let pool_handle = pool.start();

        // Stage 3: Output
        let collector = spawn_output_collector(processed, Arc::clone(&reporter));

        let mut structural_errors = Vec::new();

        // 取得キューのクローズ → Processing
        match fetch_closer.await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => structural_errors.push(error),
            Err(join_error) => structural_errors.push(PipelineError::task(join_error)),
        }
        self.enter(PipelineStage::Processing, reporter.as_ref()).await?;

        // 出力キューのクローズ → Outputting
        if let Err(error) = pool_handle.join().await {
            structural_errors.push(error);
        }
        self.enter(PipelineStage::Outputting, reporter.as_ref()).await?;

        // 出力の全件受信 → Done
        let results = match collector.await {
            Ok(results) => results,
            Err(join_error) => {
                structural_errors.push(PipelineError::task(join_error));
                Vec::new()
            }
        };
        self.enter(PipelineStage::Done, reporter.as_ref()).await?;

        let stats = counters.snapshot();
        reporter.report_completed(&stats).await;

        let cancelled = cancellation.is_cancelled();
        let elapsed = start_time.elapsed();
        tracing::info!(
            fetched = stats.fetched,
            processed = stats.processed,
            errors = stats.errors,
            elapsed_ms = elapsed.as_millis() as u64,
            cancelled,
            "pipeline finished"
        );

        let mut structural_errors = structural_errors.into_iter();
        if let Some(first) = structural_errors.next() {
            for other in structural_errors {
                tracing::error!(error = %other, "additional structural failure");
            }
            return Err(first);
        }

        Ok(PipelineOutput {
            results,
            stats,
            elapsed,
            cancelled,
        })
    }

    async fn enter<R>(&self, stage: PipelineStage, reporter: &R) -> PipelineResult<()>
    where
        R: ProgressReporter + ?Sized,
    {
        self.stages.advance(stage)?;
        tracing::info!(stage = stage.as_str(), "entering stage");
        reporter.report_stage(stage).await;
        Ok(())
    }
}

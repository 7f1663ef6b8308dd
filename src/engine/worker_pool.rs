// WorkerPool - 固定数ワーカーによる並列変換

use super::barrier::JoinBarrier;
use crate::{
    channel::BoundedChannel,
    core::{
        FetchResult, PipelineError, PipelineResult, ProcessedResult, ProgressReporter, Transformer,
    },
    services::{process_single_item, AggregateCounters},
};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// 固定数のワーカーが入力キューを競合消費し、変換結果を出力キューへ送る
///
/// 全ワーカー終了後に出力キューを1度だけクローズする。
pub struct WorkerPool<T, R> {
    worker_count: usize,
    input: BoundedChannel<FetchResult>,
    output: BoundedChannel<ProcessedResult>,
    transformer: Arc<T>,
    reporter: Arc<R>,
    counters: Arc<AggregateCounters>,
}

/// 起動済みワーカープールのハンドル
pub struct WorkerPoolHandle {
    coordinator: JoinHandle<PipelineResult<()>>,
    worker_count: usize,
}

impl WorkerPoolHandle {
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// 全ワーカーの終了（と出力キューのクローズ）を待つ
    pub async fn join(self) -> PipelineResult<()> {
        self.coordinator.await?
    }
}

impl<T, R> WorkerPool<T, R>
where
    T: Transformer + 'static,
    R: ProgressReporter + 'static,
{
    pub fn new(
        worker_count: usize,
        input: BoundedChannel<FetchResult>,
        output: BoundedChannel<ProcessedResult>,
        transformer: Arc<T>,
        reporter: Arc<R>,
        counters: Arc<AggregateCounters>,
    ) -> PipelineResult<Self> {
        if worker_count == 0 {
            return Err(PipelineError::configuration(
                "ワーカー数は1以上である必要があります",
            ));
        }

        Ok(Self {
            worker_count,
            input,
            output,
            transformer,
            reporter,
            counters,
        })
    }

    /// ワーカーを起動（IDは1から`worker_count`まで）
    pub fn start(self) -> WorkerPoolHandle {
        let mut barrier = JoinBarrier::new("workers");

        for worker_id in 1..=self.worker_count {
            barrier.spawn(run_worker(
                worker_id,
                self.input.clone(),
                self.output.clone(),
                Arc::clone(&self.transformer),
                Arc::clone(&self.reporter),
                Arc::clone(&self.counters),
            ));
        }

        WorkerPoolHandle {
            coordinator: barrier.close_after(self.output),
            worker_count: self.worker_count,
        }
    }
}

/// 単一ワーカー: 入力キューが閉じて空になるまで処理を続ける
async fn run_worker<T, R>(
    worker_id: usize,
    input: BoundedChannel<FetchResult>,
    output: BoundedChannel<ProcessedResult>,
    transformer: Arc<T>,
    reporter: Arc<R>,
    counters: Arc<AggregateCounters>,
) -> PipelineResult<()>
where
    T: Transformer + 'static,
    R: ProgressReporter + 'static,
{
    tracing::trace!(worker_id, "worker started");

    while let Some(fetched) = input.recv().await {
        match process_single_item(transformer.as_ref(), fetched, worker_id).await {
            Ok(result) => {
                if let Err(error) = output.send(result).await {
                    // 上流の送信者を解放する
                    input.close();
                    tracing::error!(worker_id, %error, "output queue closed unexpectedly");
                    return Err(error);
                }
                counters.increment_processed();
            }
            Err(error) => {
                counters.increment_errors();
                tracing::warn!(worker_id, %error, "transform failed");
                reporter.report_item_error(&error).await;
            }
        }
    }

    tracing::trace!(worker_id, "worker finished");
    Ok(())
}

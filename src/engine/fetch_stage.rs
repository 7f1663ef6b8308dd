// Fetch stage - アイテムごとの期限付き取得をファンアウト

use super::barrier::JoinBarrier;
use crate::{
    channel::BoundedChannel,
    core::{FetchResult, Fetcher, PipelineError, PipelineResult, ProgressReporter, WorkItem},
    services::{AggregateCounters, TimeoutGuardedTask},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::{interval, Interval, MissedTickBehavior};

/// 全取得タスクで共有する開始間隔のティッカー
type StartPacer = Arc<Mutex<Interval>>;

/// 取得ステージ
///
/// 入力アイテム1件につき1つの`TimeoutGuardedTask`を起動し、成功した結果を
/// 取得キューへ送る。全タスクの終了後にJoinBarrierが取得キューをクローズする。
pub struct FetchStage<F, R> {
    fetcher: Arc<F>,
    reporter: Arc<R>,
    counters: Arc<AggregateCounters>,
    guard: TimeoutGuardedTask,
    in_flight: Arc<Semaphore>,
    pacer: Option<StartPacer>,
}

impl<F, R> FetchStage<F, R>
where
    F: Fetcher + 'static,
    R: ProgressReporter + 'static,
{
    /// `max_in_flight`は同時に実行される取得タスク数の上限（0は1として扱う）
    pub fn new(
        fetcher: Arc<F>,
        reporter: Arc<R>,
        counters: Arc<AggregateCounters>,
        guard: TimeoutGuardedTask,
        max_in_flight: usize,
    ) -> Self {
        Self {
            fetcher,
            reporter,
            counters,
            guard,
            in_flight: Arc::new(Semaphore::new(max_in_flight.max(1))),
            pacer: None,
        }
    }

    /// 取得開始を`period`ごとに1件へ制限する（最初の1件は即座に開始）
    ///
    /// 期限は開始を許可された時点から計測される。
    pub fn with_start_interval(mut self, period: Option<Duration>) -> Self {
        self.pacer = period.filter(|p| !p.is_zero()).map(|p| {
            let mut ticker = interval(p);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            Arc::new(Mutex::new(ticker))
        });
        self
    }

    /// ファンアウトを開始し、取得キューのクローザーを返す
    pub fn spawn(
        self,
        items: Vec<WorkItem>,
        output: BoundedChannel<FetchResult>,
    ) -> JoinHandle<PipelineResult<()>> {
        let mut barrier = JoinBarrier::new("fetch");

        for item in items {
            barrier.spawn(fetch_one(
                item,
                Arc::clone(&self.fetcher),
                Arc::clone(&self.reporter),
                Arc::clone(&self.counters),
                self.guard.clone(),
                Arc::clone(&self.in_flight),
                self.pacer.clone(),
                output.clone(),
            ));
        }

        barrier.close_after(output)
    }
}

/// 単一アイテムの取得
async fn fetch_one<F, R>(
    item: WorkItem,
    fetcher: Arc<F>,
    reporter: Arc<R>,
    counters: Arc<AggregateCounters>,
    guard: TimeoutGuardedTask,
    in_flight: Arc<Semaphore>,
    pacer: Option<StartPacer>,
    output: BoundedChannel<FetchResult>,
) -> PipelineResult<()>
where
    F: Fetcher + 'static,
    R: ProgressReporter + 'static,
{
    // セマフォでファンアウト幅を制御
    let _permit = in_flight
        .acquire_owned()
        .await
        .map_err(|e| PipelineError::internal(anyhow::anyhow!("Semaphore error: {e}")))?;

    if let Some(pacer) = pacer {
        pacer.lock().await.tick().await;
    }

    let work_item = item.clone();
    let outcome = guard
        .run(&item, async move { fetcher.fetch(&work_item).await })
        .await;

    match outcome {
        Ok(result) => {
            counters.increment_fetched();
            tracing::debug!(
                source = result.source.as_str(),
                elapsed_ms = result.elapsed.as_millis() as u64,
                "fetched"
            );
            reporter.report_fetched(&result).await;
            output.send(result).await
        }
        Err(error) if error.is_item_level() => {
            counters.increment_errors();
            tracing::warn!(source = item.as_str(), %error, "fetch failed");
            reporter.report_item_error(&error).await;
            Ok(())
        }
        Err(error) => {
            counters.increment_errors();
            tracing::error!(source = item.as_str(), %error, "fetch task failed unexpectedly");
            Err(error)
        }
    }
}

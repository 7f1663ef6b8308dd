// Output - 変換結果の収集

use crate::{
    channel::BoundedChannel,
    core::{ProcessedResult, ProgressReporter},
};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// 出力キューがクローズされ空になるまで変換結果を収集する
///
/// 収集順は完了順であり、入力順は保証しない。
pub fn spawn_output_collector<R>(
    input: BoundedChannel<ProcessedResult>,
    reporter: Arc<R>,
) -> JoinHandle<Vec<ProcessedResult>>
where
    R: ProgressReporter + 'static,
{
    tokio::spawn(async move {
        let mut results = Vec::new();
        while let Some(result) = input.recv().await {
            reporter.report_processed(&result).await;
            results.push(result);
        }
        tracing::debug!(collected = results.len(), "output drained");
        results
    })
}

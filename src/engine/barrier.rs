// JoinBarrier - 既知のタスク集合の終了を待つ同期ポイント

use crate::channel::BoundedChannel;
use crate::core::{PipelineError, PipelineResult};
use std::future::Future;
use tokio::task::{JoinHandle, JoinSet};

/// 名前付きのタスク集合
///
/// `wait`は全タスクの終了を待ち、失敗したタスクのエラーを全て収集する。
/// `close_after`は全タスク終了後にキューを1度だけクローズするコーディネータを起動する。
pub struct JoinBarrier {
    name: String,
    tasks: JoinSet<PipelineResult<()>>,
}

impl JoinBarrier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: JoinSet::new(),
        }
    }

    /// タスクを起動してバリアに登録
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = PipelineResult<()>> + Send + 'static,
    {
        self.tasks.spawn(task);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// 全タスクの終了を待ち、発生したエラーを返す
    pub async fn wait(mut self) -> Vec<PipelineError> {
        let mut errors = Vec::new();
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(error)) => errors.push(error),
                Err(join_error) => errors.push(PipelineError::task(join_error)),
            }
        }
        errors
    }

    /// 全タスク終了後に`channel`をクローズするコーディネータを起動
    ///
    /// タスクが失敗してもクローズは必ず行う（下流が待ち続けないように）。
    /// 先にクローズされていた場合はクローザー契約違反として`ClosedChannel`を返す。
    pub fn close_after<T>(self, channel: BoundedChannel<T>) -> JoinHandle<PipelineResult<()>>
    where
        T: Send + 'static,
    {
        tokio::spawn(async move {
            let barrier = self.name.clone();
            let errors = self.wait().await;

            let closed_here = channel.close();
            tracing::debug!(
                barrier = %barrier,
                channel = channel.name(),
                failed_tasks = errors.len(),
                "all tasks joined, queue closed"
            );

            let mut errors = errors.into_iter();
            if let Some(first) = errors.next() {
                for other in errors {
                    tracing::error!(barrier = %barrier, error = %other, "additional task failure");
                }
                return Err(first);
            }

            if !closed_here {
                tracing::error!(
                    barrier = %barrier,
                    channel = channel.name(),
                    "queue was closed before its producers finished"
                );
                return Err(PipelineError::closed_channel(channel.name()));
            }

            Ok(())
        })
    }
}

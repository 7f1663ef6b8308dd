// TimeoutGuardedTask - 期限付きの非同期取得

use crate::core::{FetchResult, PipelineError, PipelineResult, WorkItem};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// 1単位の処理を別タスクで実行し、期限と競争させる
///
/// 1回の`run`につき、成功・タイムアウト・取得失敗・キャンセルのうち
/// ちょうど1つだけが報告される。期限切れ後に完了した処理の結果は破棄される。
#[derive(Debug, Clone)]
pub struct TimeoutGuardedTask {
    deadline: Duration,
    cancellation: Option<CancellationToken>,
}

impl TimeoutGuardedTask {
    pub fn new(deadline: Duration) -> Self {
        Self {
            deadline,
            cancellation: None,
        }
    }

    /// キャンセルトークンを関連付ける
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// 処理を実行し、期限内に完了すれば結果を返す
    pub async fn run<Fut>(&self, source: &WorkItem, work: Fut) -> PipelineResult<FetchResult>
    where
        Fut: Future<Output = anyhow::Result<FetchResult>> + Send + 'static,
    {
        if self
            .cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
        {
            return Err(PipelineError::cancelled(source.as_str()));
        }

        let mut handle = tokio::spawn(work);
        let cancelled = async {
            match &self.cancellation {
                Some(token) => token.cancelled().await,
                None => std::future::pending::<()>().await,
            }
        };

        let outcome = tokio::select! {
            joined = &mut handle => match joined {
                Ok(Ok(result)) => Ok(result),
                Ok(Err(error)) => Err(PipelineError::fetch(source.as_str(), format!("{error:#}"))),
                Err(join_error) if join_error.is_panic() => Err(PipelineError::fetch(
                    source.as_str(),
                    "取得タスクがパニックしました",
                )),
                Err(join_error) => Err(PipelineError::task(join_error)),
            },
            _ = tokio::time::sleep(self.deadline) => {
                Err(PipelineError::timeout(source.as_str(), self.deadline))
            }
            _ = cancelled => Err(PipelineError::cancelled(source.as_str())),
        };

        // 期限切れ・キャンセル時は実行中の処理を破棄
        if outcome.is_err() {
            handle.abort();
        }

        outcome
    }
}

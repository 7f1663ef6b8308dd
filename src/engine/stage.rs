// ステージ状態機械: Fetching → Processing → Outputting → Done

use crate::core::{PipelineError, PipelineResult, PipelineStage};
use tokio::sync::watch;

/// 前進のみを許すステージトラッカー
///
/// 購読者は`watch::Receiver`で遷移を観測できる。
#[derive(Debug)]
pub struct StageTracker {
    tx: watch::Sender<PipelineStage>,
}

impl StageTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(PipelineStage::Fetching);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<PipelineStage> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> PipelineStage {
        *self.tx.borrow()
    }

    /// 次のステージへ進める（後退・同一ステージへの遷移はエラー）
    pub fn advance(&self, next: PipelineStage) -> PipelineResult<()> {
        let current = self.current();
        if next <= current {
            return Err(PipelineError::internal(anyhow::anyhow!(
                "不正なステージ遷移: {current} -> {next}"
            )));
        }

        self.tx.send_replace(next);
        tracing::debug!(from = current.as_str(), to = next.as_str(), "stage advanced");
        Ok(())
    }
}

impl Default for StageTracker {
    fn default() -> Self {
        Self::new()
    }
}

// シミュレーション変換 - ランダムな処理時間で変換処理を模擬

use crate::core::{FetchResult, Transformer, WorkItem};
use crate::services::fetch::simulated::random_latency;
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;

/// `PROCESSED[<payload>]`形式に変換するTransformer
#[derive(Debug, Clone)]
pub struct SimulatedTransformer {
    max_latency: Duration,
    failing_sources: HashSet<WorkItem>,
}

impl SimulatedTransformer {
    pub fn new(max_latency: Duration) -> Self {
        Self {
            max_latency,
            failing_sources: HashSet::new(),
        }
    }

    /// 指定ソースの変換を失敗させる
    pub fn with_failure(mut self, source: impl Into<WorkItem>) -> Self {
        self.failing_sources.insert(source.into());
        self
    }
}

impl Default for SimulatedTransformer {
    fn default() -> Self {
        Self::new(Duration::from_millis(200))
    }
}

#[async_trait]
impl Transformer for SimulatedTransformer {
    async fn transform(&self, _worker_id: usize, fetched: &FetchResult) -> Result<String> {
        tokio::time::sleep(random_latency(self.max_latency)).await;

        if self.failing_sources.contains(&fetched.source) {
            bail!("simulated transform failure for {}", fetched.source);
        }

        Ok(format!("PROCESSED[{}]", fetched.payload))
    }
}

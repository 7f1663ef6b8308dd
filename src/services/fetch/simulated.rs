// シミュレーション取得 - ランダムな遅延でネットワーク取得を模擬

use crate::core::{FetchResult, Fetcher, WorkItem};
use anyhow::{bail, Result};
use async_trait::async_trait;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// 0以上`max`未満のランダムな遅延
pub(crate) fn random_latency(max: Duration) -> Duration {
    let max_ms = max.as_millis() as u64;
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..max_ms))
}

/// スリープで取得処理を模擬するFetcher
///
/// ソースごとに遅延を固定したり、失敗させたりできる（テスト・デモ用）。
#[derive(Debug, Clone)]
pub struct SimulatedFetcher {
    max_latency: Duration,
    forced_latencies: HashMap<WorkItem, Duration>,
    failing_sources: HashSet<WorkItem>,
}

impl SimulatedFetcher {
    pub fn new(max_latency: Duration) -> Self {
        Self {
            max_latency,
            forced_latencies: HashMap::new(),
            failing_sources: HashSet::new(),
        }
    }

    /// 指定ソースの遅延を固定
    pub fn with_latency(mut self, source: impl Into<WorkItem>, latency: Duration) -> Self {
        self.forced_latencies.insert(source.into(), latency);
        self
    }

    /// 指定ソースの取得を失敗させる
    pub fn with_failure(mut self, source: impl Into<WorkItem>) -> Self {
        self.failing_sources.insert(source.into());
        self
    }

    pub fn max_latency(&self) -> Duration {
        self.max_latency
    }

    fn latency_for(&self, item: &WorkItem) -> Duration {
        self.forced_latencies
            .get(item)
            .copied()
            .unwrap_or_else(|| random_latency(self.max_latency))
    }
}

impl Default for SimulatedFetcher {
    fn default() -> Self {
        Self::new(Duration::from_millis(800))
    }
}

#[async_trait]
impl Fetcher for SimulatedFetcher {
    async fn fetch(&self, item: &WorkItem) -> Result<FetchResult> {
        let latency = self.latency_for(item);
        tokio::time::sleep(latency).await;

        if self.failing_sources.contains(item) {
            bail!("simulated fetch failure from {item}");
        }

        Ok(FetchResult {
            source: item.clone(),
            payload: format!("data-from-{item}"),
            elapsed: latency,
        })
    }
}

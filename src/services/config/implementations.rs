// 設定管理の具象実装

use crate::core::{PipelineConfig, PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// デフォルト設定実装
///
/// JSON設定ファイルとして読み込む場合、省略したフィールドはデフォルト値になる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultPipelineConfig {
    worker_count: usize,
    #[serde(rename = "fetch_timeout_ms", with = "timeout_millis")]
    fetch_timeout: Duration,
    queue_capacity: Option<usize>,
    max_in_flight_fetches: Option<usize>,
    #[serde(rename = "fetch_start_interval_ms", with = "optional_millis")]
    fetch_start_interval: Option<Duration>,
    enable_progress: bool,
}

impl DefaultPipelineConfig {
    pub fn new(worker_count: usize) -> Self {
        Self {
            worker_count,
            ..Self::default()
        }
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    pub fn with_max_in_flight_fetches(mut self, limit: usize) -> Self {
        self.max_in_flight_fetches = Some(limit);
        self
    }

    /// 取得開始を`interval`ごとに1件へ制限する
    pub fn with_fetch_start_interval(mut self, interval: Duration) -> Self {
        self.fetch_start_interval = Some(interval);
        self
    }

    pub fn with_progress_reporting(mut self, enable: bool) -> Self {
        self.enable_progress = enable;
        self
    }

    /// JSONファイルから設定を読み込む
    pub fn from_json_file(path: &Path) -> PipelineResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::configuration(format!("設定ファイル読み込みエラー: {} - {e}", path.display()))
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> PipelineResult<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| PipelineError::configuration(format!("JSON解析エラー: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// 設定値の検証
    pub fn validate(&self) -> PipelineResult<()> {
        validate_config(self)
    }
}

impl Default for DefaultPipelineConfig {
    fn default() -> Self {
        Self {
            worker_count: 3,
            fetch_timeout: Duration::from_secs(1),
            queue_capacity: None,
            max_in_flight_fetches: None,
            fetch_start_interval: None,
            enable_progress: true,
        }
    }
}

impl PipelineConfig for DefaultPipelineConfig {
    fn worker_count(&self) -> usize {
        self.worker_count
    }

    fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    fn queue_capacity(&self) -> Option<usize> {
        self.queue_capacity
    }

    fn max_in_flight_fetches(&self) -> Option<usize> {
        self.max_in_flight_fetches
    }

    fn fetch_start_interval(&self) -> Option<Duration> {
        self.fetch_start_interval
    }

    fn enable_progress_reporting(&self) -> bool {
        self.enable_progress
    }
}

// JSON上はミリ秒（1ms未満の端数は切り上げ）
mod timeout_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(super) fn ceil_millis(value: &Duration) -> u64 {
        u64::try_from(value.as_nanos().div_ceil(1_000_000)).unwrap_or(u64::MAX)
    }

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(ceil_millis(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

mod optional_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => {
                serializer.serialize_some(&super::timeout_millis::ceil_millis(duration))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(deserializer).map(|millis| millis.map(Duration::from_millis))
    }
}

/// 任意のPipelineConfig実装の検証
pub fn validate_config<C: PipelineConfig + ?Sized>(config: &C) -> PipelineResult<()> {
    if config.worker_count() == 0 {
        return Err(PipelineError::configuration(
            "ワーカー数は1以上である必要があります",
        ));
    }

    if config.fetch_timeout().is_zero() {
        return Err(PipelineError::configuration(
            "取得タイムアウトは0より大きい必要があります",
        ));
    }

    if config.queue_capacity() == Some(0) {
        return Err(PipelineError::configuration(
            "キュー容量は1以上である必要があります",
        ));
    }

    if config.max_in_flight_fetches() == Some(0) {
        return Err(PipelineError::configuration(
            "同時取得数は1以上である必要があります",
        ));
    }

    if config.fetch_start_interval().is_some_and(|interval| interval.is_zero()) {
        return Err(PipelineError::configuration(
            "取得開始間隔は0より大きい必要があります",
        ));
    }

    Ok(())
}

/// 組み込みの設定プリセット
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ConfigPreset {
    /// バランスの取れたデフォルト設定
    Default,
    /// CPU数に応じたワーカー数と大きめのバッファ
    HighThroughput,
    /// 短いタイムアウトの小さな設定（テスト用）
    Testing,
}

impl ConfigPreset {
    pub const ALL: [ConfigPreset; 3] = [Self::Default, Self::HighThroughput, Self::Testing];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::HighThroughput => "high-throughput",
            Self::Testing => "testing",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "3ワーカー・1秒タイムアウトのバランス設定",
            Self::HighThroughput => "CPU数x2のワーカー・大きなキュー容量",
            Self::Testing => "1ワーカー・短いタイムアウト・進捗報告なし",
        }
    }

    pub fn build(&self) -> DefaultPipelineConfig {
        match self {
            Self::Default => DefaultPipelineConfig::default(),
            Self::HighThroughput => DefaultPipelineConfig::new(num_cpus::get().max(1) * 2)
                .with_queue_capacity(256)
                .with_fetch_timeout(Duration::from_secs(2)),
            Self::Testing => DefaultPipelineConfig::new(1)
                .with_fetch_timeout(Duration::from_millis(200))
                .with_progress_reporting(false),
        }
    }
}

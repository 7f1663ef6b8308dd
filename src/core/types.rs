// パイプラインを流れるデータ型定義

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// 取得ステージへの入力単位（ソース識別子）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkItem(String);

impl WorkItem {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkItem {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<String> for WorkItem {
    fn from(source: String) -> Self {
        Self(source)
    }
}

/// 取得成功時の結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResult {
    pub source: WorkItem,
    pub payload: String,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

/// ワーカーが変換した結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedResult {
    pub worker_id: usize,
    pub source: WorkItem,
    pub original: String,
    pub transformed: String,
}

/// 集計カウンタのスナップショット
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountersSnapshot {
    pub fetched: usize,
    pub processed: usize,
    pub errors: usize,
}

/// パイプラインの段階
///
/// 遷移は常に前方向のみ（Fetching → Processing → Outputting → Done）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Fetching,
    Processing,
    Outputting,
    Done,
}

impl PipelineStage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::Processing => "processing",
            Self::Outputting => "outputting",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// パイプライン実行全体の出力
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub results: Vec<ProcessedResult>,
    pub stats: CountersSnapshot,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
    pub cancelled: bool,
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

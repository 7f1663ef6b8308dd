// Custom error types for the concurrent pipeline
// パイプライン専用のカスタムエラー型定義

use std::time::Duration;
use thiserror::Error;

/// パイプライン固有のエラー型
///
/// アイテム単位のエラー（タイムアウト・取得失敗・変換失敗・キャンセル）は
/// カウンタに記録されるデータとして扱い、構造的なエラー（クローズ済みチャンネルへの
/// 送信、タスクのパニック）だけが呼び出し元に返される。
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("タイムアウト: {source_id} ({deadline:?} 以内に完了しませんでした)")]
    Timeout { source_id: String, deadline: Duration },

    #[error("チャンネルエラー: {channel} は既にクローズされています")]
    ClosedChannel { channel: String },

    #[error("設定エラー: {message}")]
    Configuration { message: String },

    #[error("取得エラー: {source_id} - {reason}")]
    Fetch { source_id: String, reason: String },

    #[error("変換エラー: {source_id} - {reason}")]
    Transform { source_id: String, reason: String },

    #[error("キャンセル: {source_id}")]
    Cancelled { source_id: String },

    #[error("タスクエラー: {source}")]
    Task {
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("内部エラー: {source}")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl PipelineError {
    /// タイムアウトエラーの作成
    pub fn timeout(source_id: impl Into<String>, deadline: Duration) -> Self {
        Self::Timeout {
            source_id: source_id.into(),
            deadline,
        }
    }

    /// クローズ済みチャンネルエラーの作成
    pub fn closed_channel(channel: impl Into<String>) -> Self {
        Self::ClosedChannel {
            channel: channel.into(),
        }
    }

    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// 取得エラーの作成
    pub fn fetch(source_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            source_id: source_id.into(),
            reason: reason.into(),
        }
    }

    /// 変換エラーの作成
    pub fn transform(source_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Transform {
            source_id: source_id.into(),
            reason: reason.into(),
        }
    }

    /// キャンセルエラーの作成
    pub fn cancelled(source_id: impl Into<String>) -> Self {
        Self::Cancelled {
            source_id: source_id.into(),
        }
    }

    /// タスクエラーの作成
    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::Task { source }
    }

    /// 内部エラーの作成
    pub fn internal(source: anyhow::Error) -> Self {
        Self::Internal { source }
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Cancelled { .. } => ErrorSeverity::Low,
            Self::Timeout { .. } | Self::Fetch { .. } | Self::Transform { .. } => {
                ErrorSeverity::Medium
            }
            Self::Configuration { .. } => ErrorSeverity::High,
            Self::ClosedChannel { .. } | Self::Task { .. } | Self::Internal { .. } => {
                ErrorSeverity::Critical
            }
        }
    }

    /// アイテム単位のエラーかどうか
    ///
    /// trueの場合はカウンタに記録して処理を続行する。falseはオーケストレーション側の
    /// 契約違反であり、パイプライン全体の失敗として扱う。
    pub fn is_item_level(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::Fetch { .. }
                | Self::Transform { .. }
                | Self::Cancelled { .. }
        )
    }

    /// 関連するソースIDを取得
    pub fn source_id(&self) -> Option<&str> {
        match self {
            Self::Timeout { source_id, .. }
            | Self::Fetch { source_id, .. }
            | Self::Transform { source_id, .. }
            | Self::Cancelled { source_id } => Some(source_id),
            _ => None,
        }
    }
}

/// エラーの重要度レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 低重要度 - ログ出力程度
    Low,
    /// 中重要度 - 警告レベル
    Medium,
    /// 高重要度 - 要対応
    High,
    /// 致命的 - オーケストレーションのバグ
    Critical,
}

impl ErrorSeverity {
    /// 重要度の文字列表現を取得
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// パイプラインの結果型
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

impl From<anyhow::Error> for PipelineError {
    fn from(error: anyhow::Error) -> Self {
        PipelineError::Internal { source: error }
    }
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(error: tokio::task::JoinError) -> Self {
        PipelineError::Task { source: error }
    }
}

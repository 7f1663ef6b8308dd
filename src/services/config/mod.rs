// 設定管理機能
// パイプライン設定、プリセット、設定ファイル読み込み

pub mod implementations;

// 公開API
pub use implementations::{validate_config, ConfigPreset, DefaultPipelineConfig};

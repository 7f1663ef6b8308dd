// 進捗監視機能
// ステージ遷移、アイテム結果、エラー、完了統計の報告

pub mod implementations;

// 公開API
pub use implementations::{ConsoleProgressReporter, NoOpProgressReporter, TracingProgressReporter};

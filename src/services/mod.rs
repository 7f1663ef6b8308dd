// サービス層 - 機能別のロジック
// 各サービスは特定の責任を持ち、疎結合で設計されている

pub mod config;
pub mod fetch;
pub mod monitoring;
pub mod processing;
pub mod stats;

// 公開API - 各サービスの主要機能を明示的にエクスポート
pub use config::{ConfigPreset, DefaultPipelineConfig};
pub use fetch::{SimulatedFetcher, TimeoutGuardedTask};
pub use monitoring::{ConsoleProgressReporter, NoOpProgressReporter, TracingProgressReporter};
pub use processing::{process_single_item, SimulatedTransformer};
pub use stats::AggregateCounters;

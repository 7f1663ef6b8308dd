// 取得機能
// 期限付き実行とシミュレーション取得

pub mod simulated;
pub mod timeout_task;

// 公開API
pub use simulated::SimulatedFetcher;
pub use timeout_task::TimeoutGuardedTask;

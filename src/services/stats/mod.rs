// 集計カウンタ
// 全ステージから並行に更新される唯一の共有可変状態

use crate::core::CountersSnapshot;
use parking_lot::Mutex;

/// 取得数・処理数・エラー数を単一のクリティカルセクションで保護するカウンタ
///
/// フィールドへの直接アクセスは提供せず、インクリメントと一貫したスナップショットのみを公開する。
#[derive(Debug, Default)]
pub struct AggregateCounters {
    inner: Mutex<CountersSnapshot>,
}

impl AggregateCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_fetched(&self) {
        self.inner.lock().fetched += 1;
    }

    pub fn increment_processed(&self) {
        self.inner.lock().processed += 1;
    }

    pub fn increment_errors(&self) {
        self.inner.lock().errors += 1;
    }

    /// 3つの値を同じロック内で読み取ったスナップショット
    pub fn snapshot(&self) -> CountersSnapshot {
        *self.inner.lock()
    }
}

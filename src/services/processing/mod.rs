// 変換処理機能
// 取得結果の変換と単一アイテム処理

pub mod transformer;
pub mod worker;

// 公開API
pub use transformer::SimulatedTransformer;
pub use worker::process_single_item;

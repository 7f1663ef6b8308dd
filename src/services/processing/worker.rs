// Worker - 単一アイテム処理機能

use crate::core::{FetchResult, PipelineError, PipelineResult, ProcessedResult, Transformer};

/// 単一の取得結果を変換
///
/// 変換の失敗はアイテム単位のエラー（`PipelineError::Transform`）として返す。
pub async fn process_single_item<T>(
    transformer: &T,
    fetched: FetchResult,
    worker_id: usize,
) -> PipelineResult<ProcessedResult>
where
    T: Transformer + ?Sized,
{
    match transformer.transform(worker_id, &fetched).await {
        Ok(transformed) => Ok(ProcessedResult {
            worker_id,
            source: fetched.source,
            original: fetched.payload,
            transformed,
        }),
        Err(error) => Err(PipelineError::transform(
            fetched.source.as_str(),
            format!("{error:#}"),
        )),
    }
}

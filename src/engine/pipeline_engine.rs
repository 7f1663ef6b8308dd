// PipelineEngine - 依存性注入による並行パイプラインエンジン
// 取得・変換・設定・進捗報告の全てをコンストラクタで注入する

use super::pipeline::Pipeline;
use crate::{
    core::{
        Fetcher, PipelineConfig, PipelineOutput, PipelineResult, ProgressReporter, Transformer,
        WorkItem,
    },
    services::{config::validate_config, NoOpProgressReporter},
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// 依存性注入による並行パイプラインエンジン
///
/// 並列処理で共有される依存関係は初期からArcで管理する。
/// 実行ごとに新しい`Pipeline`を組み立てるため、同じエンジンを繰り返し実行できる。
pub struct PipelineEngine<F, T, C, R> {
    fetcher: Arc<F>,
    transformer: Arc<T>,
    config: Arc<C>,
    reporter: Arc<R>,
}

impl<F, T, C, R> PipelineEngine<F, T, C, R>
where
    F: Fetcher + 'static,
    T: Transformer + 'static,
    C: PipelineConfig,
    R: ProgressReporter + 'static,
{
    /// 新しいエンジンを作成（設定はここで検証する）
    pub fn new(fetcher: F, transformer: T, config: C, reporter: R) -> PipelineResult<Self> {
        validate_config(&config)?;

        Ok(Self {
            fetcher: Arc::new(fetcher),
            transformer: Arc::new(transformer),
            config: Arc::new(config),
            reporter: Arc::new(reporter),
        })
    }

    /// ソース集合を処理
    pub async fn run<I>(&self, sources: I) -> PipelineResult<PipelineOutput>
    where
        I: IntoIterator,
        I::Item: Into<WorkItem>,
    {
        self.run_with_cancellation(sources, CancellationToken::new())
            .await
    }

    /// キャンセル可能な実行
    ///
    /// キャンセル後に未完了の取得はエラーとして計上され、取得済みのアイテムは
    /// 通常どおり変換・出力される。
    pub async fn run_with_cancellation<I>(
        &self,
        sources: I,
        cancellation: CancellationToken,
    ) -> PipelineResult<PipelineOutput>
    where
        I: IntoIterator,
        I::Item: Into<WorkItem>,
    {
        let items: Vec<WorkItem> = sources.into_iter().map(Into::into).collect();
        let pipeline = Pipeline::new(Arc::clone(&self.fetcher), Arc::clone(&self.transformer));

        if self.config.enable_progress_reporting() {
            pipeline
                .execute(
                    items,
                    self.config.as_ref(),
                    Arc::clone(&self.reporter),
                    cancellation,
                )
                .await
        } else {
            pipeline
                .execute(
                    items,
                    self.config.as_ref(),
                    Arc::new(NoOpProgressReporter::new()),
                    cancellation,
                )
                .await
        }
    }

    /// 設定への参照を取得
    pub fn config(&self) -> &C {
        &self.config
    }

    /// レポーターへの参照を取得
    pub fn reporter(&self) -> &R {
        &self.reporter
    }
}

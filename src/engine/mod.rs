// エンジン層 - 並行処理とオーケストレーション
// サービス層を組み合わせて3段パイプラインを構成する

pub mod api;
pub mod barrier;
mod fetch_stage;
mod output;
mod pipeline;
pub mod pipeline_engine;
pub mod stage;
pub mod worker_pool;

// 公開API - 主要エンジンクラス
pub use api::{create_default_engine, create_quiet_engine, run_pipeline, SimulatedEngine};
pub use barrier::JoinBarrier;
pub use pipeline::Pipeline;
pub use pipeline_engine::PipelineEngine;
pub use stage::StageTracker;
pub use worker_pool::{WorkerPool, WorkerPoolHandle};

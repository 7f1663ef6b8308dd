//! Bounded three-stage pipeline: concurrent fetches with per-item deadlines, a fixed worker
//! pool for processing, and a single output consumer, joined by bounded channels.

pub mod channel;
pub mod cli;
pub mod core;
pub mod engine;
pub mod services;
pub mod telemetry;

pub use crate::channel::BoundedChannel;
pub use crate::core::{
    CountersSnapshot, ErrorSeverity, FetchResult, Fetcher, PipelineConfig, PipelineError,
    PipelineOutput, PipelineResult, PipelineStage, ProcessedResult, ProgressReporter, Transformer,
    WorkItem,
};
pub use crate::engine::{
    create_default_engine, create_quiet_engine, run_pipeline, JoinBarrier, Pipeline,
    PipelineEngine, StageTracker, WorkerPool, WorkerPoolHandle,
};
pub use crate::services::{
    AggregateCounters, ConfigPreset, ConsoleProgressReporter, DefaultPipelineConfig,
    NoOpProgressReporter, SimulatedFetcher, SimulatedTransformer, TimeoutGuardedTask,
    TracingProgressReporter,
};

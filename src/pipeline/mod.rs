//! Pipelines.
//!
//! The batch machinery lives here: [batch] cuts the corpus, [worker] runs shards on a fixed pool,
//! and [scheduler] ties them together with checkpointing.
//! [PhrasePipeline] wires a [RunConfig] into all of it, behind the light [pipeline::Pipeline] trait.
pub mod batch;
pub mod config;
mod phrases;
#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod scheduler;
pub mod worker;

pub use config::RunConfig;
pub use phrases::PhrasePipeline;
pub use pipeline::Pipeline;
pub use scheduler::{artifact_path, BatchScheduler, RunSummary};
pub use worker::{WorkerContext, WorkerPool};

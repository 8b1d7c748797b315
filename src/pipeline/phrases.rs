//! Phrase extraction pipeline.
//!
//! Loads the corpus, starts the worker pool and hands both to the [BatchScheduler].
use log::debug;

use crate::error::Error;
use crate::filtering::SurfaceFilter;
use crate::io::reader::read_corpus;

use super::config::RunConfig;
use super::pipeline::Pipeline;
use super::scheduler::{BatchScheduler, RunSummary};
use super::worker::WorkerPool;

pub struct PhrasePipeline {
    config: RunConfig,
}

impl PhrasePipeline {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }
}

impl Pipeline<RunSummary> for PhrasePipeline {
    fn run(&self) -> Result<RunSummary, Error> {
        self.config.validate()?;
        debug!("config: {:#?}", self.config);

        // a missing corpus stops us before any batch work.
        let corpus = read_corpus(&self.config.corpus)?;

        let kind = self.config.tagger.clone();
        let mut pool = WorkerPool::new(
            self.config.workers,
            move || kind.build(),
            self.config.extractor(),
        )?;
        if self.config.drop_noise {
            pool = pool.with_surface_filter(SurfaceFilter);
        }

        let scheduler =
            BatchScheduler::new(self.config.dst.clone(), self.config.batch_size, pool)?;
        scheduler.run(&corpus)
    }
}

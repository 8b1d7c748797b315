/*! Batch scheduler

Drives the worker pool over a whole corpus, one batch at a time:

1. batch `i` is skipped if `batch_{i}.parquet` exists in the output folder,
2. otherwise it is split into shards, processed by the pool and reassembled in corpus order,
3. and written as a single artifact before batch `i + 1` starts.

The artifact is the only progress marker. A batch that fails leaves nothing behind and is
processed again, in full, on the next run.
!*/
use std::path::{Path, PathBuf};

use log::{debug, error, info};

use crate::error::Error;
use crate::io::writer::ArtifactWriter;
use crate::tagger::{Tagger, TaggerError};
use crate::unit::TextUnit;

use super::batch::{batch_count, reassemble, Batch};
use super::worker::WorkerPool;

pub const ARTIFACT_PREFIX: &str = "batch_";
pub const ARTIFACT_EXTENSION: &str = "parquet";

/// Location of the artifact of batch `index`.
pub fn artifact_path(dst: &Path, index: usize) -> PathBuf {
    dst.join(format!("{ARTIFACT_PREFIX}{index}.{ARTIFACT_EXTENSION}"))
}

/// What a run did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub batches: usize,
    pub skipped: usize,
    pub written: usize,
    /// Units processed in this run (skipped batches excluded).
    pub units: usize,
    pub failed_units: usize,
}

pub struct BatchScheduler<T, F> {
    dst: PathBuf,
    batch_size: usize,
    pool: WorkerPool<T, F>,
    writer: ArtifactWriter,
}

impl<T, F> BatchScheduler<T, F>
where
    T: Tagger + Send,
    F: Fn() -> Result<T, TaggerError> + Sync,
{
    pub fn new(dst: PathBuf, batch_size: usize, pool: WorkerPool<T, F>) -> Result<Self, Error> {
        if batch_size == 0 {
            return Err(Error::Config("batch size must be at least 1".to_string()));
        }
        Ok(Self {
            dst,
            batch_size,
            pool,
            writer: ArtifactWriter::new(),
        })
    }

    pub fn dst(&self) -> &Path {
        &self.dst
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn pool(&self) -> &WorkerPool<T, F> {
        &self.pool
    }

    fn prepare_dst(&self) -> Result<(), Error> {
        if !self.dst.exists() {
            info!("creating output folder {:?}", self.dst);
            std::fs::create_dir_all(&self.dst)?;
        }
        if !self.dst.is_dir() {
            return Err(Error::Config(format!(
                "output location {:?} is not a directory",
                self.dst
            )));
        }
        Ok(())
    }

    /// Process every batch of `corpus` that has no artifact yet.
    pub fn run(&self, corpus: &[TextUnit]) -> Result<RunSummary, Error> {
        self.prepare_dst()?;

        let total = batch_count(corpus.len(), self.batch_size);
        info!(
            "{} units, {} batches of {} on {} workers",
            corpus.len(),
            total,
            self.batch_size,
            self.pool.workers()
        );

        let mut summary = RunSummary {
            batches: total,
            ..Default::default()
        };

        for index in 0..total {
            let path = artifact_path(&self.dst, index);
            if path.exists() {
                debug!("batch {} already done, skipping", index);
                summary.skipped += 1;
                continue;
            }

            let batch = Batch::new(corpus, index, self.batch_size)
                .ok_or_else(|| Error::Custom(format!("batch {index} is out of bounds")))?;

            let failed = self.process_batch(&batch, &path).map_err(|e| {
                error!("batch {} failed: {:?}", index, e);
                e
            })?;

            summary.written += 1;
            summary.units += batch.len();
            summary.failed_units += failed;
            info!(
                "batch {}/{}: {} units ({} tagging failures) written to {:?}",
                index + 1,
                total,
                batch.len(),
                failed,
                path
            );
        }

        info!(
            "done: {} batches written, {} skipped",
            summary.written, summary.skipped
        );
        Ok(summary)
    }

    /// Process a single batch and commit its artifact to `path`.
    ///
    /// Returns the number of units whose tagging failed.
    pub fn process_batch(&self, batch: &Batch<'_>, path: &Path) -> Result<usize, Error> {
        let shards = batch.shards(self.pool.workers());
        debug!("batch {}: {} shards", batch.index(), shards.len());

        let results = reassemble(batch.len(), self.pool.process(shards)?)?;

        let units: Vec<TextUnit> = batch
            .units()
            .iter()
            .cloned()
            .zip(results)
            .map(|(unit, result)| unit.with_result(result))
            .collect();
        let failed = units
            .iter()
            .filter(|u| u.result().map_or(false, |r| r.is_failed()))
            .count();

        self.writer.write(path, batch.offset(), &units)?;
        Ok(failed)
    }
}

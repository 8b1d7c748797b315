/*! Worker pool

A fixed pool of `workers` threads, built once and reused for every batch.

Each pool thread owns a [WorkerContext] holding its own tagger. The tagger is built by the pool's
factory the first time the thread runs a shard, then reused until the pool is dropped.
Taggers are never shared: a context is only ever locked by the pool thread it belongs to.
!*/
use std::sync::Mutex;

use log::{debug, error, info, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::Error;
use crate::extract::PhraseExtractor;
use crate::filtering::SurfaceFilter;
use crate::tagger::{Tagger, TaggerError};
use crate::unit::UnitResult;

use super::batch::{Shard, ShardResult};

/// Tag a single text and extract its phrases.
pub fn phrases_for<T: Tagger + ?Sized>(
    tagger: &mut T,
    extractor: &PhraseExtractor,
    surface_filter: Option<&SurfaceFilter>,
    text: &str,
) -> Result<Vec<String>, TaggerError> {
    let mut tokens = tagger.tag(text)?;
    if let Some(filter) = surface_filter {
        filter.retain(&mut tokens);
    }
    Ok(extractor.extract(&tokens))
}

/// Per-worker state.
pub struct WorkerContext<T> {
    id: usize,
    tagger: Option<T>,
    processed: usize,
    failed: usize,
}

impl<T: Tagger> WorkerContext<T> {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            tagger: None,
            processed: 0,
            failed: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn is_initialized(&self) -> bool {
        self.tagger.is_some()
    }

    /// Units processed so far, failed ones included.
    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Get the worker tagger, building it on first use.
    fn tagger<F>(&mut self, factory: &F) -> Result<&mut T, TaggerError>
    where
        F: Fn() -> Result<T, TaggerError>,
    {
        let tagger = match self.tagger.take() {
            Some(tagger) => tagger,
            None => {
                info!("worker {}: building tagger", self.id);
                factory()?
            }
        };
        Ok(self.tagger.insert(tagger))
    }

    /// Tag one text and extract its phrases.
    ///
    /// A tagger that died is dropped, rebuilt, and given the text once more.
    fn phrases<F>(
        &mut self,
        factory: &F,
        extractor: &PhraseExtractor,
        surface_filter: Option<&SurfaceFilter>,
        text: &str,
    ) -> Result<Vec<String>, TaggerError>
    where
        F: Fn() -> Result<T, TaggerError>,
    {
        let first = {
            let tagger = self.tagger(factory)?;
            phrases_for(tagger, extractor, surface_filter, text)
        };
        match first {
            Err(e) if e.is_fatal() => {
                warn!("worker {}: tagger died ({}), restarting it", self.id, e);
                self.tagger = None;
                let retried = {
                    let tagger = self.tagger(factory)?;
                    phrases_for(tagger, extractor, surface_filter, text)
                };
                if matches!(&retried, Err(e) if e.is_fatal()) {
                    self.tagger = None;
                }
                retried
            }
            res => res,
        }
    }

    /// Extract phrases from each text.
    ///
    /// Returns one result per text, in order. A malformed tagging only affects its own text.
    /// An error is returned if the tagger cannot be built, or dies again right after a restart:
    /// the caller must then discard every result of this call.
    pub fn process<'a, F, I>(
        &mut self,
        factory: &F,
        extractor: &PhraseExtractor,
        surface_filter: Option<&SurfaceFilter>,
        texts: I,
    ) -> Result<Vec<UnitResult>, TaggerError>
    where
        F: Fn() -> Result<T, TaggerError>,
        I: IntoIterator<Item = &'a str>,
    {
        let mut results = Vec::new();
        let mut failed = 0;
        for (i, text) in texts.into_iter().enumerate() {
            let result = match self.phrases(factory, extractor, surface_filter, text) {
                Ok(phrases) => UnitResult::Phrases(phrases),
                Err(e) if e.is_fatal() => {
                    error!("worker {}: tagger unusable on unit {}: {}", self.id, i, e);
                    return Err(e);
                }
                Err(e) => {
                    warn!("worker {}: tagging failed on unit {}: {}", self.id, i, e);
                    failed += 1;
                    UnitResult::Failed(e.to_string())
                }
            };
            results.push(result);
        }

        self.processed += results.len();
        self.failed += failed;
        Ok(results)
    }
}

pub struct WorkerPool<T, F> {
    pool: ThreadPool,
    contexts: Vec<Mutex<WorkerContext<T>>>,
    factory: F,
    extractor: PhraseExtractor,
    surface_filter: Option<SurfaceFilter>,
}

impl<T, F> WorkerPool<T, F>
where
    T: Tagger + Send,
    F: Fn() -> Result<T, TaggerError> + Sync,
{
    /// Start `workers` threads. Taggers are built lazily by `factory`.
    pub fn new(workers: usize, factory: F, extractor: PhraseExtractor) -> Result<Self, Error> {
        if workers == 0 {
            return Err(Error::Config("worker count must be at least 1".to_string()));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("phrasal-worker-{i}"))
            .build()?;
        let contexts = (0..workers)
            .map(|id| Mutex::new(WorkerContext::new(id)))
            .collect();
        debug!("started {} workers", workers);

        Ok(Self {
            pool,
            contexts,
            factory,
            extractor,
            surface_filter: None,
        })
    }

    /// Filter token surfaces before extraction.
    pub fn with_surface_filter(mut self, filter: SurfaceFilter) -> Self {
        self.surface_filter = Some(filter);
        self
    }

    pub fn workers(&self) -> usize {
        self.contexts.len()
    }

    pub fn extractor(&self) -> &PhraseExtractor {
        &self.extractor
    }

    /// Number of workers that built their tagger.
    pub fn initialized(&self) -> usize {
        self.contexts
            .iter()
            .filter(|ctx| ctx.lock().map(|c| c.is_initialized()).unwrap_or(false))
            .count()
    }

    /// Run every shard on the pool and wait for all of them.
    ///
    /// Results come back in shard order.
    pub fn process(&self, shards: Vec<Shard<'_>>) -> Result<Vec<ShardResult>, Error> {
        self.pool.install(|| {
            shards
                .into_par_iter()
                .map(|shard| self.process_shard(shard))
                .collect()
        })
    }

    fn process_shard(&self, shard: Shard<'_>) -> Result<ShardResult, Error> {
        let worker = rayon::current_thread_index()
            .ok_or_else(|| Error::Custom("shard dispatched outside of the pool".to_string()))?;
        let slot = self
            .contexts
            .get(worker)
            .ok_or_else(|| Error::Custom(format!("no context for worker {worker}")))?;
        let mut ctx = slot
            .lock()
            .map_err(|_| Error::Custom(format!("worker {worker} context is poisoned")))?;

        debug!(
            "worker {}: shard {} ({} units)",
            worker,
            shard.index(),
            shard.units().len()
        );
        let results = ctx.process(
            &self.factory,
            &self.extractor,
            self.surface_filter.as_ref(),
            shard.texts(),
        )?;

        Ok(ShardResult {
            index: shard.index(),
            range: shard.range().clone(),
            results,
        })
    }
}

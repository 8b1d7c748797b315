//! Run configuration.
use std::path::PathBuf;

use crate::error::Error;
use crate::extract::{PhraseExtractor, DEFAULT_MAX_N, DEFAULT_TAGS};
use crate::tagger::TaggerKind;

pub const DEFAULT_BATCH_SIZE: usize = 2000;
pub const DEFAULT_WORKERS: usize = 8;
pub const DEFAULT_DST: &str = "processed_batches";

/// Everything a phrase extraction run needs.
///
/// Re-running with the same corpus and configuration resumes an interrupted run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub corpus: PathBuf,
    pub dst: PathBuf,
    pub batch_size: usize,
    pub workers: usize,
    pub max_n: usize,
    pub tags: Vec<String>,
    pub tagger: TaggerKind,
    /// Drop noisy surfaces (urls, numbers, ...) before extraction.
    pub drop_noise: bool,
}

impl RunConfig {
    /// Configuration with default settings.
    pub fn new(corpus: PathBuf) -> Self {
        Self {
            corpus,
            dst: PathBuf::from(DEFAULT_DST),
            batch_size: DEFAULT_BATCH_SIZE,
            workers: DEFAULT_WORKERS,
            max_n: DEFAULT_MAX_N,
            tags: DEFAULT_TAGS.iter().map(|t| t.to_string()).collect(),
            tagger: TaggerKind::default(),
            drop_noise: false,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.batch_size == 0 {
            return Err(Error::Config("batch size must be at least 1".to_string()));
        }
        if self.workers == 0 {
            return Err(Error::Config("worker count must be at least 1".to_string()));
        }
        if self.max_n == 0 {
            return Err(Error::Config("max-n must be at least 1".to_string()));
        }
        if self.tags.iter().all(|t| t.trim().is_empty()) {
            return Err(Error::Config("at least one tag must be kept".to_string()));
        }
        Ok(())
    }

    pub fn extractor(&self) -> PhraseExtractor {
        let tags = self
            .tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(String::from);
        PhraseExtractor::new(self.max_n, tags)
    }
}

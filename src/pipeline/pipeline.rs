//! Runnable pipelines.
use crate::error::Error;

/// A configured unit of work that can be run to completion.
///
/// `T` is whatever the pipeline reports back once it is done,
/// [super::RunSummary] for phrase extraction.
pub trait Pipeline<T> {
    fn run(&self) -> Result<T, Error>;
}

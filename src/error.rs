//! Error enum
use std::path::PathBuf;

use crate::tagger::TaggerError;

#[derive(Debug)]
#[allow(dead_code)]
pub enum Error {
    Io(std::io::Error),
    Csv(csv::Error),
    Serde(serde_json::Error),
    Parquet(parquet::errors::ParquetError),
    ThreadPool(rayon::ThreadPoolBuildError),
    Glob(glob::GlobError),
    GlobPattern(glob::PatternError),
    Tagger(TaggerError),
    /// A prerequisite input (usually the corpus file) is absent.
    MissingInput(PathBuf),
    UnknownFormat(PathBuf),
    /// Shard results that do not tile their batch.
    Reassembly(String),
    Config(String),
    Custom(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Error {
        Error::Csv(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}

impl From<parquet::errors::ParquetError> for Error {
    fn from(e: parquet::errors::ParquetError) -> Error {
        Error::Parquet(e)
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(e: rayon::ThreadPoolBuildError) -> Error {
        Error::ThreadPool(e)
    }
}

impl From<glob::GlobError> for Error {
    fn from(e: glob::GlobError) -> Error {
        Error::Glob(e)
    }
}

impl From<glob::PatternError> for Error {
    fn from(e: glob::PatternError) -> Error {
        Error::GlobPattern(e)
    }
}

impl From<TaggerError> for Error {
    fn from(e: TaggerError) -> Error {
        Error::Tagger(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}

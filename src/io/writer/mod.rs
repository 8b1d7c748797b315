/*!
# Batch artifact writing

One processed batch becomes one Parquet file. Files are written under a temporary name and
moved into place once complete, so that an artifact's existence means the batch is done.
!*/
mod parquetwriter;

pub use parquetwriter::{ArtifactWriter, TMP_EXTENSION};

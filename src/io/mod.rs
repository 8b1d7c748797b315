/*!
# IO utilities

Corpus loading and batch artifact persistence.

- [reader::read_corpus] loads an ordered corpus of [crate::unit::TextUnit]s from CSV or JSON lines,
- [writer::ArtifactWriter] persists a processed batch as a Parquet file, atomically,
- [reader::read_artifact] loads a batch artifact back.
!*/
pub mod reader;
pub mod writer;

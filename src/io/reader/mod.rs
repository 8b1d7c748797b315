/*! Reading utilities

Corpus files are the scheduler input, artifacts are its output.
!*/
mod artifact;
mod corpus;

pub use artifact::{read_artifact, ArtifactRow};
pub use corpus::{read_corpus, read_csv, read_jsonl, CorpusFormat};

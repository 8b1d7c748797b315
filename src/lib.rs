/*! # phrasal

Compresses part-of-speech tagged text into salient multi-word phrases, at corpus scale.

- [extract] holds the greedy longest-match phrase extractor,
- [tagger] defines the tagging capability and ships two taggers,
- [pipeline] runs extraction over a corpus in checkpointed batches on a fixed worker pool,
- [io] reads corpora and reads/writes batch artifacts.
!*/
pub mod error;
pub mod extract;
pub mod filtering;
pub mod io;
pub mod pipeline;
pub mod processing;
pub mod tagger;
pub mod unit;

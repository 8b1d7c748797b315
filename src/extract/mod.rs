/*! Phrase extraction

Greedy longest-match compression of a tagged sequence into non-overlapping phrases.

The entry point is [PhraseExtractor::extract]. Candidate spans ([Span]) are enumerated over the
tag-filtered sequence, tried longest first, and accepted when none of their positions is covered yet.
!*/
mod extractor;
mod span;

pub use extractor::{PhraseExtractor, DEFAULT_MAX_N, DEFAULT_TAGS, SEPARATOR};
pub use span::Span;

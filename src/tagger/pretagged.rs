//! Tagger for content that is already tagged upstream.
use super::{parse_tagged_line, TaggedSequence, Tagger, TaggerError};

/// Reads `surface/TAG surface/TAG ...` content.
///
/// A single malformed token fails the whole unit.
#[derive(Debug, Default, Clone, Copy)]
pub struct PreTagged;

impl Tagger for PreTagged {
    fn tag(&mut self, text: &str) -> Result<TaggedSequence, TaggerError> {
        parse_tagged_line(text)
    }
}

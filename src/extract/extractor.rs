//! Greedy longest-match phrase extractor.
use std::collections::HashSet;

use itertools::Itertools;

use crate::tagger::Token;

use super::Span;

/// Default maximum phrase length, in tokens.
pub const DEFAULT_MAX_N: usize = 5;

/// Default kept tags: common nouns, adjectives, auxiliary adjectives, adverbs and verbs.
pub const DEFAULT_TAGS: [&str; 5] = ["NNG", "VA", "VAX", "MAG", "VV"];

/// Joins surfaces inside a phrase label.
pub const SEPARATOR: &str = ";";

/// Compresses a tagged sequence into non-overlapping phrases.
///
/// 1. tokens whose tag is not in the allow-set are dropped,
/// 2. every span of length `1..=max_n` over the remaining tokens is a candidate,
/// 3. candidates are tried longest first, ties going to the earliest start,
/// 4. a candidate is accepted if none of its positions is covered by an accepted one.
///
/// Phrases are returned in acceptance order.
#[derive(Debug, Clone)]
pub struct PhraseExtractor {
    max_n: usize,
    tags: HashSet<String>,
}

impl PhraseExtractor {
    pub fn new<I, S>(max_n: usize, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            max_n,
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn max_n(&self) -> usize {
        self.max_n
    }

    pub fn tags(&self) -> &HashSet<String> {
        &self.tags
    }

    /// Keep tokens with an allowed tag, in order.
    pub fn filter<'a>(&self, tokens: &'a [Token]) -> Vec<&'a Token> {
        tokens
            .iter()
            .filter(|token| self.tags.contains(token.tag()))
            .collect()
    }

    /// Enumerate candidate spans over `k` filtered positions.
    ///
    /// Outer loop on start position, inner loop on length. The resulting order
    /// is recorded in each [Span] and is what breaks length ties.
    pub fn candidates(&self, k: usize) -> Vec<Span> {
        let mut spans = Vec::with_capacity(k * self.max_n);
        for start in 0..k {
            for n in 1..=self.max_n {
                if start + n <= k {
                    spans.push(Span::new(start, start + n, spans.len()));
                }
            }
        }
        spans
    }

    /// Greedy selection over `k` filtered positions.
    ///
    /// Returns accepted spans in acceptance order.
    pub fn select(&self, k: usize) -> Vec<Span> {
        let mut candidates = self.candidates(k);
        candidates.sort_unstable_by_key(Span::priority);

        let mut covered = vec![false; k];
        let mut accepted = Vec::new();
        for span in candidates {
            if covered[span.range()].iter().any(|c| *c) {
                continue;
            }
            covered[span.range()].iter_mut().for_each(|c| *c = true);
            accepted.push(span);
        }
        accepted
    }

    /// Accepted spans for a tagged sequence, over its filtered positions.
    pub fn extract_spans(&self, tokens: &[Token]) -> Vec<Span> {
        self.select(self.filter(tokens).len())
    }

    /// Phrase labels for a tagged sequence.
    pub fn extract(&self, tokens: &[Token]) -> Vec<String> {
        let filtered = self.filter(tokens);
        self.select(filtered.len())
            .into_iter()
            .map(|span| {
                filtered[span.range()]
                    .iter()
                    .map(|token| token.surface())
                    .join(SEPARATOR)
            })
            .collect()
    }
}

impl Default for PhraseExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_N, DEFAULT_TAGS)
    }
}

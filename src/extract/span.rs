//! Candidate spans.
use std::cmp::Reverse;
use std::ops::Range;

/// Half-open `[start, end)` interval over filtered-token positions.
///
/// `order` is the position of the span in enumeration order
/// (outer loop on `start`, inner loop on length), and is used to break ties between equal-length spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    start: usize,
    end: usize,
    order: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, order: usize) -> Self {
        debug_assert!(start < end);
        Self { start, end, order }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Selection priority: longer first, then earlier in enumeration order.
    ///
    /// `order` is unique per candidate, so the key is a total order
    /// and the selection does not depend on sort stability.
    pub fn priority(&self) -> (Reverse<usize>, usize) {
        (Reverse(self.len()), self.order)
    }
}

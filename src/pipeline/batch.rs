/*! Batches and shards.

A corpus is cut into [Batch]es of `batch_size` units; batch `i` holds units
`[i * batch_size, min((i + 1) * batch_size, len))`.

A batch is cut into at most `worker_count` contiguous [Shard]s whose sizes differ by at most one
(the first `len % worker_count` shards get the extra unit). Each shard carries its range inside the
batch, and [reassemble] puts shard results back together by checking those ranges.
!*/
use std::ops::Range;

use crate::error::Error;
use crate::unit::{TextUnit, UnitResult};

/// Number of batches needed for `len` units.
pub fn batch_count(len: usize, batch_size: usize) -> usize {
    if batch_size == 0 {
        return 0;
    }
    len.div_ceil(batch_size)
}

/// Contiguous slice of the corpus.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    index: usize,
    offset: usize,
    units: &'a [TextUnit],
}

impl<'a> Batch<'a> {
    /// Batch number `index` of `corpus`, or `None` if out of bounds.
    pub fn new(corpus: &'a [TextUnit], index: usize, batch_size: usize) -> Option<Self> {
        let offset = index.checked_mul(batch_size)?;
        if batch_size == 0 || offset >= corpus.len() {
            return None;
        }
        let end = offset.saturating_add(batch_size).min(corpus.len());
        Some(Self {
            index,
            offset,
            units: &corpus[offset..end],
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Global position of the first unit.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn units(&self) -> &'a [TextUnit] {
        self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Split into at most `worker_count` non-empty contiguous shards.
    pub fn shards(&self, worker_count: usize) -> Vec<Shard<'a>> {
        shard_ranges(self.len(), worker_count)
            .into_iter()
            .enumerate()
            .map(|(index, range)| Shard {
                index,
                units: &self.units[range.clone()],
                range,
            })
            .collect()
    }
}

/// Near-equal contiguous ranges covering `0..len`. Empty ranges are left out.
pub fn shard_ranges(len: usize, parts: usize) -> Vec<Range<usize>> {
    if parts == 0 {
        return Vec::new();
    }
    let (size, extra) = (len / parts, len % parts);
    let mut ranges = Vec::with_capacity(parts.min(len));
    let mut start = 0;
    // past `len` parts, every shard would be empty
    for part in 0..parts.min(len) {
        let end = start + size + usize::from(part < extra);
        if end > start {
            ranges.push(start..end);
        }
        start = end;
    }
    ranges
}

/// Part of a batch sent to a single worker.
#[derive(Debug, Clone)]
pub struct Shard<'a> {
    index: usize,
    range: Range<usize>,
    units: &'a [TextUnit],
}

impl<'a> Shard<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Range inside the batch.
    pub fn range(&self) -> &Range<usize> {
        &self.range
    }

    pub fn units(&self) -> &'a [TextUnit] {
        self.units
    }

    pub fn texts(&self) -> impl Iterator<Item = &'a str> {
        self.units.iter().map(|u| u.content())
    }
}

/// Results of a shard, tied to the shard's origin range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardResult {
    pub index: usize,
    pub range: Range<usize>,
    pub results: Vec<UnitResult>,
}

/// Put shard results back in batch order.
///
/// Results are ordered by shard index, and their ranges must tile `0..batch_len` exactly,
/// each holding one result per unit.
pub fn reassemble(
    batch_len: usize,
    mut shards: Vec<ShardResult>,
) -> Result<Vec<UnitResult>, Error> {
    shards.sort_by_key(|s| s.index);

    let mut results = Vec::with_capacity(batch_len);
    for shard in shards {
        if shard.range.start != results.len() {
            return Err(Error::Reassembly(format!(
                "shard {} starts at {}, expected {}",
                shard.index,
                shard.range.start,
                results.len()
            )));
        }
        if shard.results.len() != shard.range.len() {
            return Err(Error::Reassembly(format!(
                "shard {} has {} results for {} units",
                shard.index,
                shard.results.len(),
                shard.range.len()
            )));
        }
        results.extend(shard.results);
    }

    if results.len() != batch_len {
        return Err(Error::Reassembly(format!(
            "got {} results for a batch of {}",
            results.len(),
            batch_len
        )));
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::unit::{TextUnit, UnitResult};

    use super::{batch_count, reassemble, shard_ranges, Batch, ShardResult};

    fn corpus(n: usize) -> Vec<TextUnit> {
        (0..n).map(|i| TextUnit::from(format!("u{i}").as_str())).collect()
    }

    #[test]
    fn test_batch_count() {
        assert_eq!(batch_count(0, 10), 0);
        assert_eq!(batch_count(10, 10), 1);
        assert_eq!(batch_count(11, 10), 2);
        assert_eq!(batch_count(5, 0), 0);
        assert_eq!(batch_count(3, usize::MAX), 1);
        assert_eq!(batch_count(usize::MAX, usize::MAX), 1);
        assert_eq!(batch_count(usize::MAX, 2), usize::MAX / 2 + 1);
    }

    #[test]
    fn test_batches_cover_corpus() {
        let c = corpus(23);
        let batches: Vec<Batch> = (0..batch_count(c.len(), 5))
            .filter_map(|i| Batch::new(&c, i, 5))
            .collect();
        assert_eq!(batches.len(), 5);
        assert_eq!(batches[4].offset(), 20);
        assert_eq!(batches[4].len(), 3);
        let contents: Vec<&str> = batches
            .iter()
            .flat_map(|b| b.units().iter().map(|u| u.content()))
            .collect();
        let expected: Vec<&str> = c.iter().map(|u| u.content()).collect();
        assert_eq!(contents, expected);
        assert!(Batch::new(&c, 5, 5).is_none());
    }

    #[test]
    fn test_shard_ranges() {
        // same split as numpy's array_split
        assert_eq!(shard_ranges(10, 3), vec![0..4, 4..7, 7..10]);
        assert_eq!(shard_ranges(3, 8), vec![0..1, 1..2, 2..3]);
        assert!(shard_ranges(0, 4).is_empty());
        assert!(shard_ranges(4, 0).is_empty());
        assert_eq!(shard_ranges(2, usize::MAX), vec![0..1, 1..2]);
    }

    #[test]
    fn test_huge_batch_size() {
        let c = corpus(7);
        let batch = Batch::new(&c, 0, usize::MAX).unwrap();
        assert_eq!(batch.len(), 7);
        assert!(Batch::new(&c, 1, usize::MAX).is_none());
    }

    #[test]
    fn test_shards_preserve_order() {
        let c = corpus(37);
        let batch = Batch::new(&c, 0, 37).unwrap();
        for workers in 1..12 {
            let shards = batch.shards(workers);
            assert!(shards.len() <= workers);
            let sizes: Vec<usize> = shards.iter().map(|s| s.units().len()).collect();
            let (min, max) = (sizes.iter().min().unwrap(), sizes.iter().max().unwrap());
            assert!(max - min <= 1);

            let texts: Vec<&str> = shards.iter().flat_map(|s| s.texts()).collect();
            let expected: Vec<&str> = c.iter().map(|u| u.content()).collect();
            assert_eq!(texts, expected, "workers={workers}");
        }
    }

    fn echo(shard: &super::Shard) -> ShardResult {
        ShardResult {
            index: shard.index(),
            range: shard.range().clone(),
            results: shard
                .texts()
                .map(|t| UnitResult::Phrases(vec![t.to_string()]))
                .collect(),
        }
    }

    #[test]
    fn test_reassemble_any_completion_order() {
        let c = corpus(17);
        let batch = Batch::new(&c, 0, 17).unwrap();
        for workers in 1..9 {
            let mut results: Vec<ShardResult> = batch.shards(workers).iter().map(echo).collect();
            results.reverse();
            let merged = reassemble(batch.len(), results).unwrap();
            let texts: Vec<&str> = merged.iter().map(|r| r.phrases()[0].as_str()).collect();
            let expected: Vec<&str> = c.iter().map(|u| u.content()).collect();
            assert_eq!(texts, expected);
        }
    }

    #[test]
    fn test_reassemble_gap() {
        let c = corpus(6);
        let batch = Batch::new(&c, 0, 6).unwrap();
        let mut results: Vec<ShardResult> = batch.shards(3).iter().map(echo).collect();
        results.remove(1);
        assert!(matches!(
            reassemble(batch.len(), results),
            Err(Error::Reassembly(_))
        ));
    }

    #[test]
    fn test_reassemble_short_shard() {
        let c = corpus(6);
        let batch = Batch::new(&c, 0, 6).unwrap();
        let mut results: Vec<ShardResult> = batch.shards(2).iter().map(echo).collect();
        results[1].results.pop();
        assert!(matches!(
            reassemble(batch.len(), results),
            Err(Error::Reassembly(_))
        ));
    }
}

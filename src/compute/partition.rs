//! Static load partitioning across a fixed number of workers.

/// A contiguous range of linear cell indices owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    /// First index in the range.
    pub offset: usize,
    /// Number of indices in the range.
    pub count: usize,
}

impl Partition {
    /// One past the last index in the range.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.count
    }

    /// The range as `offset..end`.
    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.end()
    }
}

/// Split `total` items into at most `n` ordered, contiguous partitions.
///
/// The partition count is `min(total, n)`, so no partition is ever empty.
/// The first `total % count` partitions hold one extra item.
pub fn partition(total: usize, n: usize) -> Vec<Partition> {
    let effective = total.min(n);
    if effective == 0 {
        return Vec::new();
    }

    let base = total / effective;
    let extra = total % effective;

    let mut offset = 0;
    (0..effective)
        .map(|i| {
            let count = base + usize::from(i < extra);
            let p = Partition { offset, count };
            offset += count;
            p
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_workers_is_empty() {
        assert!(partition(100, 0).is_empty());
    }

    #[test]
    fn test_zero_items_is_empty() {
        assert!(partition(0, 4).is_empty());
    }

    #[test]
    fn test_remainder_goes_to_leading_partitions() {
        let parts = partition(10, 3);
        assert_eq!(
            parts,
            vec![
                Partition { offset: 0, count: 4 },
                Partition { offset: 4, count: 3 },
                Partition { offset: 7, count: 3 },
            ]
        );
    }

    #[test]
    fn test_more_workers_than_items() {
        let parts = partition(3, 8);
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.count == 1));
    }

    proptest! {
        #[test]
        fn prop_partitions_cover_range_exactly(total in 0usize..5000, n in 0usize..64) {
            let parts = partition(total, n);

            let mut expected_offset = 0;
            for p in &parts {
                prop_assert_eq!(p.offset, expected_offset);
                prop_assert!(p.count > 0);
                expected_offset = p.end();
            }
            prop_assert_eq!(expected_offset, if n == 0 { 0 } else { total });
            prop_assert_eq!(parts.len(), total.min(n));
        }

        #[test]
        fn prop_partitions_are_balanced(total in 1usize..5000, n in 1usize..64) {
            let parts = partition(total, n);
            let max = parts.iter().map(|p| p.count).max().unwrap();
            let min = parts.iter().map(|p| p.count).min().unwrap();
            prop_assert!(max - min <= 1);
            prop_assert_eq!(parts.iter().map(|p| p.count).sum::<usize>(), total);
        }
    }
}

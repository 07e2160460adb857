//! Exhaustive tiling enumeration.

use super::types::{Run, TilingPattern};
use std::collections::BTreeMap;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Longest row [`enumerate`] accepts.
///
/// Enumeration walks every subset of the row, and an 18-digit run is the
/// longest whose place values fit in an `i64`.
pub const MAX_ROW_LEN: usize = 18;

/// Every valid tiling pattern for a row of `n` cells, in ascending mask order
/// (bit `j` of the mask is column `j`).
///
/// A mask is kept when no two tiles are within distance 2 of each other and
/// every maximal untiled span has at least two cells.
///
/// # Panics
///
/// Panics if `n > MAX_ROW_LEN`. [`GridLayout`](crate::grid::GridLayout)
/// rejects such rows before any enumeration happens.
///
/// # Examples
///
/// ```
/// use number_cross::tiling::enumerate;
///
/// let patterns = enumerate(5);
/// assert_eq!(patterns.len(), 5);
/// assert!(patterns.iter().all(|p| p.runs.iter().all(|r| r.len() >= 2)));
/// ```
pub fn enumerate(n: usize) -> Vec<TilingPattern> {
    assert!(n <= MAX_ROW_LEN, "row length {n} exceeds {MAX_ROW_LEN}");
    let masks = 0..(1u64 << n);

    #[cfg(feature = "parallel")]
    {
        masks
            .into_par_iter()
            .filter_map(|mask| build_pattern(mask, n))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        masks.filter_map(|mask| build_pattern(mask, n)).collect()
    }
}

/// Tiles closer than three columns apart.
fn has_crowded_tiles(mask: u64) -> bool {
    mask & (mask >> 1) != 0 || mask & (mask >> 2) != 0
}

fn build_pattern(mask: u64, n: usize) -> Option<TilingPattern> {
    if has_crowded_tiles(mask) {
        return None;
    }
    let tiled: Vec<bool> = (0..n).map(|j| (mask >> j) & 1 == 1).collect();

    let mut runs = Vec::new();
    let mut j = 0;
    while j < n {
        if tiled[j] {
            j += 1;
            continue;
        }
        let start = j;
        while j < n && !tiled[j] {
            j += 1;
        }
        if j - start < 2 {
            return None;
        }
        let mut edges = Vec::with_capacity(2);
        if start > 0 {
            edges.push(start - 1);
        }
        if j < n {
            edges.push(j);
        }
        runs.push(Run {
            start,
            end: j,
            edges,
        });
    }

    Some(TilingPattern { mask: tiled, runs })
}

/// Memoised [`enumerate`] results, keyed by row length.
///
/// Pattern lists are shared through `Arc`, so a cache can hand the same list
/// to several models.
#[derive(Debug, Clone, Default)]
pub struct TilingCache {
    by_len: BTreeMap<usize, Arc<Vec<TilingPattern>>>,
}

impl TilingCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Patterns for rows of length `n`, enumerating on first use.
    pub fn get(&mut self, n: usize) -> Arc<Vec<TilingPattern>> {
        Arc::clone(
            self.by_len
                .entry(n)
                .or_insert_with(|| Arc::new(enumerate(n))),
        )
    }

    /// Row lengths enumerated so far.
    pub fn lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.by_len.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_counts() {
        assert_eq!(enumerate(1).len(), 1);
        assert_eq!(enumerate(2).len(), 1);
        assert_eq!(enumerate(5).len(), 5);
        assert_eq!(enumerate(11).len(), 54);
    }

    #[test]
    fn test_small_rows() {
        // A lone cell can only be tiled.
        let one = enumerate(1);
        assert_eq!(one[0].mask, vec![true]);
        assert!(one[0].runs.is_empty());

        let two = enumerate(2);
        assert_eq!(two[0].mask, vec![false, false]);
        assert_eq!(two[0].runs.len(), 1);
        assert!(two[0].runs[0].edges.is_empty());
    }

    #[test]
    fn test_five_cells() {
        let masks: Vec<String> = enumerate(5).iter().map(|p| p.mask_string()).collect();
        assert_eq!(masks, vec![".....", "#....", "..#..", "....#", "#...#"]);
    }

    #[test]
    fn test_run_edges() {
        let p = enumerate(5)
            .into_iter()
            .find(|p| p.mask_string() == "..#..")
            .expect("pattern present");
        assert_eq!(p.runs.len(), 2);
        assert_eq!(p.runs[0].edges, vec![2]);
        assert_eq!(p.runs[1].edges, vec![2]);
        assert_eq!(p.runs[1].cells(), 3..5);
    }

    #[test]
    fn test_cache_shares_lists() {
        let mut cache = TilingCache::new();
        let a = cache.get(5);
        let b = cache.get(5);
        assert!(Arc::ptr_eq(&a, &b));
        cache.get(3);
        assert_eq!(cache.lengths().collect::<Vec<_>>(), vec![3, 5]);
    }

    proptest! {
        #[test]
        fn prop_patterns_are_valid(n in 0usize..=12) {
            let patterns = enumerate(n);
            for p in &patterns {
                prop_assert_eq!(p.len(), n);
                let tiles: Vec<usize> = p.tiles().collect();
                for w in tiles.windows(2) {
                    prop_assert!(w[1] - w[0] > 2);
                }
                let mut covered = vec![false; n];
                for r in &p.runs {
                    prop_assert!(r.len() >= 2);
                    for j in r.cells() {
                        prop_assert!(!p.mask[j]);
                        covered[j] = true;
                    }
                    for &e in &r.edges {
                        prop_assert!(p.mask[e]);
                    }
                }
                for j in 0..n {
                    prop_assert_eq!(covered[j], !p.mask[j]);
                }
            }
        }

        #[test]
        fn prop_patterns_in_mask_order(n in 0usize..=12) {
            let keys: Vec<u64> = enumerate(n)
                .iter()
                .map(|p| p.tiles().map(|j| 1u64 << j).sum())
                .collect();
            prop_assert!(keys.windows(2).all(|w| w[0] < w[1]));
        }
    }
}

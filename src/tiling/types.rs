//! Tiling pattern data.

use std::ops::Range;

/// A maximal stretch of untiled cells, read as one big-endian number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Run {
    /// First column of the run.
    pub start: usize,
    /// One past the last column of the run.
    pub end: usize,
    /// Tiled columns directly bordering the run (zero, one or two).
    pub edges: Vec<usize>,
}

impl Run {
    /// Column range covered by the run.
    pub fn cells(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of digits.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false for runs produced by [`enumerate`](super::enumerate).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Column span as a `(start, end)` pair.
    pub fn span(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}

/// One admissible way to tile a row.
///
/// Immutable once enumerated; shared by every row of the same length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TilingPattern {
    /// `mask[j]` is true when column `j` is tiled.
    pub mask: Vec<bool>,
    /// Runs in left-to-right order.
    pub runs: Vec<Run>,
}

impl TilingPattern {
    /// Row length.
    pub fn len(&self) -> usize {
        self.mask.len()
    }

    /// True for the pattern of a zero-length row.
    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    /// Columns that are tiled.
    pub fn tiles(&self) -> impl Iterator<Item = usize> + '_ {
        self.mask
            .iter()
            .enumerate()
            .filter_map(|(j, &tiled)| tiled.then_some(j))
    }

    /// Whether some run covers exactly `start..end`.
    pub fn has_run(&self, start: usize, end: usize) -> bool {
        self.runs.iter().any(|r| r.start == start && r.end == end)
    }

    /// Renders the mask as `#` for tiles and `.` for digits.
    pub fn mask_string(&self) -> String {
        self.mask.iter().map(|&t| if t { '#' } else { '.' }).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TilingPattern {
        TilingPattern {
            mask: vec![false, false, true, false, false, false],
            runs: vec![
                Run {
                    start: 0,
                    end: 2,
                    edges: vec![2],
                },
                Run {
                    start: 3,
                    end: 6,
                    edges: vec![2],
                },
            ],
        }
    }

    #[test]
    fn test_run_accessors() {
        let p = sample();
        assert_eq!(p.runs[1].cells(), 3..6);
        assert_eq!(p.runs[1].len(), 3);
        assert_eq!(p.runs[0].span(), (0, 2));
        assert!(!p.runs[0].is_empty());
    }

    #[test]
    fn test_pattern_accessors() {
        let p = sample();
        assert_eq!(p.len(), 6);
        assert_eq!(p.tiles().collect::<Vec<_>>(), vec![2]);
        assert!(p.has_run(3, 6));
        assert!(!p.has_run(3, 5));
        assert_eq!(p.mask_string(), "..#...");
    }
}

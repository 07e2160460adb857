//! Decoded puzzle solutions.

use crate::tiling::TilingPattern;
use std::collections::BTreeMap;
use std::fmt;

/// One solved grid, as reported to the solution visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PuzzleSolution {
    /// Cell values, `0` on tiles.
    pub digits: Vec<Vec<u8>>,
    /// Index of the active tiling pattern of each row.
    pub pattern_indices: Vec<usize>,
    /// Active tiling pattern of each row.
    pub patterns: Vec<TilingPattern>,
    /// Label value of each region id.
    pub labels: BTreeMap<i64, u8>,
    /// Label value under each cell.
    pub cell_labels: Vec<Vec<u8>>,
}

impl PuzzleSolution {
    /// Numbers spelled by the runs of `row`, left to right.
    pub fn row_numbers(&self, row: usize) -> Vec<u64> {
        let digits = &self.digits[row];
        self.patterns[row]
            .runs
            .iter()
            .map(|run| {
                digits[run.cells()]
                    .iter()
                    .fold(0u64, |acc, &d| acc * 10 + u64::from(d))
            })
            .collect()
    }

    /// Every run number in the grid, row by row.
    pub fn numbers(&self) -> Vec<u64> {
        (0..self.digits.len())
            .flat_map(|i| self.row_numbers(i))
            .collect()
    }

    /// Sum of all run numbers.
    pub fn sum(&self) -> u64 {
        self.numbers().iter().sum()
    }

    /// Whether cell `(row, col)` is a tile.
    pub fn is_tiled(&self, row: usize, col: usize) -> bool {
        self.patterns[row].mask[col]
    }
}

fn write_grid<T: fmt::Display>(f: &mut fmt::Formatter<'_>, grid: &[Vec<T>]) -> fmt::Result {
    for row in grid {
        let line: Vec<String> = row.iter().map(ToString::to_string).collect();
        writeln!(f, "{}", line.join(" "))?;
    }
    Ok(())
}

impl fmt::Display for PuzzleSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "labels")?;
        write_grid(f, &self.cell_labels)?;
        writeln!(f, "tiled")?;
        let tiled: Vec<Vec<u8>> = self
            .patterns
            .iter()
            .map(|p| p.mask.iter().map(|&t| u8::from(t)).collect())
            .collect();
        write_grid(f, &tiled)?;
        writeln!(f, "value")?;
        write_grid(f, &self.digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiling::enumerate;

    fn sample() -> PuzzleSolution {
        let patterns = enumerate(5);
        let pick = |s: &str| {
            patterns
                .iter()
                .position(|p| p.mask_string() == s)
                .unwrap()
        };
        let pattern_indices = vec![pick("..#.."), pick("....#")];
        PuzzleSolution {
            digits: vec![vec![5, 5, 0, 8, 8], vec![2, 5, 7, 6, 0]],
            patterns: pattern_indices.iter().map(|&t| patterns[t].clone()).collect(),
            pattern_indices,
            labels: BTreeMap::from([(0, 5), (1, 2)]),
            cell_labels: vec![vec![5; 5], vec![2, 5, 5, 5, 5]],
        }
    }

    #[test]
    fn test_row_numbers() {
        let s = sample();
        assert_eq!(s.row_numbers(0), vec![55, 88]);
        assert_eq!(s.row_numbers(1), vec![2576]);
        assert_eq!(s.numbers(), vec![55, 88, 2576]);
        assert_eq!(s.sum(), 55 + 88 + 2576);
        assert!(s.is_tiled(0, 2));
        assert!(!s.is_tiled(1, 2));
    }

    #[test]
    fn test_display() {
        let text = sample().to_string();
        assert!(text.starts_with("labels\n5 5 5 5 5\n"));
        assert!(text.contains("tiled\n0 0 1 0 0\n0 0 0 0 1\n"));
        assert!(text.ends_with("value\n5 5 0 8 8\n2 5 7 6 0\n"));
    }
}

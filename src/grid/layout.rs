//! Puzzle layout input.

use crate::error::LayoutError;
use crate::tiling::MAX_ROW_LEN;

/// Region ids and highlight mask of a puzzle, validated to share one shape.
///
/// # Examples
///
/// ```
/// use number_cross::grid::GridLayout;
///
/// let layout = GridLayout::parse(
///     "0 0 1\n\
///      0 1 1\n\
///      \n\
///      x . .\n\
///      . . x\n",
/// )
/// .unwrap();
/// assert_eq!((layout.rows(), layout.cols()), (2, 3));
/// assert!(layout.is_highlighted(0, 0));
/// assert_eq!(layout.region(1, 1), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGridLayout"))]
pub struct GridLayout {
    regions: Vec<Vec<i64>>,
    highlights: Vec<Vec<bool>>,
}

/// Unvalidated wire form; deserialization goes through [`GridLayout::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGridLayout {
    regions: Vec<Vec<i64>>,
    highlights: Vec<Vec<bool>>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGridLayout> for GridLayout {
    type Error = LayoutError;

    fn try_from(raw: RawGridLayout) -> Result<Self, LayoutError> {
        Self::new(raw.regions, raw.highlights)
    }
}

fn shape<T>(grid: &[Vec<T>]) -> Result<(usize, usize), LayoutError> {
    let cols = grid.first().map_or(0, Vec::len);
    for (row, cells) in grid.iter().enumerate() {
        if cells.len() != cols {
            return Err(LayoutError::RaggedRow {
                row,
                expected: cols,
                found: cells.len(),
            });
        }
    }
    Ok((grid.len(), cols))
}

/// Splits `text` into blocks of non-blank lines, keeping 1-based line numbers.
fn blocks(text: &str) -> Vec<Vec<(usize, &str)>> {
    let mut out: Vec<Vec<(usize, &str)>> = Vec::new();
    let mut current = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
        } else {
            current.push((n + 1, line));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn parse_block<T>(
    lines: &[(usize, &str)],
    mut token: impl FnMut(usize, &str) -> Result<T, LayoutError>,
) -> Result<Vec<Vec<T>>, LayoutError> {
    lines
        .iter()
        .map(|&(n, line)| {
            line.split_whitespace()
                .map(|t| token(n, t))
                .collect::<Result<Vec<T>, LayoutError>>()
        })
        .collect()
}

impl GridLayout {
    /// Validates and wraps a region-id grid and a highlight mask.
    ///
    /// Fails on an empty grid, ragged rows, rows longer than
    /// [`MAX_ROW_LEN`], or when the two grids differ in shape.
    pub fn new(regions: Vec<Vec<i64>>, highlights: Vec<Vec<bool>>) -> Result<Self, LayoutError> {
        let region_shape = shape(&regions)?;
        let highlight_shape = shape(&highlights)?;
        if region_shape.0 == 0 || region_shape.1 == 0 {
            return Err(LayoutError::EmptyGrid);
        }
        if region_shape != highlight_shape {
            return Err(LayoutError::DimensionMismatch {
                regions: region_shape,
                highlights: highlight_shape,
            });
        }
        if region_shape.1 > MAX_ROW_LEN {
            return Err(LayoutError::RowTooLong {
                len: region_shape.1,
                max: MAX_ROW_LEN,
            });
        }
        Ok(Self {
            regions,
            highlights,
        })
    }

    /// Reads the two-block text format: a block of integer region ids, a
    /// blank line, then a block where `.` marks an ordinary cell and any
    /// other token a highlighted one.
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let blocks = blocks(text);
        let region_lines = blocks.first().ok_or(LayoutError::MissingBlock("region"))?;
        let highlight_lines = blocks.get(1).ok_or(LayoutError::MissingBlock("highlight"))?;
        if let Some(extra) = blocks.get(2) {
            let (line, text) = extra[0];
            return Err(LayoutError::Parse {
                line,
                token: text.to_string(),
            });
        }

        let regions = parse_block(region_lines, |line, t| {
            t.parse::<i64>().map_err(|_| LayoutError::Parse {
                line,
                token: t.to_string(),
            })
        })?;
        let highlights = parse_block(highlight_lines, |_, t| Ok(t != "."))?;
        Self::new(regions, highlights)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.regions.len()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.regions[0].len()
    }

    /// Region id of a cell.
    pub fn region(&self, row: usize, col: usize) -> i64 {
        self.regions[row][col]
    }

    /// Whether a cell is highlighted.
    pub fn is_highlighted(&self, row: usize, col: usize) -> bool {
        self.highlights[row][col]
    }

    /// Region id grid.
    pub fn regions(&self) -> &[Vec<i64>] {
        &self.regions
    }

    /// Highlight mask.
    pub fn highlights(&self) -> &[Vec<bool>] {
        &self.highlights
    }

    /// Fails unless `(row, col)` lies inside the grid.
    pub fn check_cell(&self, row: usize, col: usize) -> Result<(), LayoutError> {
        if row < self.rows() && col < self.cols() {
            Ok(())
        } else {
            Err(LayoutError::CellOutOfRange { row, col })
        }
    }

    /// Each horizontally or vertically adjacent pair of cells, once, as
    /// `((row, col), (row, col))` with the upper or left cell first.
    pub fn adjacent_pairs(&self) -> impl Iterator<Item = ((usize, usize), (usize, usize))> + '_ {
        let (rows, cols) = (self.rows(), self.cols());
        (0..rows).flat_map(move |i| {
            (0..cols).flat_map(move |j| {
                let down = (i + 1 < rows).then_some(((i, j), (i + 1, j)));
                let right = (j + 1 < cols).then_some(((i, j), (i, j + 1)));
                down.into_iter().chain(right)
            })
        })
    }
}

/// Known digits for some cells, used as search hints.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawHintGrid"))]
pub struct HintGrid {
    cells: Vec<Vec<Option<u8>>>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawHintGrid {
    cells: Vec<Vec<Option<u8>>>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawHintGrid> for HintGrid {
    type Error = LayoutError;

    fn try_from(raw: RawHintGrid) -> Result<Self, LayoutError> {
        Self::new(raw.cells)
    }
}

impl HintGrid {
    /// Wraps a grid of optional digits.
    pub fn new(cells: Vec<Vec<Option<u8>>>) -> Result<Self, LayoutError> {
        shape(&cells)?;
        for row in &cells {
            if let Some(&d) = row.iter().flatten().find(|&&d| d > 9) {
                return Err(LayoutError::NotADigit(i64::from(d)));
            }
        }
        Ok(Self { cells })
    }

    /// Reads a whitespace separated grid where `.` means "no hint".
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let blocks = blocks(text);
        let Some(lines) = blocks.first() else {
            return Ok(Self { cells: Vec::new() });
        };
        let cells = parse_block(lines, |line, t| {
            if t == "." {
                return Ok(None);
            }
            let value: i64 = t.parse().map_err(|_| LayoutError::Parse {
                line,
                token: t.to_string(),
            })?;
            match u8::try_from(value) {
                Ok(d) if d <= 9 => Ok(Some(d)),
                _ => Err(LayoutError::NotADigit(value)),
            }
        })?;
        Self::new(cells)
    }

    /// `(row, col, digit)` for every hinted cell, row-major.
    pub fn hints(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        self.cells.iter().enumerate().flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(j, d)| d.map(|d| (i, j, d)))
        })
    }

    /// Number of hinted cells.
    pub fn len(&self) -> usize {
        self.hints().count()
    }

    /// True when no cell carries a hint.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "\
0 0 0 0 0
1 0 0 0 0
1 1 0 0 0
2 1 1 0 0
2 2 1 1 0

x x . . .
x . . . .
. . . . .
. . . . x
. . . x x
";

    #[test]
    fn test_parse_example() {
        let layout = GridLayout::parse(EXAMPLE).unwrap();
        assert_eq!(layout.rows(), 5);
        assert_eq!(layout.cols(), 5);
        assert_eq!(layout.region(3, 0), 2);
        assert!(layout.is_highlighted(1, 0));
        assert!(!layout.is_highlighted(1, 1));
        assert_eq!(layout.highlights().iter().flatten().filter(|&&h| h).count(), 6);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = GridLayout::new(vec![vec![0, 0]; 2], vec![vec![false; 3]; 2]).unwrap_err();
        assert_eq!(
            err,
            LayoutError::DimensionMismatch {
                regions: (2, 2),
                highlights: (2, 3),
            }
        );
    }

    #[test]
    fn test_ragged_and_empty() {
        let err = GridLayout::new(vec![vec![0, 0], vec![0]], vec![vec![false; 2]; 2]).unwrap_err();
        assert!(matches!(err, LayoutError::RaggedRow { row: 1, .. }));
        assert_eq!(GridLayout::new(vec![], vec![]), Err(LayoutError::EmptyGrid));
    }

    #[test]
    fn test_row_too_long() {
        let n = MAX_ROW_LEN + 1;
        let err = GridLayout::new(vec![vec![0; n]], vec![vec![false; n]]).unwrap_err();
        assert!(matches!(err, LayoutError::RowTooLong { .. }));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            GridLayout::parse("0 0\n0 0\n"),
            Err(LayoutError::MissingBlock("highlight"))
        );
        assert_eq!(
            GridLayout::parse("0 a\n\n. .\n"),
            Err(LayoutError::Parse {
                line: 1,
                token: "a".into(),
            })
        );
    }

    #[test]
    fn test_adjacent_pairs() {
        let layout = GridLayout::new(vec![vec![0; 3]; 2], vec![vec![false; 3]; 2]).unwrap();
        // 2 rows x 3 cols: 3 vertical + 4 horizontal
        assert_eq!(layout.adjacent_pairs().count(), 7);
        assert!(layout.adjacent_pairs().any(|p| p == ((0, 0), (1, 0))));
        assert!(layout.check_cell(1, 2).is_ok());
        assert!(layout.check_cell(2, 0).is_err());
    }

    #[test]
    fn test_hint_grid() {
        let hints = HintGrid::parse(". 4 .\n7 . 0\n").unwrap();
        assert_eq!(hints.hints().collect::<Vec<_>>(), vec![(0, 1, 4), (1, 0, 7), (1, 2, 0)]);
        assert_eq!(hints.len(), 3);
        assert_eq!(HintGrid::parse(". 12"), Err(LayoutError::NotADigit(12)));
        assert!(HintGrid::parse("").unwrap().is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates() {
        let ragged = r#"{"regions":[[0,0],[0]],"highlights":[[false],[false,false,false]]}"#;
        assert!(serde_json::from_str::<GridLayout>(ragged).is_err());

        let mismatched = r#"{"regions":[[0,0]],"highlights":[[false,false],[false,false]]}"#;
        assert!(serde_json::from_str::<GridLayout>(mismatched).is_err());

        let layout = GridLayout::parse(EXAMPLE).unwrap();
        let json = serde_json::to_string(&layout).unwrap();
        assert_eq!(serde_json::from_str::<GridLayout>(&json).unwrap(), layout);

        assert!(serde_json::from_str::<HintGrid>(r#"{"cells":[[1,null],[12,null]]}"#).is_err());
        assert!(serde_json::from_str::<HintGrid>(r#"{"cells":[[1,null],[2]]}"#).is_err());
        let hints = serde_json::from_str::<HintGrid>(r#"{"cells":[[1,null],[null,9]]}"#).unwrap();
        assert_eq!(hints.len(), 2);
    }
}

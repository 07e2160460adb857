//! Cell variable arena.

use crate::cp::{BoolVar, CpModel, IntVar, Literal};

/// Model handles owned by one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellVars {
    /// True when the cell is blanked.
    pub tiled: BoolVar,
    /// Cell value, `0` for tiled cells.
    pub value: IntVar,
    /// `digits[k]` holds exactly when `value == k`.
    pub digits: [BoolVar; 10],
}

impl CellVars {
    /// Literal "the cell holds digit `k`".
    pub fn digit(&self, k: usize) -> Literal {
        self.digits[k].lit()
    }
}

/// Row-major arena of [`CellVars`], addressed by `(row, col)`.
#[derive(Debug, Clone)]
pub struct CellGrid {
    rows: usize,
    cols: usize,
    cells: Vec<CellVars>,
}

impl CellGrid {
    /// Declares the tiled, value and digit variables of every cell.
    ///
    /// Only the variables are created here; the constraints linking them come
    /// from [`FlowGraph::build`](super::FlowGraph::build).
    pub fn new(model: &mut CpModel, rows: usize, cols: usize) -> Self {
        let mut cells = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                let tiled = model.new_bool_var(format!("tiled[{i},{j}]"));
                let value = model.new_int_var(0, 9, format!("value[{i},{j}]"));
                let digits =
                    std::array::from_fn(|k| model.new_bool_var(format!("value[{i},{j}]={k}")));
                cells.push(CellVars {
                    tiled,
                    value,
                    digits,
                });
            }
        }
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Handles of cell `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the cell lies outside the grid.
    pub fn get(&self, row: usize, col: usize) -> &CellVars {
        &self.cells[row * self.cols + col]
    }

    /// One row of cells.
    pub fn row(&self, row: usize) -> &[CellVars] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// All cells, row-major.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &CellVars)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(k, c)| ((k / cols, k % cols), c))
    }
}

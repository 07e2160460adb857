//! Puzzle model assembly.

use super::solution::PuzzleSolution;
use crate::cp::{
    Assignment, BoolVar, CpModel, CpSolution, CpSolver, IntVar, LinearExpr, SolverConfig,
    ValueSelection, VariableSelection,
};
use crate::error::LayoutError;
use crate::grid::{CellGrid, FlowGraph, GridLayout, HintGrid, RegionLabels};
use crate::predicate::{RunPredicate, RunVars};
use crate::tiling::{TilingCache, TilingPattern};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

/// Counts reported by [`PuzzleModel::apply_uniqueness`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniquenessStats {
    /// Distinct `(row, span)` numbers.
    pub runs: usize,
    /// Not-equal constraints posted.
    pub constraints: usize,
}

/// The constraint model of one puzzle instance.
///
/// Construction declares every cell, label, flow and pattern variable and
/// posts the grid rules. Row predicates, uniqueness and hints are added
/// afterwards; the finished model is handed to a [`CpSolver`].
///
/// # Examples
///
/// ```
/// use number_cross::compose::PuzzleModel;
/// use number_cross::grid::GridLayout;
/// use number_cross::predicate::Predicate;
///
/// let layout = GridLayout::parse("0 0\n1 1\n\n. .\n. .\n").unwrap();
/// let mut puzzle = PuzzleModel::new(layout);
/// puzzle.apply_row(0, &Predicate::divisible_by(11)).unwrap();
/// puzzle.apply_uniqueness();
/// assert!(puzzle.model().validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct PuzzleModel {
    model: CpModel,
    layout: GridLayout,
    cells: CellGrid,
    labels: RegionLabels,
    flows: FlowGraph,
    patterns: Arc<Vec<TilingPattern>>,
    pattern_vars: Vec<Vec<BoolVar>>,
    uniqueness: Option<UniquenessStats>,
}

impl PuzzleModel {
    /// Builds the grid model with a private tiling cache.
    pub fn new(layout: GridLayout) -> Self {
        Self::with_cache(layout, &mut TilingCache::new())
    }

    /// Builds the grid model, taking row patterns from `cache`.
    pub fn with_cache(layout: GridLayout, cache: &mut TilingCache) -> Self {
        let (rows, cols) = (layout.rows(), layout.cols());
        let mut model = CpModel::new("number-cross");
        let cells = CellGrid::new(&mut model, rows, cols);
        let labels = RegionLabels::build(&mut model, &layout);
        let flows = FlowGraph::build(&mut model, &layout, &cells, &labels);
        let patterns = cache.get(cols);

        let mut pattern_vars = Vec::with_capacity(rows);
        for i in 0..rows {
            let vars: Vec<BoolVar> = (0..patterns.len())
                .map(|t| model.new_bool_var(format!("pattern[{i}]={t}")))
                .collect();
            model.add_exactly_one(&vars.iter().map(|v| v.lit()).collect::<Vec<_>>());
            for (t, pattern) in patterns.iter().enumerate() {
                for (j, &tiled) in pattern.mask.iter().enumerate() {
                    let c = model.add_eq(cells.get(i, j).tiled, i64::from(tiled));
                    model.only_enforce_if(c, &[vars[t].lit()]);
                }
            }
            pattern_vars.push(vars);
        }

        let mut puzzle = Self {
            model,
            layout,
            cells,
            labels,
            flows,
            patterns,
            pattern_vars,
            uniqueness: None,
        };
        puzzle.add_search_strategy();

        debug!(
            rows,
            cols,
            regions = puzzle.labels.len(),
            borders = puzzle.labels.borders(),
            flow_edges = puzzle.flows.edges().len(),
            patterns = puzzle.patterns.len(),
            variables = puzzle.model.variable_count(),
            constraints = puzzle.model.constraint_count(),
            "grid model built"
        );
        puzzle
    }

    /// Labels first, then each row's pattern (preferring later masks), then
    /// cell values row by row, then flows.
    fn add_search_strategy(&mut self) {
        let labels: Vec<IntVar> = self.labels.iter().map(|(_, v)| v).collect();
        self.model
            .add_decision_strategy(labels, VariableSelection::First, ValueSelection::Min);
        for vars in &self.pattern_vars {
            let vars: Vec<IntVar> = vars.iter().map(|&b| IntVar::from(b)).collect();
            self.model
                .add_decision_strategy(vars, VariableSelection::First, ValueSelection::Max);
        }
        for i in 0..self.cells.rows() {
            let values: Vec<IntVar> = self.cells.row(i).iter().map(|c| c.value).collect();
            self.model
                .add_decision_strategy(values, VariableSelection::First, ValueSelection::Min);
        }
        let flows: Vec<IntVar> = self.flows.edges().iter().map(|e| e.var).collect();
        self.model
            .add_decision_strategy(flows, VariableSelection::First, ValueSelection::Min);
    }

    fn check_row(&self, row: usize) -> Result<(), LayoutError> {
        if row < self.layout.rows() {
            Ok(())
        } else {
            Err(LayoutError::RowOutOfRange {
                row,
                rows: self.layout.rows(),
            })
        }
    }

    /// Requires every run of `row` to satisfy `predicate`.
    ///
    /// For each tiling pattern and each of its runs the predicate is posted on
    /// that run's cells, and every constraint it returns is enforced only
    /// while the pattern is active for the row. Returns the number of
    /// reified constraints.
    pub fn apply_row(
        &mut self,
        row: usize,
        predicate: &dyn RunPredicate,
    ) -> Result<usize, LayoutError> {
        self.check_row(row)?;
        let cells = self.cells.row(row);
        let mut reified = 0;
        for (t, pattern) in self.patterns.iter().enumerate() {
            let active = self.pattern_vars[row][t].lit();
            for run in &pattern.runs {
                let span = &cells[run.cells()];
                let digits: Vec<IntVar> = span.iter().map(|c| c.value).collect();
                let indicators: Vec<[BoolVar; 10]> = span.iter().map(|c| c.digits).collect();
                for c in predicate.post(&mut self.model, RunVars::new(&digits, &indicators)) {
                    self.model.only_enforce_if(c, &[active]);
                    reified += 1;
                }
            }
        }
        debug!(row, reified, "row predicate applied");
        Ok(reified)
    }

    /// Applies a row → predicate table.
    pub fn apply_rows<'p, I>(&mut self, table: I) -> Result<usize, LayoutError>
    where
        I: IntoIterator<Item = (usize, &'p dyn RunPredicate)>,
    {
        let mut total = 0;
        for (row, predicate) in table {
            total += self.apply_row(row, predicate)?;
        }
        Ok(total)
    }

    /// Forbids two runs anywhere in the grid from spelling the same number.
    ///
    /// Each distinct `(row, span)` gets one number variable and one indicator
    /// that holds exactly when an active pattern of the row contains the
    /// span. Two runs are compared only while both indicators hold; within a
    /// row only spans that occur together in some pattern are compared.
    ///
    /// Repeated calls return the counts of the first one.
    pub fn apply_uniqueness(&mut self) -> UniquenessStats {
        if let Some(stats) = self.uniqueness {
            return stats;
        }

        let spans: BTreeSet<(usize, usize)> = self
            .patterns
            .iter()
            .flat_map(|p| p.runs.iter().map(|r| r.span()))
            .collect();
        let mut together: BTreeSet<((usize, usize), (usize, usize))> = BTreeSet::new();
        for p in self.patterns.iter() {
            for (k, a) in p.runs.iter().enumerate() {
                for b in &p.runs[k + 1..] {
                    together.insert((a.span().min(b.span()), a.span().max(b.span())));
                }
            }
        }

        struct RunNumber {
            row: usize,
            span: (usize, usize),
            number: IntVar,
            active: BoolVar,
        }

        let mut runs = Vec::new();
        for i in 0..self.layout.rows() {
            let cells = self.cells.row(i);
            for &(start, end) in &spans {
                let digits: Vec<IntVar> = cells[start..end].iter().map(|c| c.value).collect();
                let max = 10i64.pow((end - start) as u32) - 1;
                let number = self
                    .model
                    .new_int_var(0, max, format!("number[{i}][{start}..{end}]"));
                self.model
                    .add_equality(number, LinearExpr::number(&digits));

                let active = self
                    .model
                    .new_bool_var(format!("run[{i}][{start}..{end}]"));
                let holders: Vec<_> = self
                    .patterns
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.has_run(start, end))
                    .map(|(t, _)| self.pattern_vars[i][t].lit())
                    .collect();
                for &holder in &holders {
                    let c = self.model.add_eq(active, 1);
                    self.model.only_enforce_if(c, &[holder]);
                }
                let c = self.model.add_bool_or(&holders);
                self.model.only_enforce_if(c, &[active.lit()]);

                runs.push(RunNumber {
                    row: i,
                    span: (start, end),
                    number,
                    active,
                });
            }
        }

        let mut constraints = 0;
        for (k, a) in runs.iter().enumerate() {
            for b in &runs[k + 1..] {
                if a.row == b.row && !together.contains(&(a.span, b.span)) {
                    continue;
                }
                let c = self.model.add_different(a.number, b.number);
                self.model
                    .only_enforce_if(c, &[a.active.lit(), b.active.lit()]);
                constraints += 1;
            }
        }

        let stats = UniquenessStats {
            runs: runs.len(),
            constraints,
        };
        debug!(
            runs = stats.runs,
            constraints = stats.constraints,
            "uniqueness applied"
        );
        self.uniqueness = Some(stats);
        stats
    }

    /// Suggests `digit` for cell `(row, col)`.
    pub fn add_hint(&mut self, row: usize, col: usize, digit: u8) -> Result<(), LayoutError> {
        self.layout.check_cell(row, col)?;
        if digit > 9 {
            return Err(LayoutError::NotADigit(i64::from(digit)));
        }
        let cell = *self.cells.get(row, col);
        self.model.add_hint(cell.value, i64::from(digit));
        self.model.add_hint(cell.digits[usize::from(digit)], 1);
        Ok(())
    }

    /// Suggests every digit of a hint grid.
    pub fn add_hints(&mut self, hints: &HintGrid) -> Result<(), LayoutError> {
        for (row, col, digit) in hints.hints() {
            self.add_hint(row, col, digit)?;
        }
        Ok(())
    }

    /// Reads a solver assignment back into grid terms.
    pub fn decode(&self, assignment: &Assignment) -> PuzzleSolution {
        let (rows, cols) = (self.layout.rows(), self.layout.cols());
        let digits = (0..rows)
            .map(|i| {
                (0..cols)
                    .map(|j| assignment.value(self.cells.get(i, j).value) as u8)
                    .collect()
            })
            .collect();
        let pattern_indices: Vec<usize> = self
            .pattern_vars
            .iter()
            .map(|vars| {
                vars.iter()
                    .position(|&b| assignment.bool_value(b))
                    .unwrap_or_default()
            })
            .collect();
        let labels = self
            .labels
            .iter()
            .map(|(id, var)| (id, assignment.value(var) as u8))
            .collect::<BTreeMap<_, _>>();
        let cell_labels = (0..rows)
            .map(|i| {
                (0..cols)
                    .map(|j| labels[&self.layout.region(i, j)])
                    .collect()
            })
            .collect();
        PuzzleSolution {
            digits,
            patterns: pattern_indices
                .iter()
                .map(|&t| self.patterns[t].clone())
                .collect(),
            pattern_indices,
            labels,
            cell_labels,
        }
    }

    /// Solves the model, reporting each solution to `on_solution` as it is
    /// found.
    pub fn solve<S>(
        &self,
        solver: &S,
        config: &SolverConfig,
        mut on_solution: impl FnMut(&PuzzleSolution),
    ) -> CpSolution
    where
        S: CpSolver + ?Sized,
    {
        solver.solve_with_visitor(&self.model, config, &mut |a: &Assignment| {
            on_solution(&self.decode(a))
        })
    }

    pub fn model(&self) -> &CpModel {
        &self.model
    }

    /// Mutable access for extra caller constraints.
    pub fn model_mut(&mut self) -> &mut CpModel {
        &mut self.model
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn cells(&self) -> &CellGrid {
        &self.cells
    }

    pub fn labels(&self) -> &RegionLabels {
        &self.labels
    }

    pub fn flows(&self) -> &FlowGraph {
        &self.flows
    }

    /// Tiling patterns shared by every row.
    pub fn patterns(&self) -> &[TilingPattern] {
        &self.patterns
    }

    /// Indicator "row `row` uses pattern `t`".
    pub fn pattern_var(&self, row: usize, t: usize) -> BoolVar {
        self.pattern_vars[row][t]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::Predicate;

    fn layout(text: &str) -> GridLayout {
        GridLayout::parse(text).unwrap()
    }

    #[test]
    fn test_pattern_indicators() {
        let puzzle = PuzzleModel::new(layout("0 0 0 0 0\n0 0 0 0 0\n\n. . . . .\n. . . . .\n"));
        assert_eq!(puzzle.patterns().len(), 5);
        assert_ne!(puzzle.pattern_var(0, 0), puzzle.pattern_var(1, 0));
        assert!(puzzle.model().validate().is_ok());
        // labels, 2 pattern rows, 2 value rows, flows
        assert_eq!(puzzle.model().strategies.len(), 6);
    }

    #[test]
    fn test_apply_row_reifies_each_run() {
        let mut puzzle = PuzzleModel::new(layout("0 0 0 0 0\n\n. . . . .\n"));
        // runs over the five patterns: 1 + 1 + 2 + 1 + 1, two constraints each
        let reified = puzzle.apply_row(0, &Predicate::divisible_by(7)).unwrap();
        assert_eq!(reified, 12);
        assert_eq!(
            puzzle.apply_row(1, &Predicate::odd()),
            Err(LayoutError::RowOutOfRange { row: 1, rows: 1 })
        );
    }

    #[test]
    fn test_apply_rows_with_closure() {
        let mut puzzle = PuzzleModel::new(layout("0 0\n1 1\n\n. .\n. .\n"));
        let first_is_three = |model: &mut CpModel, run: RunVars<'_>| {
            vec![model.add_eq(run.digits[0], 3)]
        };
        let odd = Predicate::odd();
        let table: Vec<(usize, &dyn RunPredicate)> = vec![(0, &first_is_three), (1, &odd)];
        assert_eq!(puzzle.apply_rows(table).unwrap(), 3);
    }

    #[test]
    fn test_uniqueness_counts() {
        let mut puzzle = PuzzleModel::new(layout("0 0 0 0 0\n1 1 1 1 1\n\n. . . . .\n. . . . .\n"));
        let stats = puzzle.apply_uniqueness();
        // spans of length 5: 0..5 1..5 0..4 0..2 3..5 1..4
        assert_eq!(stats.runs, 12);
        // 6 * 6 across rows, plus (0..2, 3..5) within each row
        assert_eq!(stats.constraints, 36 + 2);
        assert_eq!(puzzle.apply_uniqueness(), stats);
    }

    #[test]
    fn test_hints() {
        let mut puzzle = PuzzleModel::new(layout("0 0\n\n. .\n"));
        puzzle.add_hint(0, 1, 7).unwrap();
        assert_eq!(puzzle.model().hints.len(), 2);
        assert_eq!(
            puzzle.add_hint(1, 0, 7),
            Err(LayoutError::CellOutOfRange { row: 1, col: 0 })
        );
        assert_eq!(puzzle.add_hint(0, 0, 10), Err(LayoutError::NotADigit(10)));
        let hints = HintGrid::parse("3 .\n").unwrap();
        puzzle.add_hints(&hints).unwrap();
        assert_eq!(puzzle.model().hints.len(), 4);
    }
}

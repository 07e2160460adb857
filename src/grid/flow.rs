//! Flow Graph Builder.
//!
//! Cell values are produced by letting a tiled cell hand its region label
//! out to neighbouring digit cells. For each cell
//!
//! ```text
//! value = label + Σ incoming − Σ outgoing
//! ```
//!
//! A tiled cell sends exactly its label and receives nothing, so its value is
//! zero. A digit cell sends nothing and must end up non-zero.

use super::cells::CellGrid;
use super::labels::RegionLabels;
use super::layout::GridLayout;
use crate::cp::{Assignment, CpModel, IntVar, LinearExpr};

/// A directed flow variable between two adjacent cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowEdge {
    pub from: (usize, usize),
    pub to: (usize, usize),
    pub var: IntVar,
}

/// Flow edges plus per-cell incoming and outgoing lists.
#[derive(Debug, Clone)]
pub struct FlowGraph {
    cols: usize,
    edges: Vec<FlowEdge>,
    incoming: Vec<Vec<usize>>,
    outgoing: Vec<Vec<usize>>,
}

impl FlowGraph {
    /// Creates the flow variables and posts the cell invariants.
    ///
    /// Edges connect every pair of adjacent cells that are both
    /// non-highlighted, one variable per direction. Per cell this posts the
    /// value/flow balance, the digit indicator linkage and the tiled and
    /// untiled rules; per column it forbids vertically adjacent tiles.
    pub fn build(
        model: &mut CpModel,
        layout: &GridLayout,
        cells: &CellGrid,
        labels: &RegionLabels,
    ) -> Self {
        let (rows, cols) = (layout.rows(), layout.cols());
        let mut graph = Self {
            cols,
            edges: Vec::new(),
            incoming: vec![Vec::new(); rows * cols],
            outgoing: vec![Vec::new(); rows * cols],
        };

        for (a, b) in layout.adjacent_pairs() {
            if layout.is_highlighted(a.0, a.1) || layout.is_highlighted(b.0, b.1) {
                continue;
            }
            graph.add_edge(model, a, b);
            graph.add_edge(model, b, a);
        }

        for ((i, j), cell) in cells.iter() {
            let label = labels.at(i, j);
            let inflow = graph.inflow(i, j);
            let outflow = graph.outflow(i, j);

            let balance = LinearExpr::from(label) + inflow.clone() - outflow.clone();
            model.add_equality(cell.value, balance);

            model.add_exactly_one(&cell.digits.map(|d| d.lit()));
            for k in 0..10 {
                let c = model.add_eq(cell.value, k as i64);
                model.only_enforce_if(c, &[cell.digit(k)]);
            }

            let tiled = cell.tiled.lit();
            let sends_label = model.add_equality(outflow.clone(), label);
            let receives_nothing = model.add_eq(inflow, 0);
            let blank = model.add_eq(cell.value, 0);
            for c in [sends_label, receives_nothing, blank] {
                model.only_enforce_if(c, &[tiled]);
            }

            let sends_nothing = model.add_eq(outflow, 0);
            let non_zero = model.add_ne(cell.value, 0);
            for c in [sends_nothing, non_zero] {
                model.only_enforce_if(c, &[!tiled]);
            }
        }

        for i in 1..rows {
            for j in 0..cols {
                let (above, below) = (cells.get(i - 1, j), cells.get(i, j));
                model.add_at_most_one(&[above.tiled.lit(), below.tiled.lit()]);
            }
        }

        graph
    }

    fn add_edge(&mut self, model: &mut CpModel, from: (usize, usize), to: (usize, usize)) {
        let name = format!("flow[{},{}->{},{}]", from.0, from.1, to.0, to.1);
        let var = model.new_int_var(0, 9, name);
        let k = self.edges.len();
        self.edges.push(FlowEdge { from, to, var });
        self.outgoing[from.0 * self.cols + from.1].push(k);
        self.incoming[to.0 * self.cols + to.1].push(k);
    }

    /// All edges in creation order.
    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    /// Edges ending at `(row, col)`.
    pub fn incoming(&self, row: usize, col: usize) -> impl Iterator<Item = &FlowEdge> + '_ {
        self.incoming[row * self.cols + col].iter().map(|&k| &self.edges[k])
    }

    /// Edges starting at `(row, col)`.
    pub fn outgoing(&self, row: usize, col: usize) -> impl Iterator<Item = &FlowEdge> + '_ {
        self.outgoing[row * self.cols + col].iter().map(|&k| &self.edges[k])
    }

    /// `Σ incoming` of a cell as an expression.
    pub fn inflow(&self, row: usize, col: usize) -> LinearExpr {
        LinearExpr::sum(self.incoming(row, col).map(|e| e.var))
    }

    /// `Σ outgoing` of a cell as an expression.
    pub fn outflow(&self, row: usize, col: usize) -> LinearExpr {
        LinearExpr::sum(self.outgoing(row, col).map(|e| e.var))
    }

    /// `Σ incoming − Σ outgoing` of a cell under a solved assignment.
    pub fn net_inflow(&self, row: usize, col: usize, assignment: &Assignment) -> i64 {
        assignment.evaluate(&(self.inflow(row, col) - self.outflow(row, col)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(highlights: Vec<Vec<bool>>) -> (CpModel, FlowGraph) {
        let regions = highlights.iter().map(|r| vec![0; r.len()]).collect();
        let layout = GridLayout::new(regions, highlights).unwrap();
        let mut model = CpModel::new("flow");
        let cells = CellGrid::new(&mut model, layout.rows(), layout.cols());
        let labels = RegionLabels::build(&mut model, &layout);
        let graph = FlowGraph::build(&mut model, &layout, &cells, &labels);
        (model, graph)
    }

    #[test]
    fn test_two_edges_per_adjacent_pair() {
        let (_, graph) = build(vec![vec![false; 3]; 2]);
        // 7 adjacent pairs in a 2x3 grid
        assert_eq!(graph.edges().len(), 14);
        // corner cell has two neighbours
        assert_eq!(graph.incoming(0, 0).count(), 2);
        assert_eq!(graph.outgoing(1, 1).count(), 3);
        assert!(graph.outgoing(0, 0).all(|e| e.from == (0, 0)));
    }

    #[test]
    fn test_highlighted_cells_have_no_edges() {
        let (_, graph) = build(vec![vec![true, false, false], vec![false, false, false]]);
        assert_eq!(graph.edges().len(), 10);
        assert_eq!(graph.incoming(0, 0).count(), 0);
        assert_eq!(graph.outgoing(0, 0).count(), 0);
        assert!(graph
            .edges()
            .iter()
            .all(|e| e.from != (0, 0) && e.to != (0, 0)));
    }

    #[test]
    fn test_flow_expressions() {
        let (model, graph) = build(vec![vec![false; 2]]);
        let inflow = graph.inflow(0, 0);
        assert_eq!(inflow.terms.len(), 1);
        let values = vec![0; model.variable_count()];
        assert_eq!(graph.net_inflow(0, 0, &Assignment::new(values)), 0);
    }
}

//! Region Labeler.

use super::layout::GridLayout;
use crate::cp::{CpModel, IntVar};
use std::collections::{BTreeMap, BTreeSet};

/// One label variable (domain 1 to 9) per distinct region id.
#[derive(Debug, Clone)]
pub struct RegionLabels {
    by_region: BTreeMap<i64, IntVar>,
    cells: Vec<Vec<IntVar>>,
    borders: usize,
}

impl RegionLabels {
    /// Creates the label variables and makes labels of regions that share a
    /// grid edge differ.
    ///
    /// Every horizontally or vertically adjacent pair of cells is considered.
    /// Each pair of touching regions yields a single not-equal constraint.
    pub fn build(model: &mut CpModel, layout: &GridLayout) -> Self {
        let mut by_region = BTreeMap::new();
        for &id in layout.regions().iter().flatten() {
            by_region
                .entry(id)
                .or_insert_with(|| model.new_int_var(1, 9, format!("label[{id}]")));
        }

        let cells: Vec<Vec<IntVar>> = layout
            .regions()
            .iter()
            .map(|row| row.iter().map(|id| by_region[id]).collect())
            .collect();

        let touching: BTreeSet<(i64, i64)> = layout
            .adjacent_pairs()
            .filter_map(|((i1, j1), (i2, j2))| {
                let (a, b) = (layout.region(i1, j1), layout.region(i2, j2));
                (a != b).then_some((a.min(b), a.max(b)))
            })
            .collect();
        for &(a, b) in &touching {
            model.add_different(by_region[&a], by_region[&b]);
        }

        Self {
            by_region,
            cells,
            borders: touching.len(),
        }
    }

    /// Label shared by the region containing `(row, col)`.
    pub fn at(&self, row: usize, col: usize) -> IntVar {
        self.cells[row][col]
    }

    /// Label of region `id`, if that id occurs in the layout.
    pub fn of_region(&self, id: i64) -> Option<IntVar> {
        self.by_region.get(&id).copied()
    }

    /// `(region id, label)` in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, IntVar)> + '_ {
        self.by_region.iter().map(|(&id, &var)| (id, var))
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.by_region.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_region.is_empty()
    }

    /// Number of touching region pairs.
    pub fn borders(&self) -> usize {
        self.borders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::{BacktrackingSolver, CpSolver, SolverConfig};

    fn layout(regions: Vec<Vec<i64>>) -> GridLayout {
        let highlights = regions.iter().map(|r| vec![false; r.len()]).collect();
        GridLayout::new(regions, highlights).unwrap()
    }

    #[test]
    fn test_one_label_per_region() {
        let mut model = CpModel::new("labels");
        let labels = RegionLabels::build(&mut model, &layout(vec![vec![7, 7, 3], vec![3, 7, 3]]));
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.at(0, 0), labels.at(1, 1));
        assert_eq!(labels.at(0, 2), labels.of_region(3).unwrap());
        assert_eq!(labels.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![3, 7]);
        assert_eq!(labels.borders(), 1);
        assert_eq!(model.constraint_count(), 1);
    }

    #[test]
    fn test_border_on_first_row_and_column() {
        // Regions 0 and 1 only touch along row 0 and column 0.
        let mut model = CpModel::new("labels");
        let labels = RegionLabels::build(&mut model, &layout(vec![vec![0, 1], vec![1, 1]]));
        assert_eq!(labels.borders(), 1);

        model.add_eq(labels.of_region(0).unwrap(), 4);
        let solver = BacktrackingSolver;
        let config = SolverConfig::exhaustive();
        let mut seen = Vec::new();
        solver.solve_with_visitor(&model, &config, &mut |a: &crate::cp::Assignment| {
            seen.push(a.value(labels.of_region(1).unwrap()));
        });
        assert_eq!(seen.len(), 8);
        assert!(!seen.contains(&4));
    }
}

//! Grids whose only way out is a repeated number.

use number_cross::compose::PuzzleModel;
use number_cross::cp::{BacktrackingSolver, CpModel, SolverConfig, SolverStatus};
use number_cross::grid::GridLayout;
use number_cross::predicate::RunVars;

fn solve(puzzle: &PuzzleModel) -> (SolverStatus, Vec<Vec<u8>>) {
    let mut digits = Vec::new();
    let result = puzzle.solve(&BacktrackingSolver, &SolverConfig::default(), |s| {
        digits = s.digits.clone();
    });
    (result.status, digits)
}

/// One region and no tiles possible: both rows spell the label twice.
fn two_by_two(unique: bool) -> PuzzleModel {
    let layout = GridLayout::parse("0 0\n0 0\n\n. .\n. .\n").expect("layout");
    let mut puzzle = PuzzleModel::new(layout);
    if unique {
        puzzle.apply_uniqueness();
    }
    puzzle
}

#[test]
fn equal_rows_need_uniqueness_to_fail() {
    let (status, digits) = solve(&two_by_two(false));
    assert_eq!(status, SolverStatus::Optimal);
    assert_eq!(digits[0], digits[1]);

    let (status, digits) = solve(&two_by_two(true));
    assert_eq!(status, SolverStatus::Infeasible);
    assert!(digits.is_empty());
}

/// Row 0 may only hold runs spelling 45, which forces `45 0 45` (two equal
/// runs in one row); row 1 is free.
fn forty_five_twice(unique: bool) -> PuzzleModel {
    let layout =
        GridLayout::parse("0 0 0 0 0\n0 0 0 0 0\n\n. . . . .\n. . . . .\n").expect("layout");
    let mut puzzle = PuzzleModel::new(layout);
    let forty_five = |model: &mut CpModel, run: RunVars<'_>| vec![model.add_eq(run.number(), 45)];
    puzzle.apply_row(0, &forty_five).expect("row in range");
    if unique {
        puzzle.apply_uniqueness();
    }
    puzzle
}

#[test]
fn equal_runs_within_a_row_need_uniqueness_to_fail() {
    let (status, digits) = solve(&forty_five_twice(false));
    assert_eq!(status, SolverStatus::Optimal);
    assert_eq!(digits[0], vec![4, 5, 0, 4, 5]);

    let (status, _) = solve(&forty_five_twice(true));
    assert_eq!(status, SolverStatus::Infeasible);
}

//! Constraint model builder for number-cross puzzles.
//!
//! A rectangular grid is split into labelled regions. Each row may blank
//! ("tile") some cells; the remaining cells form runs of digits that must
//! satisfy the row's arithmetic predicate, and no number may appear twice in
//! the grid. Cell digits come from the region labels through a flow scheme.
//!
//! - **Tiling** ([`tiling`]): every admissible tile pattern for a row length.
//! - **Grid** ([`grid`]): layout input, cell variables, region labels and the
//!   flow graph that derives cell values from labels.
//! - **Predicates** ([`predicate`]): divisibility, digit products, series
//!   membership, self-dividing numbers, odd palindromes.
//! - **Composer** ([`compose`]): pattern-reified row predicates, global
//!   uniqueness, hints, solving and solution decoding.
//! - **CP** ([`cp`]): the constraint-model abstraction and a bundled
//!   backtracking solver behind the [`cp::CpSolver`] trait.
//! - **Check** ([`check`]): direct arithmetic verification of a solved grid.
//!
//! # Example
//!
//! ```
//! use number_cross::compose::PuzzleModel;
//! use number_cross::cp::{BacktrackingSolver, SolverConfig};
//! use number_cross::grid::GridLayout;
//! use number_cross::predicate::Predicate;
//!
//! let layout = GridLayout::parse("0 0 0\n0 0 0\n\n. . .\n. . .\n").unwrap();
//! let mut puzzle = PuzzleModel::new(layout);
//! puzzle.apply_row(0, &Predicate::divisible_by(7)).unwrap();
//! puzzle.apply_row(1, &Predicate::square()).unwrap();
//! puzzle.apply_uniqueness();
//!
//! let mut found = Vec::new();
//! let result = puzzle.solve(&BacktrackingSolver, &SolverConfig::default(), |s| {
//!     found.push(s.numbers());
//! });
//! assert!(result.status.is_solution_found());
//! assert_eq!(found.len(), 1);
//! ```
//!
//! Model construction logs statistics through `tracing` at debug level; the
//! crate never installs a subscriber.

pub mod check;
pub mod compose;
pub mod cp;
pub mod error;
pub mod grid;
pub mod predicate;
pub mod tiling;

pub use error::{CheckError, LayoutError, ModelError};
